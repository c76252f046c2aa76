use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Outer pixel size of the chart surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Half-open-free time window: `start < end`, both finite unix seconds.
///
/// Ranges are always normalized on construction; callers never observe a
/// reversed range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    start: f64,
    end: f64,
}

impl TimeRange {
    /// Builds a normalized range from two edge values in either order.
    pub fn new(a: f64, b: f64) -> ChartResult<Self> {
        if !a.is_finite() || !b.is_finite() {
            return Err(ChartError::InvalidData(
                "time range edges must be finite".to_owned(),
            ));
        }
        if a == b {
            return Err(ChartError::InvalidData(
                "time range must not be empty".to_owned(),
            ));
        }
        Ok(Self {
            start: a.min(b),
            end: a.max(b),
        })
    }

    #[must_use]
    pub fn start(self) -> f64 {
        self.start
    }

    #[must_use]
    pub fn end(self) -> f64 {
        self.end
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn contains(self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }

    /// Returns this range grown by `padding` on both edges.
    #[must_use]
    pub fn padded(self, padding: f64) -> Self {
        Self {
            start: self.start - padding,
            end: self.end + padding,
        }
    }
}
