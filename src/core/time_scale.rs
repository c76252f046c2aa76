use serde::{Deserialize, Serialize};

use crate::core::{LinearScale, TimeRange};
use crate::error::ChartResult;

/// Time axis mapping for the current zoom range.
///
/// The scale is derived fresh from the viewport state on every commit; the
/// dataset extent is owned by the viewport machine, not stored here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    range: TimeRange,
}

impl TimeScale {
    #[must_use]
    pub fn from_range(range: TimeRange) -> Self {
        Self { range }
    }

    #[must_use]
    pub fn range(self) -> TimeRange {
        self.range
    }

    pub fn time_to_pixel(self, time: f64, plot_width_px: f64) -> ChartResult<f64> {
        self.linear()?.domain_to_pixel(time, plot_width_px)
    }

    pub fn pixel_to_time(self, pixel: f64, plot_width_px: f64) -> ChartResult<f64> {
        self.linear()?.pixel_to_domain(pixel, plot_width_px)
    }

    /// Evenly spaced tick times across the visible range.
    #[must_use]
    pub fn ticks(self, tick_count: usize) -> Vec<f64> {
        if tick_count == 0 {
            return Vec::new();
        }
        if tick_count == 1 {
            return vec![self.range.start()];
        }

        let span = self.range.span();
        let denominator = (tick_count - 1) as f64;
        (0..tick_count)
            .map(|index| self.range.start() + span * (index as f64) / denominator)
            .collect()
    }

    fn linear(self) -> ChartResult<LinearScale> {
        LinearScale::new(self.range.start(), self.range.end())
    }
}
