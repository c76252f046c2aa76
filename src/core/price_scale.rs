use serde::{Deserialize, Serialize};

use crate::core::{LinearScale, Sample};
use crate::error::{ChartError, ChartResult};

/// Tuning controls for the price-domain envelope padding.
///
/// Padding is multiplicative on the envelope edges, matching the rendered
/// headroom users expect above wicks and below lows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceScaleTuning {
    pub top_padding_fraction: f64,
    pub bottom_padding_fraction: f64,
    pub min_span_absolute: f64,
}

impl Default for PriceScaleTuning {
    fn default() -> Self {
        Self {
            top_padding_fraction: 0.05,
            bottom_padding_fraction: 0.05,
            min_span_absolute: 0.000_001,
        }
    }
}

impl PriceScaleTuning {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.top_padding_fraction.is_finite()
            || !self.bottom_padding_fraction.is_finite()
            || self.top_padding_fraction < 0.0
            || self.bottom_padding_fraction < 0.0
        {
            return Err(ChartError::InvalidData(
                "price scale padding fractions must be finite and >= 0".to_owned(),
            ));
        }

        if !self.min_span_absolute.is_finite() || self.min_span_absolute <= 0.0 {
            return Err(ChartError::InvalidData(
                "price scale min span must be finite and > 0".to_owned(),
            ));
        }

        Ok(self)
    }
}

/// Price axis mapping with an inverted pixel direction (y = 0 at the top).
///
/// The domain covers every visible `high`/`low` plus any present stop-loss
/// and take-profit levels, so markers never land outside the plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceScale {
    domain_top: f64,
    domain_bottom: f64,
}

impl PriceScale {
    /// Fits the scale to a filtered window with default tuning.
    ///
    /// An empty window degrades to the `[0, 1]` domain instead of failing,
    /// so an out-of-range viewport still renders an empty chart.
    #[must_use]
    pub fn from_window(window: &[Sample]) -> Self {
        Self::from_window_tuned(window, PriceScaleTuning::default())
            .unwrap_or_else(|_| Self::empty_domain())
    }

    /// Fits the scale to a filtered window with explicit tuning.
    pub fn from_window_tuned(window: &[Sample], tuning: PriceScaleTuning) -> ChartResult<Self> {
        let tuning = tuning.validate()?;

        let Some((min, max)) = window_envelope(window) else {
            return Ok(Self::empty_domain());
        };

        let padded_top = max + max * tuning.top_padding_fraction;
        let padded_bottom = min - min * tuning.bottom_padding_fraction;
        let (bottom, top) = normalize_span(padded_bottom, padded_top, tuning.min_span_absolute);

        Ok(Self {
            domain_top: top,
            domain_bottom: bottom,
        })
    }

    /// Raw price domain as `(bottom, top)`.
    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_bottom, self.domain_top)
    }

    /// Maps a price to pixel Y; the domain top lands at pixel 0.
    pub fn price_to_pixel(self, price: f64, plot_height_px: f64) -> ChartResult<f64> {
        self.linear()?.domain_to_pixel(price, plot_height_px)
    }

    pub fn pixel_to_price(self, pixel: f64, plot_height_px: f64) -> ChartResult<f64> {
        self.linear()?.pixel_to_domain(pixel, plot_height_px)
    }

    /// Evenly spaced tick prices, ascending.
    #[must_use]
    pub fn ticks(self, tick_count: usize) -> Vec<f64> {
        if tick_count == 0 {
            return Vec::new();
        }
        if tick_count == 1 {
            return vec![self.domain_bottom];
        }

        let span = self.domain_top - self.domain_bottom;
        let denominator = (tick_count - 1) as f64;
        (0..tick_count)
            .map(|index| self.domain_bottom + span * (index as f64) / denominator)
            .collect()
    }

    fn empty_domain() -> Self {
        Self {
            domain_top: 1.0,
            domain_bottom: 0.0,
        }
    }

    fn linear(self) -> ChartResult<LinearScale> {
        // Domain runs top-to-bottom so increasing price maps to decreasing Y.
        LinearScale::new(self.domain_top, self.domain_bottom)
    }
}

/// Min/max over highs, lows and any present sl/tp levels.
fn window_envelope(window: &[Sample]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for sample in window {
        min = min.min(sample.low);
        max = max.max(sample.high);
        for level in [sample.sl, sample.tp].into_iter().flatten() {
            min = min.min(level);
            max = max.max(level);
        }
    }

    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

fn normalize_span(bottom: f64, top: f64, min_span: f64) -> (f64, f64) {
    if bottom == top {
        let half = min_span / 2.0;
        (bottom - half, top + half)
    } else {
        (bottom.min(top), bottom.max(top))
    }
}
