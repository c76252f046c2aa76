use crate::core::{Sample, TimeRange};

/// Returns the samples renderable for a zoom range.
///
/// The range is padded by one candle spacing on each side so partially
/// visible boundary candles still render. Bounds are inclusive. The result
/// is derived state, recomputed on every viewport commit.
#[must_use]
pub fn samples_in_padded_window(samples: &[Sample], range: TimeRange, padding: f64) -> Vec<Sample> {
    let padded = range.padded(padding.max(0.0));
    samples
        .iter()
        .copied()
        .filter(|sample| padded.contains(sample.time))
        .collect()
}
