use crate::core::Sample;
use crate::error::{ChartError, ChartResult};

/// Sentinel spacing for datasets too small to measure, in seconds.
pub const ONE_DAY_SECONDS: f64 = 86_400.0;

/// Minimum gap between adjacent sample timestamps across the whole dataset.
///
/// The scan runs over a time-sorted copy, so callers may pass unsorted
/// slices. When several adjacent pairs share the minimal gap the first one
/// encountered wins; only the gap value is observable, so the tie-break is
/// arbitrary but stable.
pub fn candle_spacing(samples: &[Sample]) -> ChartResult<f64> {
    if samples.len() < 2 {
        return Err(ChartError::EmptyDataset);
    }

    let mut times: Vec<f64> = samples.iter().map(|sample| sample.time).collect();
    times.sort_by(f64::total_cmp);

    let mut min_gap = times[1] - times[0];
    for pair in times.windows(2).skip(1) {
        let gap = pair[1] - pair[0];
        if gap < min_gap {
            min_gap = gap;
        }
    }
    Ok(min_gap)
}
