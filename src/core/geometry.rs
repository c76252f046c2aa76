use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::{PriceScale, Sample, TimeScale};
use crate::error::{ChartError, ChartResult};

/// Fraction of the slot width occupied by the candle body.
const BODY_FRACTION: f64 = 0.7;

/// Pixel widths derived from one candle spacing at the current zoom.
///
/// `slot_px` spans the full spacing (also the hover hit-slot width);
/// `body_px` is the drawn body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleWidths {
    pub slot_px: f64,
    pub body_px: f64,
}

impl CandleWidths {
    #[must_use]
    pub fn zero() -> Self {
        Self {
            slot_px: 0.0,
            body_px: 0.0,
        }
    }
}

/// Computes candle widths for the current window and scale.
///
/// Degenerates to zero widths for an empty window; the scale stays linear,
/// so any window time works as the probe origin.
pub fn candle_widths(
    window: &[Sample],
    time_scale: TimeScale,
    spacing: f64,
    plot_width_px: f64,
) -> ChartResult<CandleWidths> {
    let Some(first) = window.first() else {
        return Ok(CandleWidths::zero());
    };

    if !spacing.is_finite() || spacing < 0.0 {
        return Err(ChartError::InvalidData(
            "candle spacing must be finite and >= 0".to_owned(),
        ));
    }

    let origin = time_scale.time_to_pixel(first.time, plot_width_px)?;
    let advanced = time_scale.time_to_pixel(first.time + spacing, plot_width_px)?;
    let slot_px = advanced - origin;
    Ok(CandleWidths {
        slot_px,
        body_px: slot_px * BODY_FRACTION,
    })
}

/// Projected candle geometry in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleGeometry {
    pub center_x: f64,
    pub body_left: f64,
    pub body_right: f64,
    pub body_top: f64,
    pub body_bottom: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub is_bullish: bool,
}

/// Projects window samples into deterministic candle render geometry.
///
/// Pure and side-effect free so it serves both rendering and regression
/// tests.
pub fn project_candles(
    window: &[Sample],
    time_scale: TimeScale,
    price_scale: PriceScale,
    widths: CandleWidths,
    plot_width_px: f64,
    plot_height_px: f64,
) -> ChartResult<Vec<CandleGeometry>> {
    if !widths.body_px.is_finite() || widths.body_px < 0.0 {
        return Err(ChartError::InvalidData(
            "candle body width must be finite and >= 0".to_owned(),
        ));
    }

    #[cfg(feature = "parallel-projection")]
    {
        let projected: Vec<ChartResult<CandleGeometry>> = window
            .par_iter()
            .map(|sample| {
                project_single_candle(
                    *sample,
                    time_scale,
                    price_scale,
                    widths.body_px,
                    plot_width_px,
                    plot_height_px,
                )
            })
            .collect();
        projected.into_iter().collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        let mut out = Vec::with_capacity(window.len());
        for sample in window {
            out.push(project_single_candle(
                *sample,
                time_scale,
                price_scale,
                widths.body_px,
                plot_width_px,
                plot_height_px,
            )?);
        }
        Ok(out)
    }
}

fn project_single_candle(
    sample: Sample,
    time_scale: TimeScale,
    price_scale: PriceScale,
    body_width_px: f64,
    plot_width_px: f64,
    plot_height_px: f64,
) -> ChartResult<CandleGeometry> {
    let half = body_width_px / 2.0;
    let center_x = time_scale.time_to_pixel(sample.time, plot_width_px)?;
    let open_y = price_scale.price_to_pixel(sample.open, plot_height_px)?;
    let close_y = price_scale.price_to_pixel(sample.close, plot_height_px)?;
    let wick_top = price_scale.price_to_pixel(sample.high, plot_height_px)?;
    let wick_bottom = price_scale.price_to_pixel(sample.low, plot_height_px)?;

    Ok(CandleGeometry {
        center_x,
        body_left: center_x - half,
        body_right: center_x + half,
        body_top: open_y.min(close_y),
        body_bottom: open_y.max(close_y),
        wick_top,
        wick_bottom,
        is_bullish: sample.is_bullish(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionKind {
    Long,
    Short,
}

/// Entry-marker triangle anchored at the entry price.
///
/// Long markers point up from below the entry, short markers point down
/// from above it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionTriangle {
    pub kind: PositionKind,
    pub sample_time: f64,
    pub points: [(f64, f64); 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelKind {
    StopLoss,
    TakeProfit,
}

/// Horizontal SL/TP level bar centered on the position's candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelBar {
    pub kind: LevelKind,
    pub sample_time: f64,
    pub left_px: f64,
    pub top_px: f64,
    pub width_px: f64,
    pub height_px: f64,
}

/// All projected position visuals for one window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionOverlay {
    pub triangles: Vec<PositionTriangle>,
    pub levels: Vec<LevelBar>,
}

/// Height of the rendered SL/TP bars.
const LEVEL_BAR_HEIGHT_PX: f64 = 3.0;

/// Projects long/short entries and SL/TP levels for the window.
///
/// Samples without the corresponding optional field produce no geometry at
/// all; SL/TP bars additionally require an open position on the sample.
pub fn project_position_overlay(
    window: &[Sample],
    time_scale: TimeScale,
    price_scale: PriceScale,
    widths: CandleWidths,
    plot_width_px: f64,
    plot_height_px: f64,
) -> ChartResult<PositionOverlay> {
    let mut overlay = PositionOverlay::default();
    // Matches the original marker proportions relative to the body width.
    let wing = widths.body_px / 1.2;
    let rise = widths.body_px * 1.2;
    let bar_width = widths.body_px * 1.6;

    for sample in window {
        let center_x = time_scale.time_to_pixel(sample.time, plot_width_px)?;

        if let Some(entry) = sample.long {
            let y = price_scale.price_to_pixel(entry, plot_height_px)?;
            overlay.triangles.push(PositionTriangle {
                kind: PositionKind::Long,
                sample_time: sample.time,
                points: [
                    (center_x - wing, y),
                    (center_x + wing, y),
                    (center_x, y - rise),
                ],
            });
        }

        if let Some(entry) = sample.short {
            let y = price_scale.price_to_pixel(entry, plot_height_px)?;
            overlay.triangles.push(PositionTriangle {
                kind: PositionKind::Short,
                sample_time: sample.time,
                points: [
                    (center_x - wing, y),
                    (center_x + wing, y),
                    (center_x, y + rise),
                ],
            });
        }

        if sample.has_position() {
            if let Some(level) = sample.sl {
                overlay.levels.push(LevelBar {
                    kind: LevelKind::StopLoss,
                    sample_time: sample.time,
                    left_px: center_x - wing,
                    top_px: price_scale.price_to_pixel(level, plot_height_px)?,
                    width_px: bar_width,
                    height_px: LEVEL_BAR_HEIGHT_PX,
                });
            }
            if let Some(level) = sample.tp {
                overlay.levels.push(LevelBar {
                    kind: LevelKind::TakeProfit,
                    sample_time: sample.time,
                    left_px: center_x - wing,
                    top_px: price_scale.price_to_pixel(level, plot_height_px)?,
                    width_px: bar_width,
                    height_px: LEVEL_BAR_HEIGHT_PX,
                });
            }
        }
    }

    Ok(overlay)
}
