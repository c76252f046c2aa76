use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::api::config::ChartConfig;
use crate::api::palette::Palette;
use crate::core::{
    CandleWidths, LevelKind, PositionKind, PriceScale, Sample, TimeScale, project_candles,
    project_position_overlay,
};
use crate::error::ChartResult;
use crate::interaction::CrosshairState;
use crate::render::{
    Color, LinePrimitive, LineStrokeStyle, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
    TrianglePrimitive,
};

/// Opaque token addressing one scene element.
///
/// Handles are only meaningful against the graph that issued them; hosts
/// never synthesize or parse them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneHandle(u64);

/// Role of a scene element, used for hit routing and introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneRole {
    PlotBackground,
    GridVertical,
    GridHorizontal,
    TimeTickLabel,
    PriceTickLabel,
    HitSlot { sample_index: usize },
    CandleBody { sample_index: usize },
    CandleWick { sample_index: usize },
    LongMarker { sample_index: usize },
    ShortMarker { sample_index: usize },
    StopLossBar { sample_index: usize },
    TakeProfitBar { sample_index: usize },
    ZoomOverlay,
    CrosshairLine,
    CrosshairLabel,
    InfoReadout,
}

/// Rectangular pointer-interactive region owned by a scene element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRegion {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    /// Index into the current filtered window.
    pub sample_index: usize,
}

impl HitRegion {
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    #[must_use]
    pub fn center_x(self) -> f64 {
        (self.left + self.right) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneNode {
    pub role: SceneRole,
    pub hit: Option<HitRegion>,
}

/// Insertion-ordered registry of the current scene's elements.
///
/// Rebuilt from scratch on every draw; stale handles from a previous scene
/// simply resolve to `None`.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: IndexMap<SceneHandle, SceneNode>,
    next_id: u64,
}

impl SceneGraph {
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn insert(&mut self, role: SceneRole, hit: Option<HitRegion>) -> SceneHandle {
        self.next_id += 1;
        let handle = SceneHandle(self.next_id);
        self.nodes.insert(handle, SceneNode { role, hit });
        handle
    }

    #[must_use]
    pub fn node(&self, handle: SceneHandle) -> Option<&SceneNode> {
        self.nodes.get(&handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Hit regions under the pointer, most recently drawn first.
    pub fn hits_at(&self, x: f64, y: f64) -> impl Iterator<Item = HitRegion> + '_ {
        self.nodes
            .values()
            .rev()
            .filter_map(move |node| node.hit.filter(|region| region.contains(x, y)))
    }
}

/// Everything the scene builder needs for one draw pass.
pub(super) struct SceneContext<'a> {
    pub config: &'a ChartConfig,
    pub palette: &'a Palette,
    pub window: &'a [Sample],
    pub time_scale: TimeScale,
    pub price_scale: PriceScale,
    pub widths: CandleWidths,
    pub crosshair: CrosshairState,
    pub zoom_overlay: Option<(f64, f64)>,
}

/// Builds the full frame and hit registry for the current state.
///
/// The scene is always built from scratch; nothing from a previous pass
/// survives, which keeps handles and geometry trivially consistent.
pub(super) fn build_scene(ctx: &SceneContext<'_>) -> ChartResult<(RenderFrame, SceneGraph)> {
    let derived = ctx.config.derived();
    let plot_w = derived.plot_width;
    let plot_h = derived.plot_height;

    let mut frame = RenderFrame::new(plot_w, plot_h);
    let mut graph = SceneGraph::default();

    build_background(ctx, &mut frame, &mut graph);
    build_price_axis(ctx, &mut frame, &mut graph)?;
    build_time_axis(ctx, &mut frame, &mut graph)?;
    build_hit_slots(ctx, &mut graph)?;
    build_candles(ctx, &mut frame, &mut graph)?;
    build_positions(ctx, &mut frame, &mut graph)?;
    build_zoom_overlay(ctx, &mut frame, &mut graph);
    build_crosshair(ctx, &mut frame, &mut graph)?;
    build_info_readout(ctx, &mut frame, &mut graph);

    Ok((frame, graph))
}

fn build_background(ctx: &SceneContext<'_>, frame: &mut RenderFrame, graph: &mut SceneGraph) {
    let derived = ctx.config.derived();
    frame.push_rect(RectPrimitive::new(
        0.0,
        0.0,
        derived.plot_width,
        derived.plot_height,
        ctx.palette.background,
    ));
    graph.insert(SceneRole::PlotBackground, None);
}

fn build_price_axis(
    ctx: &SceneContext<'_>,
    frame: &mut RenderFrame,
    graph: &mut SceneGraph,
) -> ChartResult<()> {
    let derived = ctx.config.derived();
    for tick in ctx.price_scale.ticks(ctx.config.y_tick_count) {
        let y = ctx.price_scale.price_to_pixel(tick, derived.plot_height)?;
        frame.push_line(LinePrimitive::new(
            0.0,
            y,
            derived.plot_width,
            y,
            1.0,
            ctx.palette.grid,
        ));
        graph.insert(SceneRole::GridHorizontal, None);

        frame.push_text(TextPrimitive::new(
            format_price(tick, ctx.config.decimal),
            derived.plot_width + 2.5,
            y,
            ctx.config.y_label_font_size,
            ctx.palette.tick_text,
            TextHAlign::Left,
        ));
        graph.insert(SceneRole::PriceTickLabel, None);
    }
    Ok(())
}

fn build_time_axis(
    ctx: &SceneContext<'_>,
    frame: &mut RenderFrame,
    graph: &mut SceneGraph,
) -> ChartResult<()> {
    let derived = ctx.config.derived();
    for tick in ctx.time_scale.ticks(ctx.config.x_tick_count) {
        let x = ctx.time_scale.time_to_pixel(tick, derived.plot_width)?;
        frame.push_line(LinePrimitive::new(
            x,
            0.0,
            x,
            derived.plot_height,
            1.0,
            ctx.palette.grid,
        ));
        graph.insert(SceneRole::GridVertical, None);

        frame.push_text(TextPrimitive::new(
            format_time(tick, &ctx.config.time_format),
            x,
            derived.plot_height + 10.0,
            ctx.config.x_label_font_size,
            ctx.palette.tick_text,
            TextHAlign::Center,
        ));
        graph.insert(SceneRole::TimeTickLabel, None);
    }
    Ok(())
}

/// Invisible full-height slots that make the whole candle column hoverable.
fn build_hit_slots(ctx: &SceneContext<'_>, graph: &mut SceneGraph) -> ChartResult<()> {
    let derived = ctx.config.derived();
    let half = ctx.widths.slot_px / 2.0;
    for (sample_index, sample) in ctx.window.iter().enumerate() {
        let center_x = ctx
            .time_scale
            .time_to_pixel(sample.time, derived.plot_width)?;
        graph.insert(
            SceneRole::HitSlot { sample_index },
            Some(HitRegion {
                left: center_x - half,
                top: 0.0,
                right: center_x + half,
                bottom: derived.plot_height,
                sample_index,
            }),
        );
    }
    Ok(())
}

fn build_candles(
    ctx: &SceneContext<'_>,
    frame: &mut RenderFrame,
    graph: &mut SceneGraph,
) -> ChartResult<()> {
    let derived = ctx.config.derived();
    let candles = project_candles(
        ctx.window,
        ctx.time_scale,
        ctx.price_scale,
        ctx.widths,
        derived.plot_width,
        derived.plot_height,
    )?;

    for (sample_index, candle) in candles.iter().enumerate() {
        let (fill, stroke, tail) = if candle.is_bullish {
            (
                ctx.palette.up_candle_fill,
                ctx.palette.up_candle_stroke,
                ctx.palette.up_candle_tail,
            )
        } else {
            (
                ctx.palette.down_candle_fill,
                ctx.palette.down_candle_stroke,
                ctx.palette.down_candle_tail,
            )
        };

        // Wicks first so the body covers their inner ends.
        if ctx.widths.body_px > 0.0 {
            frame.push_line(
                LinePrimitive::new(
                    candle.center_x,
                    candle.wick_top,
                    candle.center_x,
                    candle.body_top,
                    ctx.config.candle_tail_width,
                    tail,
                )
                .with_style(LineStrokeStyle::Solid),
            );
            frame.push_line(
                LinePrimitive::new(
                    candle.center_x,
                    candle.body_bottom,
                    candle.center_x,
                    candle.wick_bottom,
                    ctx.config.candle_tail_width,
                    tail,
                ),
            );
            graph.insert(SceneRole::CandleWick { sample_index }, None);

            frame.push_rect(
                RectPrimitive::new(
                    candle.body_left,
                    candle.body_top,
                    candle.body_right - candle.body_left,
                    candle.body_bottom - candle.body_top,
                    fill,
                )
                .with_stroke(stroke),
            );
            graph.insert(
                SceneRole::CandleBody { sample_index },
                Some(HitRegion {
                    left: candle.body_left,
                    top: candle.wick_top,
                    right: candle.body_right,
                    bottom: candle.wick_bottom,
                    sample_index,
                }),
            );
        }
    }
    Ok(())
}

fn build_positions(
    ctx: &SceneContext<'_>,
    frame: &mut RenderFrame,
    graph: &mut SceneGraph,
) -> ChartResult<()> {
    let derived = ctx.config.derived();
    let overlay = project_position_overlay(
        ctx.window,
        ctx.time_scale,
        ctx.price_scale,
        ctx.widths,
        derived.plot_width,
        derived.plot_height,
    )?;

    for triangle in &overlay.triangles {
        let (fill, stroke, role) = match triangle.kind {
            PositionKind::Long => (
                ctx.palette.long_fill,
                ctx.palette.long_stroke,
                SceneRole::LongMarker {
                    sample_index: window_index(ctx.window, triangle.sample_time),
                },
            ),
            PositionKind::Short => (
                ctx.palette.short_fill,
                ctx.palette.short_stroke,
                SceneRole::ShortMarker {
                    sample_index: window_index(ctx.window, triangle.sample_time),
                },
            ),
        };
        frame.push_triangle(TrianglePrimitive::new(triangle.points, fill).with_stroke(stroke));
        graph.insert(role, Some(triangle_hit(triangle.points, ctx.window, triangle.sample_time)));
    }

    for level in &overlay.levels {
        let (fill, stroke, role) = match level.kind {
            LevelKind::StopLoss => (
                ctx.palette.sl_fill,
                ctx.palette.sl_stroke,
                SceneRole::StopLossBar {
                    sample_index: window_index(ctx.window, level.sample_time),
                },
            ),
            LevelKind::TakeProfit => (
                ctx.palette.tp_fill,
                ctx.palette.tp_stroke,
                SceneRole::TakeProfitBar {
                    sample_index: window_index(ctx.window, level.sample_time),
                },
            ),
        };
        frame.push_rect(
            RectPrimitive::new(level.left_px, level.top_px, level.width_px, level.height_px, fill)
                .with_stroke(stroke),
        );
        graph.insert(
            role,
            Some(HitRegion {
                left: level.left_px,
                top: level.top_px,
                right: level.left_px + level.width_px,
                bottom: level.top_px + level.height_px,
                sample_index: window_index(ctx.window, level.sample_time),
            }),
        );
    }
    Ok(())
}

/// Dims everything outside a live zoom selection.
fn build_zoom_overlay(ctx: &SceneContext<'_>, frame: &mut RenderFrame, graph: &mut SceneGraph) {
    let Some((from_px, to_px)) = ctx.zoom_overlay else {
        return;
    };
    let derived = ctx.config.derived();

    frame.push_rect(RectPrimitive::new(
        0.0,
        0.0,
        from_px.max(0.0),
        derived.plot_height,
        ctx.palette.zoom_overlay,
    ));
    graph.insert(SceneRole::ZoomOverlay, None);

    let right_width = (derived.plot_width - to_px).max(0.0);
    frame.push_rect(RectPrimitive::new(
        to_px,
        0.0,
        right_width,
        derived.plot_height,
        ctx.palette.zoom_overlay,
    ));
    graph.insert(SceneRole::ZoomOverlay, None);
}

fn build_crosshair(
    ctx: &SceneContext<'_>,
    frame: &mut RenderFrame,
    graph: &mut SceneGraph,
) -> ChartResult<()> {
    if !ctx.crosshair.visible {
        return Ok(());
    }
    let derived = ctx.config.derived();
    let dash = LineStrokeStyle::Dashed {
        on_px: ctx.config.selector_dash_on,
        off_px: ctx.config.selector_dash_off,
    };

    // A hover lock pins the X guide to the sample's exact time; the raw
    // cursor only drives X while unlocked.
    let x_px = match ctx.crosshair.locked_time {
        Some(time) => ctx.time_scale.time_to_pixel(time, derived.plot_width)?,
        None => ctx.crosshair.x,
    };
    let y_px = ctx.crosshair.y;

    frame.push_line(
        LinePrimitive::new(x_px, 0.0, x_px, derived.plot_height, 1.0, ctx.palette.selector_line)
            .with_style(dash),
    );
    graph.insert(SceneRole::CrosshairLine, None);

    frame.push_line(
        LinePrimitive::new(0.0, y_px, derived.plot_width, y_px, 1.0, ctx.palette.selector_line)
            .with_style(dash),
    );
    graph.insert(SceneRole::CrosshairLine, None);

    // X label box at the bottom edge, clamped into the plot.
    let x_label_left = clamp_label_anchor(x_px, derived.plot_width, ctx.config.x_label_width);
    frame.push_rect(RectPrimitive::new(
        x_label_left,
        derived.plot_height,
        ctx.config.x_label_width,
        ctx.config.x_label_height,
        ctx.palette.selector_label_background,
    ));
    let x_time = ctx.time_scale.pixel_to_time(x_px, derived.plot_width)?;
    frame.push_text(TextPrimitive::new(
        format_time(x_time, &ctx.config.time_format),
        x_label_left + 10.0,
        derived.plot_height + 15.0,
        ctx.config.x_label_font_size,
        ctx.palette.selector_label_text,
        TextHAlign::Left,
    ));
    graph.insert(SceneRole::CrosshairLabel, None);

    // Y label box at the right edge, clamped the same way.
    let y_label_top = clamp_label_anchor(y_px, derived.plot_height, ctx.config.y_label_height);
    frame.push_rect(RectPrimitive::new(
        derived.plot_width,
        y_label_top,
        derived.y_label_width,
        ctx.config.y_label_height,
        ctx.palette.selector_label_background,
    ));
    let price = ctx.price_scale.pixel_to_price(y_px, derived.plot_height)?;
    frame.push_text(TextPrimitive::new(
        format_price(price, ctx.config.decimal),
        derived.plot_width + 5.0,
        y_label_top + 15.0,
        ctx.config.y_label_font_size,
        ctx.palette.selector_label_text,
        TextHAlign::Left,
    ));
    graph.insert(SceneRole::CrosshairLabel, None);

    Ok(())
}

/// OHLC readout plus a position line for the hovered sample.
fn build_info_readout(ctx: &SceneContext<'_>, frame: &mut RenderFrame, graph: &mut SceneGraph) {
    let Some(time) = ctx.crosshair.locked_time else {
        return;
    };
    let Some(sample) = ctx
        .window
        .iter()
        .find(|sample| sample.time == time)
        .copied()
    else {
        return;
    };

    let derived = ctx.config.derived();
    let decimal = ctx.config.decimal;
    let value_color = if sample.is_bullish() {
        ctx.palette.info_text_up
    } else {
        ctx.palette.info_text_down
    };

    frame.push_rect(RectPrimitive::new(
        20.0,
        10.0,
        derived.info_text_width,
        14.0,
        ctx.palette.background,
    ));
    frame.push_text(TextPrimitive::new(
        format!(
            "O {} H {} L {} C {}",
            format_price(sample.open, decimal),
            format_price(sample.high, decimal),
            format_price(sample.low, decimal),
            format_price(sample.close, decimal),
        ),
        20.0,
        20.0,
        14.0,
        value_color,
        TextHAlign::Left,
    ));
    graph.insert(SceneRole::InfoReadout, None);

    let entry_text = match (sample.long, sample.short) {
        (Some(entry), _) => Some(format!("Long {}", format_price(entry, decimal))),
        (None, Some(entry)) => Some(format!("Short {}", format_price(entry, decimal))),
        (None, None) => None,
    };
    if let Some(mut text) = entry_text {
        if let Some(level) = sample.sl {
            text.push_str(&format!(" SL {}", format_price(level, decimal)));
        }
        if let Some(level) = sample.tp {
            text.push_str(&format!(" TP {}", format_price(level, decimal)));
        }

        frame.push_rect(RectPrimitive::new(
            20.0,
            30.0,
            derived.info_text_width_meta,
            14.0,
            ctx.palette.background,
        ));
        frame.push_text(TextPrimitive::new(
            text,
            20.0,
            40.0,
            14.0,
            ctx.palette.info_text,
            TextHAlign::Left,
        ));
        graph.insert(SceneRole::InfoReadout, None);
    }
}

/// Clamps a label anchor so the box stays fully inside the plot dimension.
#[must_use]
pub fn clamp_label_anchor(position: f64, plot_dimension: f64, label_dimension: f64) -> f64 {
    if position >= plot_dimension - label_dimension / 2.0 {
        (plot_dimension - label_dimension).max(0.0)
    } else if position <= label_dimension / 2.0 {
        0.0
    } else {
        position - label_dimension / 2.0
    }
}

fn format_price(value: f64, decimal: usize) -> String {
    format!("{value:.decimal$}")
}

fn format_time(time: f64, format: &str) -> String {
    match DateTime::<Utc>::from_timestamp_millis((time * 1000.0).round() as i64) {
        Some(stamp) => stamp.format(format).to_string(),
        None => format!("{time:.0}"),
    }
}

fn window_index(window: &[Sample], time: f64) -> usize {
    window
        .iter()
        .position(|sample| sample.time == time)
        .unwrap_or(0)
}

fn triangle_hit(points: [(f64, f64); 3], window: &[Sample], time: f64) -> HitRegion {
    let xs = [points[0].0, points[1].0, points[2].0];
    let ys = [points[0].1, points[1].1, points[2].1];
    HitRegion {
        left: xs.iter().copied().fold(f64::INFINITY, f64::min),
        top: ys.iter().copied().fold(f64::INFINITY, f64::min),
        right: xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        bottom: ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        sample_index: window_index(window, time),
    }
}
