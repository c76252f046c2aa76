use candle_chart::api::ChartBootstrap;
use candle_chart::core::{Sample, Viewport};
use candle_chart::render::{
    Color, LinePrimitive, NullRenderer, RectPrimitive, RenderFrame, Renderer, TextHAlign,
    TextPrimitive,
};
use candle_chart::viewport::NavigationMode;
use candle_chart::CandleChart;

fn sample_at(time: f64) -> Sample {
    Sample::new(time, 10.0, 12.0, 9.0, 11.0).expect("valid sample")
}

fn chart(samples: Vec<Sample>) -> CandleChart<NullRenderer> {
    let bootstrap = ChartBootstrap {
        viewport: Viewport::new(1000, 600),
        samples,
        host_id: "frame".to_owned(),
    };
    CandleChart::new(NullRenderer::default(), bootstrap).expect("chart")
}

#[test]
fn frame_validation_catches_bad_primitives() {
    let mut frame = RenderFrame::new(100.0, 100.0);
    frame.push_line(LinePrimitive::new(
        0.0,
        0.0,
        10.0,
        10.0,
        0.0,
        Color::rgb(0.0, 0.0, 0.0),
    ));
    assert!(frame.validate().is_err());

    let mut frame = RenderFrame::new(100.0, 100.0);
    frame.push_rect(RectPrimitive::new(
        0.0,
        0.0,
        10.0,
        10.0,
        Color::rgb(2.0, 0.0, 0.0),
    ));
    assert!(frame.validate().is_err());

    let mut frame = RenderFrame::new(100.0, 100.0);
    frame.push_text(TextPrimitive::new(
        "",
        0.0,
        0.0,
        12.0,
        Color::rgb(0.0, 0.0, 0.0),
        TextHAlign::Left,
    ));
    assert!(frame.validate().is_err());
}

#[test]
fn draw_rebuilds_an_identical_scene_when_nothing_changed() {
    let mut chart = chart(vec![sample_at(0.0), sample_at(500.0), sample_at(1000.0)]);
    chart.draw().expect("first draw");

    chart.draw().expect("second draw");
    let first = (
        chart.scene().len(),
        chart.visible_samples().len(),
    );

    chart.draw().expect("third draw");
    let second = (
        chart.scene().len(),
        chart.visible_samples().len(),
    );

    assert_eq!(first, second);
}

#[test]
fn empty_dataset_renders_an_empty_chart_without_errors() {
    let mut chart = chart(Vec::new());
    chart.draw().expect("draw of empty dataset");

    assert!(chart.visible_samples().is_empty());
    // Axes and background still exist; candles do not.
    assert!(!chart.scene().is_empty());
}

#[test]
fn destroy_clears_the_scene_and_interactive_regions() {
    let mut chart = chart(vec![sample_at(0.0), sample_at(500.0)]);
    chart.draw().expect("draw");
    assert!(!chart.scene().is_empty());

    chart.destroy().expect("destroy");
    assert!(chart.scene().is_empty());
    assert!(!chart.crosshair_state().visible);

    // A hover after destroy finds no interactive region.
    chart.pointer_move(500.0, 100.0).expect("move");
    // The move itself redraws, so the lock can only come from the fresh
    // scene built within that same call, never a stale one.
    assert!(chart.crosshair_state().visible);
}

#[test]
fn zoom_drag_adds_dim_overlay_rects() {
    let mut base_chart = chart(vec![sample_at(0.0), sample_at(500.0), sample_at(1000.0)]);
    base_chart.draw().expect("draw");
    let base_rects = base_chart.into_renderer().last_rect_count;

    let mut chart = chart(vec![sample_at(0.0), sample_at(500.0), sample_at(1000.0)]);
    chart.set_mode(NavigationMode::ZoomBox).expect("mode");
    chart.draw().expect("draw");
    chart.pointer_down(200.0).expect("down");
    chart.pointer_move(400.0, 100.0).expect("move");

    let renderer = chart.into_renderer();
    // Two dim rects plus the crosshair labels' backgrounds appear during
    // the live selection.
    assert!(renderer.last_rect_count >= base_rects + 2);
}

#[test]
fn position_markers_only_render_for_present_fields() {
    let plain = vec![sample_at(0.0), sample_at(500.0), sample_at(1000.0)];
    let mut plain_chart = chart(plain);
    plain_chart.draw().expect("draw");
    assert_eq!(plain_chart.into_renderer().last_triangle_count, 0);

    let with_positions = vec![
        sample_at(0.0).with_long(10.0).expect("long"),
        sample_at(500.0).with_short(11.0).expect("short"),
        sample_at(1000.0),
    ];
    let mut chart = chart(with_positions);
    chart.draw().expect("draw");
    assert_eq!(chart.into_renderer().last_triangle_count, 2);
}

#[test]
fn null_renderer_counts_reset_on_clear() {
    let mut renderer = NullRenderer::default();
    let mut frame = RenderFrame::new(100.0, 100.0);
    frame.push_rect(RectPrimitive::new(
        0.0,
        0.0,
        10.0,
        10.0,
        Color::rgb(0.5, 0.5, 0.5),
    ));
    renderer.render(&frame).expect("render");
    assert_eq!(renderer.last_rect_count, 1);

    renderer.clear().expect("clear");
    assert_eq!(renderer.last_rect_count, 0);
}
