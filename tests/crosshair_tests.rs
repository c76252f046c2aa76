use candle_chart::api::{ChartBootstrap, clamp_label_anchor};
use candle_chart::core::{Sample, Viewport};
use candle_chart::render::NullRenderer;
use candle_chart::CandleChart;

fn sample_at(time: f64) -> Sample {
    Sample::new(time, 10.0, 12.0, 9.0, 11.0).expect("valid sample")
}

fn chart_with_three_candles() -> CandleChart<NullRenderer> {
    let bootstrap = ChartBootstrap {
        viewport: Viewport::new(1000, 600),
        samples: vec![sample_at(0.0), sample_at(500.0), sample_at(1000.0)],
        host_id: "chart-under-test".to_owned(),
    };
    let mut chart = CandleChart::new(NullRenderer::default(), bootstrap).expect("chart");
    chart.draw().expect("initial draw");
    chart
}

#[test]
fn hovering_a_candle_locks_the_crosshair_to_its_time() {
    let mut chart = chart_with_three_candles();
    let center_px = chart.time_to_pixel(500.0).expect("center");

    chart.pointer_move(center_px, 100.0).expect("move");
    assert_eq!(chart.crosshair_state().locked_time, Some(500.0));
}

#[test]
fn raw_moves_inside_the_slot_do_not_move_the_locked_x() {
    let mut chart = chart_with_three_candles();
    let center_px = chart.time_to_pixel(500.0).expect("center");

    chart.pointer_move(center_px, 100.0).expect("move");
    assert_eq!(chart.crosshair_state().locked_time, Some(500.0));

    // Wiggling the pointer inside the same slot keeps the exact lock time;
    // only the Y coordinate follows the cursor.
    for offset in [-20.0, -5.0, 12.0, 25.0] {
        chart
            .pointer_move(center_px + offset, 150.0 + offset)
            .expect("move");
        let crosshair = chart.crosshair_state();
        assert_eq!(crosshair.locked_time, Some(500.0));
        assert_eq!(crosshair.y, 150.0 + offset);
    }
}

#[test]
fn hover_lock_follows_the_nearest_slot_center() {
    let mut chart = chart_with_three_candles();
    let left_center = chart.time_to_pixel(0.0).expect("left");
    let mid_center = chart.time_to_pixel(500.0).expect("mid");

    // Closer to the first candle than the second.
    let x = left_center + (mid_center - left_center) * 0.2;
    chart.pointer_move(x, 100.0).expect("move");
    assert_eq!(chart.crosshair_state().locked_time, Some(0.0));
}

#[test]
fn pointer_leave_clears_lock_and_hides_crosshair() {
    let mut chart = chart_with_three_candles();
    let center_px = chart.time_to_pixel(500.0).expect("center");

    chart.pointer_move(center_px, 100.0).expect("move");
    assert!(chart.crosshair_state().visible);

    chart.pointer_leave().expect("leave");
    let crosshair = chart.crosshair_state();
    assert!(!crosshair.visible);
    assert_eq!(crosshair.locked_time, None);
}

#[test]
fn label_anchor_is_clamped_into_the_plot() {
    // Far right: the label sticks to the right edge.
    assert_eq!(clamp_label_anchor(995.0, 1000.0, 90.0), 910.0);
    // Far left: the label sticks to the left edge.
    assert_eq!(clamp_label_anchor(10.0, 1000.0, 90.0), 0.0);
    // Middle: the label centers on the anchor.
    assert_eq!(clamp_label_anchor(500.0, 1000.0, 90.0), 455.0);
}

#[test]
fn label_anchor_never_exceeds_plot_bounds() {
    for position in 0..=100 {
        let anchor = clamp_label_anchor(position as f64 * 10.0, 1000.0, 94.0);
        assert!(anchor >= 0.0);
        assert!(anchor + 94.0 <= 1000.0 + 1e-9);
    }
}
