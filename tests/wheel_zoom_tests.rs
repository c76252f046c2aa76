use candle_chart::core::TimeRange;
use candle_chart::viewport::{
    GestureState, NavigationIntent, ViewportEffect, ViewportMachine, WheelDirection,
};

fn machine() -> ViewportMachine {
    let range = TimeRange::new(0.0, 1000.0).expect("range");
    ViewportMachine::new(range, 1000.0).expect("machine")
}

fn wheel(machine: &mut ViewportMachine, direction: WheelDirection, x_px: f64) -> ViewportEffect {
    machine
        .apply(NavigationIntent::Wheel { direction, x_px })
        .expect("wheel")
}

#[test]
fn wheel_in_multiplies_zoom_factor_by_1_1() {
    let mut machine = machine();
    wheel(&mut machine, WheelDirection::In, 500.0);
    assert!((machine.view().zoom_factor - 1.1).abs() <= 1e-9);

    wheel(&mut machine, WheelDirection::In, 500.0);
    assert!((machine.view().zoom_factor - 1.21).abs() <= 1e-9);
}

#[test]
fn wheel_out_multiplies_zoom_factor_by_0_9() {
    let mut machine = machine();
    wheel(&mut machine, WheelDirection::Out, 500.0);
    assert!((machine.view().zoom_factor - 0.9).abs() <= 1e-9);
}

#[test]
fn wheel_window_width_is_full_span_over_zoom_factor() {
    let mut machine = machine();
    wheel(&mut machine, WheelDirection::In, 500.0);

    let expected_width = 1000.0 / 1.1;
    assert!((machine.view().range.span() - expected_width).abs() <= 1e-6);
}

#[test]
fn wheel_keeps_the_time_under_the_cursor_fixed() {
    let mut machine = machine();
    let cursor_px = 321.0;

    for direction in [
        WheelDirection::In,
        WheelDirection::In,
        WheelDirection::Out,
        WheelDirection::In,
    ] {
        let view = machine.view();
        let before = view.range.start() + view.range.span() * cursor_px / 1000.0;
        wheel(&mut machine, direction, cursor_px);

        let view = machine.view();
        let after = view.range.start() + view.range.span() * cursor_px / 1000.0;

        // The drift must stay below one pixel-equivalent of time.
        let pixel_equivalent = view.range.span() / 1000.0;
        assert!(
            (after - before).abs() < pixel_equivalent,
            "pivot drifted by {} (> {})",
            (after - before).abs(),
            pixel_equivalent
        );
    }
}

#[test]
fn wheel_at_left_edge_keeps_left_edge_fixed() {
    let mut machine = machine();
    wheel(&mut machine, WheelDirection::In, 0.0);

    let view = machine.view();
    assert!((view.range.start() - 0.0).abs() <= 1e-9);
}

#[test]
fn wheel_requires_no_pointer_down_and_stays_idle() {
    let mut machine = machine();
    let effect = wheel(&mut machine, WheelDirection::In, 400.0);

    assert_eq!(effect, ViewportEffect::Redraw);
    assert_eq!(machine.gesture(), GestureState::Idle);
}

#[test]
fn wheel_in_then_out_returns_near_original_width() {
    let mut machine = machine();
    wheel(&mut machine, WheelDirection::In, 500.0);
    wheel(&mut machine, WheelDirection::Out, 500.0);

    // 1.1 * 0.9 = 0.99: slightly wider than the original window.
    let expected = 1000.0 / 0.99;
    assert!((machine.view().range.span() - expected).abs() <= 1e-6);
}
