use candle_chart::core::{ONE_DAY_SECONDS, TimeRange};
use candle_chart::error::ChartError;
use candle_chart::viewport::{
    GestureState, NavigationIntent, NavigationMode, ViewportEffect, ViewportMachine,
};

fn zoom_machine(range: TimeRange, plot_width: f64) -> ViewportMachine {
    let mut machine = ViewportMachine::new(range, plot_width).expect("machine");
    machine
        .apply(NavigationIntent::SetMode(NavigationMode::ZoomBox))
        .expect("set mode");
    machine
}

#[test]
fn zoom_box_commit_matches_inverted_selection_edges() {
    // 10-day dataset spanning [day0, day9] at 1000px viewport width.
    let day = ONE_DAY_SECONDS;
    let range = TimeRange::new(0.0, 9.0 * day).expect("range");
    let mut machine = zoom_machine(range, 1000.0);

    let expected_left = 9.0 * day * 50.0 / 1000.0;
    let expected_right = 9.0 * day * 200.0 / 1000.0;

    machine
        .apply(NavigationIntent::PointerDown { x_px: 50.0 })
        .expect("down");
    machine
        .apply(NavigationIntent::PointerMove { x_px: 200.0 })
        .expect("move");
    let effect = machine
        .apply(NavigationIntent::PointerUp { x_px: 200.0 })
        .expect("up");

    assert_eq!(effect, ViewportEffect::Redraw);
    let view = machine.view();
    assert!((view.range.start() - expected_left).abs() <= 1e-6);
    assert!((view.range.end() - expected_right).abs() <= 1e-6);

    let old_span = 9.0 * day;
    let new_span = expected_right - expected_left;
    assert!((view.zoom_factor - old_span / new_span).abs() <= 1e-9);
    assert_eq!(machine.gesture(), GestureState::Idle);
}

#[test]
fn selection_edges_commit_sorted_regardless_of_drag_direction() {
    let range = TimeRange::new(0.0, 1000.0).expect("range");
    let mut machine = zoom_machine(range, 1000.0);

    // Drag right-to-left.
    machine
        .apply(NavigationIntent::PointerDown { x_px: 800.0 })
        .expect("down");
    machine
        .apply(NavigationIntent::PointerUp { x_px: 300.0 })
        .expect("up");

    let view = machine.view();
    assert!((view.range.start() - 300.0).abs() <= 1e-9);
    assert!((view.range.end() - 800.0).abs() <= 1e-9);
}

#[test]
fn zoom_move_produces_overlay_without_committing() {
    let range = TimeRange::new(0.0, 1000.0).expect("range");
    let mut machine = zoom_machine(range, 1000.0);
    let before = machine.view().range;

    machine
        .apply(NavigationIntent::PointerDown { x_px: 400.0 })
        .expect("down");
    let effect = machine
        .apply(NavigationIntent::PointerMove { x_px: 150.0 })
        .expect("move");

    assert_eq!(
        effect,
        ViewportEffect::ZoomOverlay {
            from_px: 150.0,
            to_px: 400.0
        }
    );
    assert_eq!(machine.view().range, before);
}

#[test]
fn degenerate_zoom_box_is_a_silent_no_op() {
    let range = TimeRange::new(0.0, 1000.0).expect("range");
    let mut machine = zoom_machine(range, 1000.0);
    let before = machine.view();

    machine
        .apply(NavigationIntent::PointerDown { x_px: 420.0 })
        .expect("down");
    let effect = machine
        .apply(NavigationIntent::PointerUp { x_px: 420.0 })
        .expect("up");

    // The overlay is cleared but the viewport is untouched.
    assert_eq!(effect, ViewportEffect::Redraw);
    assert_eq!(machine.view().range, before.range);
    assert_eq!(machine.view().zoom_factor, before.zoom_factor);
    assert_eq!(machine.gesture(), GestureState::Idle);
}

#[test]
fn mode_switch_is_rejected_while_dragging() {
    let range = TimeRange::new(0.0, 1000.0).expect("range");
    let mut machine = zoom_machine(range, 1000.0);

    machine
        .apply(NavigationIntent::PointerDown { x_px: 100.0 })
        .expect("down");
    let err = machine
        .apply(NavigationIntent::SetMode(NavigationMode::Pan))
        .expect_err("mode switch mid-drag");
    assert!(matches!(err, ChartError::GestureInProgress));

    // Finishing the gesture unlocks mode switching again.
    machine
        .apply(NavigationIntent::PointerUp { x_px: 100.0 })
        .expect("up");
    machine
        .apply(NavigationIntent::SetMode(NavigationMode::Pan))
        .expect("mode switch when idle");
    assert_eq!(machine.view().mode, NavigationMode::Pan);
}

#[test]
fn pointer_leave_aborts_zoom_drag_and_clears_overlay() {
    let range = TimeRange::new(0.0, 1000.0).expect("range");
    let mut machine = zoom_machine(range, 1000.0);
    let before = machine.view().range;

    machine
        .apply(NavigationIntent::PointerDown { x_px: 100.0 })
        .expect("down");
    machine
        .apply(NavigationIntent::PointerMove { x_px: 600.0 })
        .expect("move");
    let effect = machine.apply(NavigationIntent::PointerLeave).expect("leave");

    assert_eq!(effect, ViewportEffect::Redraw);
    assert_eq!(machine.gesture(), GestureState::Idle);
    assert_eq!(machine.view().range, before);
}

#[test]
fn zoom_factor_is_relative_to_the_full_dataset_span() {
    let range = TimeRange::new(0.0, 1000.0).expect("range");
    let mut machine = zoom_machine(range, 1000.0);

    // First zoom: select [250, 750] -> factor 2.
    machine
        .apply(NavigationIntent::PointerDown { x_px: 250.0 })
        .expect("down");
    machine
        .apply(NavigationIntent::PointerUp { x_px: 750.0 })
        .expect("up");
    assert!((machine.view().zoom_factor - 2.0).abs() <= 1e-9);

    // Second zoom halves the window again -> factor 4 against the full span.
    machine
        .apply(NavigationIntent::PointerDown { x_px: 250.0 })
        .expect("down");
    machine
        .apply(NavigationIntent::PointerUp { x_px: 750.0 })
        .expect("up");
    assert!((machine.view().zoom_factor - 4.0).abs() <= 1e-9);
}
