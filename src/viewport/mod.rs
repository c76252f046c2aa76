//! Viewport state machine: zoom range, zoom factor and gesture handling.
//!
//! Pointer events arrive as [`NavigationIntent`] values and are applied by a
//! single reducer ([`ViewportMachine::apply`]). Each intent is one atomic
//! transition: the machine never exposes a half-committed range, and every
//! commit recreates the [`ViewportState`] rather than merging into it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{TimeRange, TimeScale};
use crate::error::{ChartError, ChartResult};

/// Multiplicative step applied to the zoom factor per wheel notch.
const WHEEL_ZOOM_IN_STEP: f64 = 1.1;
const WHEEL_ZOOM_OUT_STEP: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NavigationMode {
    /// Dragging scrolls the visible range, committing live on every move.
    #[default]
    Pan,
    /// Dragging selects a time box; the range commits on release.
    ZoomBox,
}

/// Public viewport snapshot: the visible time window and zoom factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub range: TimeRange,
    pub zoom_factor: f64,
    pub mode: NavigationMode,
}

/// Ephemeral drag anchor; lives only for one down→up sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DragAnchor {
    /// Time value under the cursor at pointer-down, the pan pivot.
    Pan { anchor_time: f64 },
    /// Fixed edge of the selection box plus the latest moving edge.
    ZoomBox { anchor_px: f64, last_px: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(DragAnchor),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelDirection {
    In,
    Out,
}

/// One pointer/gesture event, normalized to plot-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NavigationIntent {
    PointerDown { x_px: f64 },
    PointerMove { x_px: f64 },
    PointerUp { x_px: f64 },
    PointerLeave,
    Wheel { direction: WheelDirection, x_px: f64 },
    SetMode(NavigationMode),
}

/// What the orchestrator must do after an intent was applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ViewportEffect {
    /// No visible change.
    None,
    /// The zoom range changed; rebuild the scene from the new window.
    Redraw,
    /// A zoom selection is in flight; redraw only the dim overlay.
    ZoomOverlay { from_px: f64, to_px: f64 },
}

/// Owns the current viewport and applies navigation intents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportMachine {
    state: ViewportState,
    gesture: GestureState,
    /// Full dataset extent; the zoom factor is kept relative to this span
    /// so wheel zoom and box zoom compose through the same quantity.
    full_range: TimeRange,
    plot_width_px: f64,
}

impl ViewportMachine {
    /// Starts fully zoomed out over the dataset extent in pan mode.
    pub fn new(full_range: TimeRange, plot_width_px: f64) -> ChartResult<Self> {
        validate_plot_width(plot_width_px)?;
        Ok(Self {
            state: ViewportState {
                range: full_range,
                zoom_factor: 1.0,
                mode: NavigationMode::Pan,
            },
            gesture: GestureState::Idle,
            full_range,
            plot_width_px,
        })
    }

    #[must_use]
    pub fn view(&self) -> ViewportState {
        self.state
    }

    #[must_use]
    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    #[must_use]
    pub fn full_range(&self) -> TimeRange {
        self.full_range
    }

    /// Updates the plot width after a config change or host resize.
    pub fn set_plot_width(&mut self, plot_width_px: f64) -> ChartResult<()> {
        validate_plot_width(plot_width_px)?;
        self.plot_width_px = plot_width_px;
        Ok(())
    }

    /// Applies one intent as a single atomic transition.
    pub fn apply(&mut self, intent: NavigationIntent) -> ChartResult<ViewportEffect> {
        match intent {
            NavigationIntent::SetMode(mode) => self.set_mode(mode),
            NavigationIntent::PointerDown { x_px } => self.pointer_down(x_px),
            NavigationIntent::PointerMove { x_px } => self.pointer_move(x_px),
            NavigationIntent::PointerUp { x_px } => self.pointer_up(x_px),
            NavigationIntent::PointerLeave => Ok(self.pointer_leave()),
            NavigationIntent::Wheel { direction, x_px } => self.wheel(direction, x_px),
        }
    }

    fn set_mode(&mut self, mode: NavigationMode) -> ChartResult<ViewportEffect> {
        if self.gesture != GestureState::Idle {
            return Err(ChartError::GestureInProgress);
        }
        self.state.mode = mode;
        Ok(ViewportEffect::None)
    }

    fn pointer_down(&mut self, x_px: f64) -> ChartResult<ViewportEffect> {
        validate_pixel(x_px)?;
        if self.gesture != GestureState::Idle {
            return Ok(ViewportEffect::None);
        }

        let anchor = match self.state.mode {
            NavigationMode::Pan => DragAnchor::Pan {
                anchor_time: self.invert(x_px)?,
            },
            NavigationMode::ZoomBox => DragAnchor::ZoomBox {
                anchor_px: x_px,
                last_px: x_px,
            },
        };
        self.gesture = GestureState::Dragging(anchor);
        Ok(ViewportEffect::None)
    }

    fn pointer_move(&mut self, x_px: f64) -> ChartResult<ViewportEffect> {
        validate_pixel(x_px)?;
        match self.gesture {
            GestureState::Idle => Ok(ViewportEffect::None),
            GestureState::Dragging(DragAnchor::Pan { anchor_time }) => {
                // Live pan: the time grabbed at pointer-down stays under the
                // cursor, so the window slides by the cursor displacement.
                let window_width = self.state.range.span();
                let fraction = x_px / self.plot_width_px;
                let new_start = anchor_time - fraction * window_width;
                let new_end = new_start + window_width;
                self.commit(TimeRange::new(new_start, new_end)?, self.state.zoom_factor);
                Ok(ViewportEffect::Redraw)
            }
            GestureState::Dragging(DragAnchor::ZoomBox { anchor_px, .. }) => {
                self.gesture = GestureState::Dragging(DragAnchor::ZoomBox {
                    anchor_px,
                    last_px: x_px,
                });
                Ok(ViewportEffect::ZoomOverlay {
                    from_px: anchor_px.min(x_px),
                    to_px: anchor_px.max(x_px),
                })
            }
        }
    }

    fn pointer_up(&mut self, x_px: f64) -> ChartResult<ViewportEffect> {
        validate_pixel(x_px)?;
        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            GestureState::Idle | GestureState::Dragging(DragAnchor::Pan { .. }) => {
                Ok(ViewportEffect::None)
            }
            GestureState::Dragging(DragAnchor::ZoomBox { anchor_px, .. }) => {
                let edge_a = self.invert(anchor_px)?;
                let edge_b = self.invert(x_px)?;
                if edge_a == edge_b {
                    // A zero-width box is a click, not a zoom.
                    return Ok(ViewportEffect::Redraw);
                }

                let range = TimeRange::new(edge_a, edge_b)?;
                let zoom_factor = self.full_range.span() / range.span();
                self.commit(range, zoom_factor);
                Ok(ViewportEffect::Redraw)
            }
        }
    }

    /// Aborts any in-flight drag, e.g. on lost pointer capture.
    fn pointer_leave(&mut self) -> ViewportEffect {
        let aborted_zoom = matches!(
            self.gesture,
            GestureState::Dragging(DragAnchor::ZoomBox { .. })
        );
        self.gesture = GestureState::Idle;
        if aborted_zoom {
            ViewportEffect::Redraw
        } else {
            ViewportEffect::None
        }
    }

    /// Wheel zoom around the cursor; available in any gesture state.
    fn wheel(&mut self, direction: WheelDirection, x_px: f64) -> ChartResult<ViewportEffect> {
        validate_pixel(x_px)?;
        let step = match direction {
            WheelDirection::In => WHEEL_ZOOM_IN_STEP,
            WheelDirection::Out => WHEEL_ZOOM_OUT_STEP,
        };
        let zoom_factor = self.state.zoom_factor * step;
        let new_width = self.full_range.span() / zoom_factor;

        // Pivot so the time under the cursor stays under the cursor.
        let target = self.invert(x_px)?;
        let left = target - new_width * x_px / self.plot_width_px;
        let right = left + new_width;

        self.commit(TimeRange::new(left, right)?, zoom_factor);
        Ok(ViewportEffect::Redraw)
    }

    fn commit(&mut self, range: TimeRange, zoom_factor: f64) {
        debug!(
            start = range.start(),
            end = range.end(),
            zoom_factor,
            "viewport commit"
        );
        self.state = ViewportState {
            range,
            zoom_factor,
            mode: self.state.mode,
        };
    }

    fn invert(&self, x_px: f64) -> ChartResult<f64> {
        TimeScale::from_range(self.state.range).pixel_to_time(x_px, self.plot_width_px)
    }
}

fn validate_plot_width(plot_width_px: f64) -> ChartResult<()> {
    if !plot_width_px.is_finite() || plot_width_px <= 0.0 {
        return Err(ChartError::InvalidData(
            "plot width must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}

fn validate_pixel(x_px: f64) -> ChartResult<()> {
    if !x_px.is_finite() {
        return Err(ChartError::InvalidData(
            "pointer position must be finite".to_owned(),
        ));
    }
    Ok(())
}
