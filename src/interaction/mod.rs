use serde::{Deserialize, Serialize};

/// Crosshair state exposed to hosts and consumed by the scene builder.
///
/// While a hover lock is active the X guide pins to the locked sample's
/// time; the Y guide always tracks the raw cursor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CrosshairState {
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub locked_time: Option<f64>,
}

/// Pointer/hover state mutated by the engine's event entry points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionState {
    cursor_x: f64,
    cursor_y: f64,
    crosshair: CrosshairState,
}

impl InteractionState {
    #[must_use]
    pub fn cursor(self) -> (f64, f64) {
        (self.cursor_x, self.cursor_y)
    }

    #[must_use]
    pub fn crosshair(self) -> CrosshairState {
        self.crosshair
    }

    /// Sample time the crosshair X is pinned to, if any.
    #[must_use]
    pub fn locked_time(self) -> Option<f64> {
        self.crosshair.locked_time
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.cursor_x = x;
        self.cursor_y = y;
        self.crosshair.visible = true;
        self.crosshair.x = x;
        self.crosshair.y = y;
    }

    pub fn on_pointer_leave(&mut self) {
        self.crosshair.visible = false;
        self.crosshair.locked_time = None;
    }

    /// Pins the crosshair X to a sample's exact time.
    pub fn lock_to_sample(&mut self, time: f64) {
        self.crosshair.locked_time = Some(time);
    }

    /// Releases the hover lock; the X guide tracks the raw cursor again.
    pub fn unlock(&mut self) {
        self.crosshair.locked_time = None;
    }
}
