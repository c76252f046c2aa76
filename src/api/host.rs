use crate::core::Viewport;

/// Contract the embedding environment fulfills for the chart.
///
/// The host reports its current surface size (responsive resize) and maps
/// device pointer coordinates into plot-local pixels, accounting for any
/// layout offset or CSS-style scaling between the two spaces.
pub trait HostAdapter {
    fn surface_size(&self) -> Viewport;

    fn to_plot_local(&self, device_x: f64, device_y: f64) -> (f64, f64);
}

/// Fixed-transform host used by tests and headless embedding.
///
/// Applies `local = (device - offset) * scale`, the affine inverse of a
/// translated, uniformly scaled surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticHost {
    pub size: Viewport,
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl StaticHost {
    #[must_use]
    pub fn new(size: Viewport) -> Self {
        Self {
            size,
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset_x: f64, offset_y: f64) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

impl HostAdapter for StaticHost {
    fn surface_size(&self) -> Viewport {
        self.size
    }

    fn to_plot_local(&self, device_x: f64, device_y: f64) -> (f64, f64) {
        (
            (device_x - self.offset_x) * self.scale,
            (device_y - self.offset_y) * self.scale,
        )
    }
}
