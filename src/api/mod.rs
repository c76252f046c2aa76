mod config;
mod engine;
mod host;
mod palette;
mod scene;

pub use config::{ChartConfig, ConfigPatch, ConfigView, DerivedDimensions};
pub use engine::{CandleChart, ChartBootstrap};
pub use host::{HostAdapter, StaticHost};
pub use palette::{Palette, PalettePatch};
pub use scene::{HitRegion, SceneGraph, SceneHandle, SceneNode, SceneRole, clamp_label_anchor};
