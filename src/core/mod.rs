mod geometry;
mod price_scale;
mod sample;
mod scale;
mod spacing;
mod time_scale;
mod types;
mod windowing;

pub use geometry::{
    CandleGeometry, CandleWidths, LevelBar, LevelKind, PositionKind, PositionOverlay,
    PositionTriangle, candle_widths, project_candles, project_position_overlay,
};
pub use price_scale::{PriceScale, PriceScaleTuning};
pub use sample::{
    Sample, SampleSet, datetime_to_unix_seconds, decimal_to_f64, parse_date, samples_from_json,
};
pub use scale::LinearScale;
pub use spacing::{ONE_DAY_SECONDS, candle_spacing};
pub use time_scale::TimeScale;
pub use types::{TimeRange, Viewport};
pub use windowing::samples_in_padded_window;
