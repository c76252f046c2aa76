use serde::{Deserialize, Serialize};

use crate::render::Color;

/// Semantic color assignments for every rendered role.
///
/// Hosts restyle the chart by merging a [`PalettePatch`]; unspecified roles
/// keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub background: Color,
    pub grid: Color,
    pub tick_text: Color,
    pub up_candle_fill: Color,
    pub up_candle_stroke: Color,
    pub up_candle_tail: Color,
    pub down_candle_fill: Color,
    pub down_candle_stroke: Color,
    pub down_candle_tail: Color,
    pub long_fill: Color,
    pub long_stroke: Color,
    pub short_fill: Color,
    pub short_stroke: Color,
    pub sl_fill: Color,
    pub sl_stroke: Color,
    pub tp_fill: Color,
    pub tp_stroke: Color,
    pub selector_line: Color,
    pub selector_label_background: Color,
    pub selector_label_text: Color,
    pub info_text: Color,
    pub info_text_up: Color,
    pub info_text_down: Color,
    pub zoom_overlay: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::rgb(0.08, 0.09, 0.11),
            grid: Color::rgba(1.0, 1.0, 1.0, 0.08),
            tick_text: Color::rgb(0.62, 0.65, 0.70),
            up_candle_fill: Color::rgb(0.05, 0.60, 0.42),
            up_candle_stroke: Color::rgb(0.05, 0.60, 0.42),
            up_candle_tail: Color::rgb(0.05, 0.60, 0.42),
            down_candle_fill: Color::rgb(0.86, 0.24, 0.26),
            down_candle_stroke: Color::rgb(0.86, 0.24, 0.26),
            down_candle_tail: Color::rgb(0.86, 0.24, 0.26),
            long_fill: Color::rgb(0.18, 0.72, 0.47),
            long_stroke: Color::rgb(0.10, 0.45, 0.30),
            short_fill: Color::rgb(0.92, 0.40, 0.26),
            short_stroke: Color::rgb(0.60, 0.22, 0.14),
            sl_fill: Color::rgb(0.95, 0.35, 0.35),
            sl_stroke: Color::rgb(0.62, 0.18, 0.18),
            tp_fill: Color::rgb(0.30, 0.78, 0.55),
            tp_stroke: Color::rgb(0.14, 0.50, 0.33),
            selector_line: Color::rgba(0.80, 0.82, 0.85, 0.9),
            selector_label_background: Color::rgb(0.22, 0.24, 0.28),
            selector_label_text: Color::rgb(0.92, 0.93, 0.95),
            info_text: Color::rgb(0.85, 0.86, 0.88),
            info_text_up: Color::rgb(0.25, 0.80, 0.55),
            info_text_down: Color::rgb(0.95, 0.45, 0.45),
            zoom_overlay: Color::rgba(0.0, 0.0, 0.0, 0.5),
        }
    }
}

impl Palette {
    /// Merge-applies a partial update; `None` fields keep current values.
    pub fn apply(&mut self, patch: PalettePatch) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = patch.$field {
                    self.$field = value;
                })*
            };
        }
        merge!(
            background,
            grid,
            tick_text,
            up_candle_fill,
            up_candle_stroke,
            up_candle_tail,
            down_candle_fill,
            down_candle_stroke,
            down_candle_tail,
            long_fill,
            long_stroke,
            short_fill,
            short_stroke,
            sl_fill,
            sl_stroke,
            tp_fill,
            tp_stroke,
            selector_line,
            selector_label_background,
            selector_label_text,
            info_text,
            info_text_up,
            info_text_down,
            zoom_overlay,
        );
    }
}

/// Partial palette update; every field is optional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PalettePatch {
    #[serde(default)]
    pub background: Option<Color>,
    #[serde(default)]
    pub grid: Option<Color>,
    #[serde(default)]
    pub tick_text: Option<Color>,
    #[serde(default)]
    pub up_candle_fill: Option<Color>,
    #[serde(default)]
    pub up_candle_stroke: Option<Color>,
    #[serde(default)]
    pub up_candle_tail: Option<Color>,
    #[serde(default)]
    pub down_candle_fill: Option<Color>,
    #[serde(default)]
    pub down_candle_stroke: Option<Color>,
    #[serde(default)]
    pub down_candle_tail: Option<Color>,
    #[serde(default)]
    pub long_fill: Option<Color>,
    #[serde(default)]
    pub long_stroke: Option<Color>,
    #[serde(default)]
    pub short_fill: Option<Color>,
    #[serde(default)]
    pub short_stroke: Option<Color>,
    #[serde(default)]
    pub sl_fill: Option<Color>,
    #[serde(default)]
    pub sl_stroke: Option<Color>,
    #[serde(default)]
    pub tp_fill: Option<Color>,
    #[serde(default)]
    pub tp_stroke: Option<Color>,
    #[serde(default)]
    pub selector_line: Option<Color>,
    #[serde(default)]
    pub selector_label_background: Option<Color>,
    #[serde(default)]
    pub selector_label_text: Option<Color>,
    #[serde(default)]
    pub info_text: Option<Color>,
    #[serde(default)]
    pub info_text_up: Option<Color>,
    #[serde(default)]
    pub info_text_down: Option<Color>,
    #[serde(default)]
    pub zoom_overlay: Option<Color>,
}
