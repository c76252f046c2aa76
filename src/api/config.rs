use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};

/// Layout/behavior configuration plus the dimensions derived from it.
///
/// Derived fields depend on the outer size, paddings, decimal precision and
/// the dataset's max price; [`ChartConfig::recompute_derived`] must run
/// after any of those change so no stale dimension leaks into a redraw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub padding_left: f64,
    pub padding_top: f64,
    pub padding_bottom: f64,
    pub candle_tail_width: f64,
    pub char_width: f64,
    pub decimal: usize,
    pub time_format: String,
    pub x_label_font_size: f64,
    pub y_label_font_size: f64,
    pub x_label_width: f64,
    pub x_label_height: f64,
    pub y_label_height: f64,
    pub y_padding_scale_top: f64,
    pub y_padding_scale_bottom: f64,
    pub selector_dash_on: f64,
    pub selector_dash_off: f64,
    pub x_tick_count: usize,
    pub y_tick_count: usize,

    #[serde(default)]
    derived: DerivedDimensions,
}

/// Dimensions recomputed from the explicit fields and the data's max price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DerivedDimensions {
    pub info_text_width: f64,
    pub info_text_width_meta: f64,
    pub y_label_width: f64,
    pub padding_right: f64,
    pub plot_width: f64,
    pub plot_height: f64,
}

impl ChartConfig {
    /// Builds the default configuration for an outer pixel size.
    ///
    /// Derived dimensions start from a max price of 1.0; the engine
    /// recomputes them once the dataset is known.
    pub fn new(viewport: Viewport) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let mut config = Self {
            width: viewport.width,
            height: viewport.height,
            padding_left: 10.0,
            padding_top: 10.0,
            padding_bottom: 20.0,
            candle_tail_width: 1.0,
            char_width: 8.0,
            decimal: 2,
            time_format: "%Y-%m-%d %H:%M".to_owned(),
            x_label_font_size: 11.0,
            y_label_font_size: 11.0,
            x_label_width: 94.0,
            x_label_height: 20.0,
            y_label_height: 20.0,
            y_padding_scale_top: 0.05,
            y_padding_scale_bottom: 0.05,
            selector_dash_on: 4.0,
            selector_dash_off: 4.0,
            x_tick_count: 6,
            y_tick_count: 8,
            derived: DerivedDimensions::default(),
        };
        config.recompute_derived(1.0)?;
        Ok(config)
    }

    #[must_use]
    pub fn derived(&self) -> DerivedDimensions {
        self.derived
    }

    /// Restricted host-facing view of the configuration.
    #[must_use]
    pub fn view(&self) -> ConfigView {
        ConfigView {
            candle_tail_width: self.candle_tail_width,
            width: self.width,
            height: self.height,
            x_label_font_size: self.x_label_font_size,
            y_label_font_size: self.y_label_font_size,
            decimal: self.decimal,
            time_format: self.time_format.clone(),
        }
    }

    /// Merge-applies a partial update, then recomputes derived dimensions.
    pub fn apply(&mut self, patch: ConfigPatch, max_price: f64) -> ChartResult<()> {
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(value) = patch.padding_left {
            self.padding_left = value;
        }
        if let Some(value) = patch.padding_top {
            self.padding_top = value;
        }
        if let Some(value) = patch.padding_bottom {
            self.padding_bottom = value;
        }
        if let Some(value) = patch.candle_tail_width {
            self.candle_tail_width = value;
        }
        if let Some(value) = patch.char_width {
            self.char_width = value;
        }
        if let Some(value) = patch.decimal {
            self.decimal = value;
        }
        if let Some(value) = patch.time_format {
            self.time_format = value;
        }
        if let Some(value) = patch.x_label_font_size {
            self.x_label_font_size = value;
        }
        if let Some(value) = patch.y_label_font_size {
            self.y_label_font_size = value;
        }
        if let Some(value) = patch.x_label_width {
            self.x_label_width = value;
        }
        if let Some(value) = patch.x_label_height {
            self.x_label_height = value;
        }
        if let Some(value) = patch.y_label_height {
            self.y_label_height = value;
        }
        if let Some(value) = patch.y_padding_scale_top {
            self.y_padding_scale_top = value;
        }
        if let Some(value) = patch.y_padding_scale_bottom {
            self.y_padding_scale_bottom = value;
        }
        if let Some(value) = patch.selector_dash_on {
            self.selector_dash_on = value;
        }
        if let Some(value) = patch.selector_dash_off {
            self.selector_dash_off = value;
        }
        if let Some(value) = patch.x_tick_count {
            self.x_tick_count = value;
        }
        if let Some(value) = patch.y_tick_count {
            self.y_tick_count = value;
        }

        self.recompute_derived(max_price)
    }

    /// Recomputes every dependent dimension from the current fields.
    ///
    /// Label widths assume monospace rendering, so they derive from the
    /// formatted max price's digit count times the per-character width.
    pub fn recompute_derived(&mut self, max_price: f64) -> ChartResult<()> {
        self.validate()?;

        let digits = format!("{:.*}", self.decimal, max_price).len() as f64;
        let info_text_width = (digits * 4.0 + 11.0) * self.char_width;
        let info_text_width_meta = (digits * 3.0 + 14.0) * self.char_width;
        let y_label_width = 2.5 + digits * self.char_width;
        let padding_right = y_label_width;
        let plot_width = f64::from(self.width) - (self.padding_left + padding_right) - 2.0;
        let plot_height = f64::from(self.height) - (self.padding_bottom + self.padding_top + 6.0);

        if plot_width <= 0.0 || plot_height <= 0.0 {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }

        self.derived = DerivedDimensions {
            info_text_width,
            info_text_width_meta,
            y_label_width,
            padding_right,
            plot_width,
            plot_height,
        };
        Ok(())
    }

    fn validate(&self) -> ChartResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        for (name, value) in [
            ("padding_left", self.padding_left),
            ("padding_top", self.padding_top),
            ("padding_bottom", self.padding_bottom),
            ("candle_tail_width", self.candle_tail_width),
            ("char_width", self.char_width),
            ("x_label_font_size", self.x_label_font_size),
            ("y_label_font_size", self.y_label_font_size),
            ("x_label_width", self.x_label_width),
            ("x_label_height", self.x_label_height),
            ("y_label_height", self.y_label_height),
            ("selector_dash_on", self.selector_dash_on),
            ("selector_dash_off", self.selector_dash_off),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "config `{name}` must be finite and > 0"
                )));
            }
        }
        for (name, value) in [
            ("y_padding_scale_top", self.y_padding_scale_top),
            ("y_padding_scale_bottom", self.y_padding_scale_bottom),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "config `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

/// Partial configuration update; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigPatch {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub padding_left: Option<f64>,
    #[serde(default)]
    pub padding_top: Option<f64>,
    #[serde(default)]
    pub padding_bottom: Option<f64>,
    #[serde(default)]
    pub candle_tail_width: Option<f64>,
    #[serde(default)]
    pub char_width: Option<f64>,
    #[serde(default)]
    pub decimal: Option<usize>,
    #[serde(default)]
    pub time_format: Option<String>,
    #[serde(default)]
    pub x_label_font_size: Option<f64>,
    #[serde(default)]
    pub y_label_font_size: Option<f64>,
    #[serde(default)]
    pub x_label_width: Option<f64>,
    #[serde(default)]
    pub x_label_height: Option<f64>,
    #[serde(default)]
    pub y_label_height: Option<f64>,
    #[serde(default)]
    pub y_padding_scale_top: Option<f64>,
    #[serde(default)]
    pub y_padding_scale_bottom: Option<f64>,
    #[serde(default)]
    pub selector_dash_on: Option<f64>,
    #[serde(default)]
    pub selector_dash_off: Option<f64>,
    #[serde(default)]
    pub x_tick_count: Option<usize>,
    #[serde(default)]
    pub y_tick_count: Option<usize>,
}

/// The restricted configuration subset exposed to hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigView {
    pub candle_tail_width: f64,
    pub width: u32,
    pub height: u32,
    pub x_label_font_size: f64,
    pub y_label_font_size: f64,
    pub decimal: usize,
    pub time_format: String,
}
