use crate::error::{ChartError, ChartResult};
use crate::render::{LinePrimitive, RectPrimitive, TextPrimitive, TrianglePrimitive};

/// Backend-agnostic scene for one chart draw pass.
///
/// Primitive lists are drawn in order: rects, lines, triangles, texts. The
/// orchestrator rebuilds the whole frame on every commit, so backends may
/// simply clear and replay it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub plot_width_px: f64,
    pub plot_height_px: f64,
    pub rects: Vec<RectPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub triangles: Vec<TrianglePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(plot_width_px: f64, plot_height_px: f64) -> Self {
        Self {
            plot_width_px,
            plot_height_px,
            rects: Vec::new(),
            lines: Vec::new(),
            triangles: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn push_rect(&mut self, rect: RectPrimitive) {
        self.rects.push(rect);
    }

    pub fn push_line(&mut self, line: LinePrimitive) {
        self.lines.push(line);
    }

    pub fn push_triangle(&mut self, triangle: TrianglePrimitive) {
        self.triangles.push(triangle);
    }

    pub fn push_text(&mut self, text: TextPrimitive) {
        self.texts.push(text);
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.plot_width_px.is_finite()
            || !self.plot_height_px.is_finite()
            || self.plot_width_px <= 0.0
            || self.plot_height_px <= 0.0
        {
            return Err(ChartError::InvalidData(
                "render frame plot size must be finite and > 0".to_owned(),
            ));
        }

        for rect in &self.rects {
            rect.validate()?;
        }
        for line in &self.lines {
            line.validate()?;
        }
        for triangle in &self.triangles {
            triangle.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
            && self.lines.is_empty()
            && self.triangles.is_empty()
            && self.texts.is_empty()
    }
}
