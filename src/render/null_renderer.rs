use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests can catch invalid geometry
/// before a real backend is introduced.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_rect_count: usize,
    pub last_line_count: usize,
    pub last_triangle_count: usize,
    pub last_text_count: usize,
    pub render_calls: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.last_rect_count = frame.rects.len();
        self.last_line_count = frame.lines.len();
        self.last_triangle_count = frame.triangles.len();
        self.last_text_count = frame.texts.len();
        self.render_calls += 1;
        Ok(())
    }

    fn clear(&mut self) -> ChartResult<()> {
        self.last_rect_count = 0;
        self.last_line_count = 0;
        self.last_triangle_count = 0;
        self.last_text_count = 0;
        Ok(())
    }
}
