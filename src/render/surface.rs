use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::TickreelResult;

/// One contiguous run of same-colored text within a line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextRun<'a> {
    /// Run text. Runs of a line are laid out back to back.
    pub text: &'a str,
    /// Fill color of the run.
    pub color: Rgba8,
}

/// Drawing boundary between animated objects and the presentation backend.
///
/// Objects only need rectangle fills and text blits; everything else stays on the backend side.
pub trait Surface {
    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Rgba8);

    /// Fill a rectangle with rounded corners.
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Rgba8);

    /// Draw a single line of text with its top-left corner at `origin`.
    fn draw_text(&mut self, origin: Point, runs: &[TextRun<'_>], size_px: f32)
    -> TickreelResult<()>;

    /// Horizontal advance of `text` at `size_px`.
    fn measure_text(&mut self, text: &str, size_px: f32) -> TickreelResult<f64>;
}

/// Advance used when no font is available: a monospace cell of 0.55em.
pub fn monospace_advance(text: &str, size_px: f32) -> f64 {
    text.chars().count() as f64 * f64::from(size_px) * 0.55
}

/// A recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// [`Surface::fill_rect`].
    Rect { rect: Rect, color: Rgba8 },
    /// [`Surface::fill_rounded_rect`].
    RoundedRect {
        rect: Rect,
        radius: f64,
        color: Rgba8,
    },
    /// [`Surface::draw_text`], runs flattened to `(text, color)` pairs.
    Text {
        origin: Point,
        runs: Vec<(String, Rgba8)>,
        size_px: f32,
    },
}

/// Surface that records draw calls instead of rasterizing. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    /// Create an empty recording surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls in submission order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Only the plain rectangle fills, in submission order.
    pub fn rects(&self) -> Vec<(Rect, Rgba8)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.ops.push(DrawOp::Rect { rect, color });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Rgba8) {
        self.ops.push(DrawOp::RoundedRect {
            rect,
            radius,
            color,
        });
    }

    fn draw_text(
        &mut self,
        origin: Point,
        runs: &[TextRun<'_>],
        size_px: f32,
    ) -> TickreelResult<()> {
        self.ops.push(DrawOp::Text {
            origin,
            runs: runs
                .iter()
                .map(|r| (r.text.to_owned(), r.color))
                .collect(),
            size_px,
        });
        Ok(())
    }

    fn measure_text(&mut self, text: &str, size_px: f32) -> TickreelResult<f64> {
        Ok(monospace_advance(text, size_px))
    }
}
