use std::path::Path;

use vello_cpu::kurbo::Shape as _;

use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::render::frame::Frame;
use crate::render::surface::{Surface, TextRun, monospace_advance};
use crate::render::text::TextLayoutEngine;

/// CPU raster surface powered by `vello_cpu`, with Parley text shaping.
///
/// Usage per tick: [`CpuSurface::begin_frame`], draw, then [`CpuSurface::capture`].
pub struct CpuSurface {
    canvas: Canvas,
    background: Rgba8,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    text: Option<TextLayoutEngine>,
}

impl CpuSurface {
    /// Create a surface for `canvas`. Without a font, text draws are skipped.
    pub fn new(canvas: Canvas, background: Rgba8, font_path: Option<&Path>) -> TickreelResult<Self> {
        canvas.validate()?;
        let text = match font_path {
            Some(p) => Some(TextLayoutEngine::from_font_path(p)?),
            None => {
                tracing::debug!("no font configured, text will not be rasterized");
                None
            }
        };
        let (w, h) = (canvas.width as u16, canvas.height as u16);
        Ok(Self {
            canvas,
            background,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            text,
        })
    }

    /// Surface dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Clear pending draw state and paint the background.
    pub fn begin_frame(&mut self) {
        self.ctx.reset();
        let bg = self.background;
        self.fill_rect(
            Rect::new(
                0.0,
                0.0,
                f64::from(self.canvas.width),
                f64::from(self.canvas.height),
            ),
            bg,
        );
    }

    /// Rasterize everything drawn since [`CpuSurface::begin_frame`] into an RGB24 frame.
    pub fn capture(&mut self) -> TickreelResult<Frame> {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        Frame::from_premul_rgba(
            self.canvas.width,
            self.canvas.height,
            self.pixmap.data_as_u8_slice(),
            self.background,
        )
    }

    fn set_solid_paint(&mut self, color: Rgba8) {
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
    }
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

impl Surface for CpuSurface {
    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.set_solid_paint(color);
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Rgba8) {
        self.set_solid_paint(color);
        let rr = vello_cpu::kurbo::RoundedRect::from_rect(rect_to_cpu(rect), radius);
        let mut path = vello_cpu::kurbo::BezPath::new();
        for el in rr.path_elements(0.1) {
            path.push(el);
        }
        self.ctx.fill_path(&path);
    }

    fn draw_text(
        &mut self,
        origin: Point,
        runs: &[TextRun<'_>],
        size_px: f32,
    ) -> TickreelResult<()> {
        let Some(engine) = self.text.as_mut() else {
            return Ok(());
        };
        let layout = engine.layout_runs(runs, size_px)?;

        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&engine.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }

    fn measure_text(&mut self, text: &str, size_px: f32) -> TickreelResult<f64> {
        let Some(engine) = self.text.as_mut() else {
            return Ok(monospace_advance(text, size_px));
        };
        let layout = engine
            .layout_runs(
                &[TextRun {
                    text,
                    color: Rgba8::opaque(255, 255, 255),
                }],
                size_px,
            )
            .map_err(|e| TickreelError::render(format!("measure '{text}': {e}")))?;
        Ok(f64::from(layout.width()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
