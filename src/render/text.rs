use std::path::Path;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::render::surface::TextRun;

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Parley contexts plus one registered font, shared by every text draw of a surface.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    pub(crate) font: vello_cpu::peniko::FontData,
}

impl TextLayoutEngine {
    /// Load a font file and register it with fresh Parley contexts.
    pub(crate) fn from_font_path(path: &Path) -> TickreelResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            TickreelError::render(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::from_font_bytes(bytes)
    }

    pub(crate) fn from_font_bytes(font_bytes: Vec<u8>) -> TickreelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| TickreelError::render("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| TickreelError::render("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    /// Shape a single line made of colored runs.
    pub(crate) fn layout_runs(
        &mut self,
        runs: &[TextRun<'_>],
        size_px: f32,
    ) -> TickreelResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TickreelError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let text: String = runs.iter().map(|r| r.text).collect();
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(
            TextBrushRgba8::default(),
        ));

        let mut start = 0usize;
        for run in runs {
            let end = start + run.text.len();
            builder.push(
                parley::style::StyleProperty::Brush(TextBrushRgba8::from(run.color)),
                start..end,
            );
            start = end;
        }

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(&text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}
