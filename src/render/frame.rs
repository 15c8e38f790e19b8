use std::path::Path;
use std::sync::Arc;

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::foundation::math::mul_div255_u16;

/// A rendered frame as packed RGB24.
///
/// Rows run top-to-bottom, three bytes per pixel in R,G,B order (ffmpeg `rgb24`). The pixel
/// buffer is shared and immutable, so cloning a frame is cheap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Arc<[u8]>,
}

impl Frame {
    /// Wrap an RGB24 buffer. Fails unless `data.len() == width * height * 3`.
    pub fn from_rgb24(width: u32, height: u32, data: Vec<u8>) -> TickreelResult<Self> {
        let expected = Canvas { width, height }.rgb24_len();
        if data.len() != expected {
            return Err(TickreelError::validation(format!(
                "frame buffer is {} bytes, expected {expected} for {width}x{height} rgb24",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data: data.into(),
        })
    }

    /// A frame filled with one opaque color.
    pub fn solid(width: u32, height: u32, color: Rgba8) -> Self {
        let px = (width as usize).saturating_mul(height as usize);
        let mut data = Vec::with_capacity(px * 3);
        for _ in 0..px {
            data.extend_from_slice(&[color.r, color.g, color.b]);
        }
        Self {
            width,
            height,
            data: data.into(),
        }
    }

    /// Flatten premultiplied RGBA8 pixels over an opaque background into RGB24.
    pub fn from_premul_rgba(
        width: u32,
        height: u32,
        rgba_premul: &[u8],
        bg: Rgba8,
    ) -> TickreelResult<Self> {
        let px = (width as usize).saturating_mul(height as usize);
        if rgba_premul.len() != px.saturating_mul(4) {
            return Err(TickreelError::validation(format!(
                "rgba buffer is {} bytes, expected {} for {width}x{height}",
                rgba_premul.len(),
                px * 4
            )));
        }

        let bg_r = u16::from(bg.r);
        let bg_g = u16::from(bg.g);
        let bg_b = u16::from(bg.b);

        let mut data = Vec::with_capacity(px * 3);
        for s in rgba_premul.chunks_exact(4) {
            let a = u16::from(s[3]);
            if a == 255 {
                data.extend_from_slice(&s[..3]);
                continue;
            }
            let inv = 255u16 - a;
            let r = u16::from(s[0]) + mul_div255_u16(bg_r, inv);
            let g = u16::from(s[1]) + mul_div255_u16(bg_g, inv);
            let b = u16::from(s[2]) + mul_div255_u16(bg_b, inv);
            data.extend_from_slice(&[r.min(255) as u8, g.min(255) as u8, b.min(255) as u8]);
        }

        Ok(Self {
            width,
            height,
            data: data.into(),
        })
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed RGB24 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// RGB triple at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Write the frame as a PNG, creating parent directories as needed.
    pub fn save_png(&self, path: &Path) -> TickreelResult<()> {
        use anyhow::Context as _;

        crate::encode::ffmpeg::ensure_parent_dir(path)?;
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
