//! Decoded artwork image

use crate::types::{ComposeError, Result};
use image::RgbaImage;
use tiny_skia::{IntSize, Pixmap};

/// The customer's artwork, decoded to straight-alpha RGBA
#[derive(Debug, Clone)]
pub struct Artwork {
    image: RgbaImage,
}

impl Artwork {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Decode any format `image` understands (PNG and JPEG here)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        if image.width() == 0 || image.height() == 0 {
            return Err(ComposeError::ArtworkUnavailable(
                "image has no pixels".to_string(),
            ));
        }
        Ok(Self { image })
    }

    /// Pixel size as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Premultiplied copy for drawing with tiny-skia
    pub fn to_pixmap(&self) -> Result<Pixmap> {
        let (width, height) = self.dimensions();
        let mut data = self.image.as_raw().clone();
        for px in data.chunks_exact_mut(4) {
            let alpha = px[3] as u16;
            if alpha < 255 {
                for channel in &mut px[..3] {
                    *channel = ((*channel as u16 * alpha + 127) / 255) as u8;
                }
            }
        }

        let size = IntSize::from_wh(width, height).ok_or_else(|| {
            ComposeError::ArtworkUnavailable(format!("bad artwork size {width}x{height}"))
        })?;
        Pixmap::from_vec(data, size).ok_or_else(|| {
            ComposeError::ArtworkUnavailable("artwork buffer does not match its size".to_string())
        })
    }
}
