//! JPEG payloads for page images

use crate::render::RasterPage;
use crate::types::{ComposeError, Result};
use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;

/// A page image ready to embed with `/DCTDecode`
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedPage {
    pub width_px: u32,
    pub height_px: u32,
    pub payload: Vec<u8>,
}

pub fn encode_page(page: &RasterPage, quality: u8) -> Result<EncodedPage> {
    if !(1..=100).contains(&quality) {
        return Err(ComposeError::Encode(format!(
            "JPEG quality must be 1-100, got {quality}"
        )));
    }

    let mut payload = Vec::new();
    JpegEncoder::new_with_quality(&mut payload, quality).encode(
        page.image.as_raw(),
        page.width_px(),
        page.height_px(),
        ExtendedColorType::Rgb8,
    )?;

    Ok(EncodedPage {
        width_px: page.width_px(),
        height_px: page.height_px(),
        payload,
    })
}

pub fn encode_pages(pages: &[RasterPage], quality: u8) -> Result<Vec<EncodedPage>> {
    pages.iter().map(|page| encode_page(page, quality)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_payload_is_jpeg() {
        let page = RasterPage {
            image: RgbImage::from_pixel(16, 8, Rgb([200, 10, 10])),
        };
        let encoded = encode_page(&page, 90).unwrap();
        assert_eq!((encoded.width_px, encoded.height_px), (16, 8));
        assert_eq!(&encoded.payload[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_rejects_zero_quality() {
        let page = RasterPage {
            image: RgbImage::new(2, 2),
        };
        assert!(matches!(encode_page(&page, 0), Err(ComposeError::Encode(_))));
    }
}
