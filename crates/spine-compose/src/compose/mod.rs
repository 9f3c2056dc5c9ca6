//! Composition pipeline: session → raster pages → PDF bytes

mod io;

pub use io::{load_artwork, load_artwork_or_none, load_artwork_within, save_document};

use crate::artwork::Artwork;
use crate::document::{DocumentInfo, build_document, encode_pages};
use crate::options::ComposeOptions;
use crate::render::{
    FontBook, FontSet, LoadedFont, RasterPage, RenderContext, SkiaBackend, TextMeasure,
    render_page,
};
use crate::session::{DesignSession, Recomputed};
use crate::state::LargeTextState;
use crate::types::*;
use std::sync::Arc;

/// A render request with everything resolved up front.
///
/// Pages can be rendered one at a time, so a caller can stop between them.
pub struct Composition {
    derived: Recomputed,
    text: LargeTextState,
    sheet: SheetSize,
    has_artwork: bool,
    display: Option<LoadedFont>,
    backend: SkiaBackend,
    options: ComposeOptions,
}

impl Composition {
    pub fn new(
        session: &DesignSession,
        artwork: Option<&Artwork>,
        fonts: &FontBook,
        options: &ComposeOptions,
    ) -> Result<Self> {
        options.validate()?;
        validate_books(session.books())?;

        // The view has to be solved against the image actually drawn
        let synced;
        let session = match artwork.map(Artwork::dimensions) {
            Some((width_px, height_px))
                if session.artwork.image_px != Some((width_px, height_px)) =>
            {
                log::warn!(
                    "Artwork is {}x{} px but the session was set up for {:?}; resetting the view",
                    width_px,
                    height_px,
                    session.artwork.image_px
                );
                let mut copy = session.clone();
                copy.load_artwork(width_px, height_px);
                synced = copy;
                &synced
            }
            _ => session,
        };

        let display = if session.text.is_visible() {
            let face = fonts.resolve(&session.text.font);
            if face.is_none() {
                log::warn!("No font available for the large text; it will be left out");
            }
            face
        } else {
            None
        };
        let ui = fonts.resolve(&FontChoice::SansSerif).ok_or_else(|| {
            ComposeError::InvalidInput("no font available for the watermark and labels".into())
        })?;

        let backend = SkiaBackend::new(
            options.pixels_per_mm,
            artwork,
            FontSet {
                display: display.clone(),
                ui: Some(ui),
            },
        )?;

        Ok(Self {
            derived: session.recompute(),
            text: session.text.clone(),
            sheet: session.sheet,
            has_artwork: artwork.is_some(),
            display,
            backend,
            options: options.clone(),
        })
    }

    pub fn page_count(&self) -> usize {
        self.derived.layout.rects.len()
    }

    pub fn derived(&self) -> &Recomputed {
        &self.derived
    }

    fn context(&self) -> RenderContext<'_> {
        RenderContext {
            derived: &self.derived,
            text: &self.text,
            has_artwork: self.has_artwork,
            measure: self.display.as_ref().map(|font| font as &dyn TextMeasure),
            watermark: self.options.watermark,
            sheet: self.sheet,
        }
    }

    pub fn render_page(&self, index: usize) -> Result<RasterPage> {
        render_page(&self.context(), index, &self.backend)
    }

    /// Encode rendered pages and serialize the document
    pub fn finish(&self, pages: &[RasterPage]) -> Result<Vec<u8>> {
        if pages.len() != self.page_count() {
            return Err(ComposeError::InvalidInput(format!(
                "expected {} pages, got {}",
                self.page_count(),
                pages.len()
            )));
        }
        let encoded = encode_pages(pages, self.options.jpeg_quality)?;
        let info = DocumentInfo {
            title: self.options.title.clone(),
        };
        build_document(&encoded, self.sheet, &info)
    }

    /// Render every page and build the document
    pub fn run(&self) -> Result<Vec<u8>> {
        let pages = (0..self.page_count())
            .map(|index| self.render_page(index))
            .collect::<Result<Vec<_>>>()?;
        self.finish(&pages)
    }
}

/// Compose a session into PDF bytes, one page per book.
///
/// Without `artwork` the pages still carry the watermark, outlines and
/// labels.
pub fn compose_document(
    session: &DesignSession,
    artwork: Option<&Artwork>,
    fonts: &FontBook,
    options: &ComposeOptions,
) -> Result<Vec<u8>> {
    let composition = Composition::new(session, artwork, fonts, options)?;
    log::debug!(
        "Composing {} pages at {:.2} px/mm",
        composition.page_count(),
        options.pixels_per_mm
    );
    let bytes = composition.run()?;
    log::info!(
        "Composed {} pages ({} bytes)",
        composition.page_count(),
        bytes.len()
    );
    Ok(bytes)
}

/// [`compose_document`] on the blocking pool
pub async fn compose_document_async(
    session: DesignSession,
    artwork: Option<Artwork>,
    fonts: Arc<FontBook>,
    options: ComposeOptions,
) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || {
        compose_document(&session, artwork.as_ref(), &fonts, &options)
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn options() -> ComposeOptions {
        ComposeOptions {
            pixels_per_mm: 0.5,
            ..ComposeOptions::default()
        }
    }

    fn session() -> DesignSession {
        DesignSession::new(vec![
            BookSpec::new(1, "One", 200.0, 30.0),
            BookSpec::new(2, "Two", 180.0, 20.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_stack_is_rejected() {
        let session = DesignSession::default();
        let result = compose_document(&session, None, &FontBook::empty(), &options());
        assert!(matches!(result, Err(ComposeError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let bad = ComposeOptions {
            jpeg_quality: 0,
            ..options()
        };
        let result = compose_document(&session(), None, &FontBook::empty(), &bad);
        assert!(matches!(result, Err(ComposeError::Config(_))));
    }

    #[test]
    fn test_page_count_matches_books() {
        let art = Artwork::new(RgbaImage::from_pixel(8, 6, Rgba([0, 120, 200, 255])));
        let mut session = session();
        session.load_artwork(8, 6);

        let composition =
            Composition::new(&session, Some(&art), &FontBook::empty(), &options()).unwrap();
        assert_eq!(composition.page_count(), 2);
        let page = composition.render_page(1).unwrap();
        assert_eq!(
            (page.width_px(), page.height_px()),
            SheetSize::default().pixels(0.5)
        );
        assert!(composition.finish(&[page]).is_err());
    }

    #[test]
    fn test_unannounced_artwork_keeps_its_aspect() {
        // The session never heard about the image: natural size must still
        // follow the 4:1 pixels rather than the required area
        let art = Artwork::new(RgbaImage::from_pixel(400, 100, Rgba([0, 0, 0, 255])));
        let session = session();
        assert_eq!(session.artwork.image_px, None);

        let composition =
            Composition::new(&session, Some(&art), &FontBook::empty(), &options()).unwrap();
        let bounds = composition.derived().bounds;
        let aspect = bounds.artwork_width_mm / bounds.artwork_height_mm;
        assert!((aspect - 4.0).abs() < 1e-3, "aspect {aspect}");
    }

    #[test]
    fn test_resized_artwork_resets_the_view() {
        let art = Artwork::new(RgbaImage::from_pixel(300, 300, Rgba([0, 0, 0, 255])));
        let mut session = session();
        session.load_artwork(600, 200);
        let min_zoom = session.recompute().bounds.min_zoom;
        session.set_zoom(min_zoom * 3.0);

        let composition =
            Composition::new(&session, Some(&art), &FontBook::empty(), &options()).unwrap();
        let derived = composition.derived();
        assert!((derived.bounds.artwork_width_mm - derived.bounds.artwork_height_mm).abs() < 1e-3);
        assert_eq!(derived.zoom, derived.bounds.min_zoom);
    }

    #[tokio::test]
    async fn test_async_compose() {
        let bytes = compose_document_async(
            session(),
            None,
            Arc::new(FontBook::empty()),
            options(),
        )
        .await
        .unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
    }
}
