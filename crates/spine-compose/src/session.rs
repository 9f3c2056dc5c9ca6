//! Designer session and the explicit recompute pipeline
//!
//! The session owns the book list and the view state. Every mutation ends in
//! a reclamp so the stored state is always legal for the current stack.

use crate::geometry::PointMm;
use crate::layout::{ArtworkBounds, OffsetLimits, StackLayout, compute_bounds, layout_stack_on};
use crate::state::{ArtworkState, LargeTextState, ZoomOutcome};
use crate::stats::layout_statistics;
use crate::types::*;

/// Everything derived from a session in one pass
#[derive(Debug, Clone, PartialEq)]
pub struct Recomputed {
    pub layout: StackLayout,
    pub bounds: ArtworkBounds,
    /// Zoom in effect (auto or manual, already clamped)
    pub zoom: f32,
    /// Offset in effect, inside `limits`
    pub offset: PointMm,
    pub limits: OffsetLimits,
}

/// Derive layout, bounds and the effective view from a session.
pub fn recompute(session: &DesignSession) -> Recomputed {
    let layout = layout_stack_on(&session.books, session.sheet);
    let artwork_size = session.artwork.natural_size_mm(&layout.metrics);
    let bounds = compute_bounds(&layout.metrics, artwork_size);
    let zoom = bounds.clamp_zoom(session.artwork.effective_zoom(&bounds));
    let offset = bounds.clamp_offset(session.artwork.offset.resolve(PointMm::ORIGIN), zoom);
    let limits = bounds.offset_limits(zoom);

    Recomputed {
        layout,
        bounds,
        zoom,
        offset,
        limits,
    }
}

/// The caller-owned design state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DesignSession {
    books: Vec<BookSpec>,
    pub artwork: ArtworkState,
    pub text: LargeTextState,
    pub sheet: SheetSize,
}

impl DesignSession {
    pub fn new(books: Vec<BookSpec>) -> Result<Self> {
        let mut session = Self::default();
        session.set_books(books)?;
        Ok(session)
    }

    pub fn books(&self) -> &[BookSpec] {
        &self.books
    }

    /// Replace the whole book list. An empty list is accepted here and
    /// rejected at compose time.
    pub fn set_books(&mut self, books: Vec<BookSpec>) -> Result<()> {
        if !books.is_empty() {
            validate_books(&books)?;
        }
        self.books = books;
        self.reclamp();
        Ok(())
    }

    /// Append a book to the right end of the stack
    pub fn add_book(&mut self, book: BookSpec) -> Result<()> {
        let mut books = self.books.clone();
        books.push(book);
        self.set_books(books)
    }

    /// Remove a book by id; returns whether it was present
    pub fn remove_book(&mut self, id: u32) -> bool {
        let before = self.books.len();
        self.books.retain(|b| b.id != id);
        let removed = self.books.len() != before;
        if removed {
            self.reclamp();
        }
        removed
    }

    /// A new image resets zoom and offset to their defaults
    pub fn load_artwork(&mut self, width_px: u32, height_px: u32) {
        self.artwork = ArtworkState::for_image(width_px, height_px);
        self.reclamp();
    }

    pub fn clear_artwork(&mut self) {
        self.artwork = ArtworkState::default();
        self.reclamp();
    }

    pub fn set_zoom(&mut self, zoom: f32) -> ZoomOutcome {
        let bounds = recompute(self).bounds;
        let outcome = self.artwork.request_zoom(zoom, &bounds);
        if let ZoomOutcome::Declined { min_zoom, kept } = outcome {
            log::debug!("Declined zoom {zoom:.3}: minimum is {min_zoom:.3}, keeping {kept:.3}");
        }
        outcome
    }

    /// Returns the offset actually applied after clamping
    pub fn set_offset(&mut self, offset: PointMm) -> PointMm {
        let bounds = recompute(self).bounds;
        self.artwork.request_offset(offset, &bounds)
    }

    pub fn reset_view(&mut self) {
        self.artwork.reset_view();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text.text = text.into();
    }

    pub fn set_text_enabled(&mut self, enabled: bool) {
        self.text.enabled = enabled;
    }

    pub fn set_text_font(&mut self, font: FontChoice) {
        self.text.font = font;
    }

    /// Returns the size actually applied after clamping
    pub fn set_text_size(&mut self, size_pt: f32) -> f32 {
        self.text.request_size(size_pt)
    }

    /// Run the full pipeline on the current state
    pub fn recompute(&self) -> Recomputed {
        recompute(self)
    }

    /// Summary numbers for the current stack
    pub fn statistics(&self) -> CompositionStatistics {
        layout_statistics(&layout_stack_on(&self.books, self.sheet))
    }

    fn reclamp(&mut self) {
        let derived = recompute(self);
        self.artwork.reclamp(&derived.bounds);
        self.text.reclamp(&derived.layout.metrics);
    }
}
