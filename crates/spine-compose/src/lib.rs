//! Spine artwork composition
//!
//! Lays out a row of book spines, keeps one artwork (and an optional line
//! of large text) legally positioned across them, and composes a print-ready
//! PDF with one full sheet per book.

mod artwork;
mod compose;
pub mod constants;
pub mod document;
pub mod geometry;
pub mod layout;
mod options;
mod preview;
pub mod render;
mod session;
mod state;
mod stats;
mod types;

pub use artwork::Artwork;
pub use compose::{
    Composition, compose_document, compose_document_async, load_artwork, load_artwork_or_none,
    load_artwork_within, save_document,
};
pub use geometry::{PointMm, RectMm};
pub use layout::{
    ArtworkBounds, OffsetLimits, PlacedRect, StackLayout, StackMetrics, compute_bounds,
    layout_stack, layout_stack_on,
};
pub use options::*;
pub use preview::{extract_previews, extract_previews_async};
pub use render::{FontBook, RasterPage};
pub use session::{DesignSession, Recomputed, recompute};
pub use state::{Adjust, ArtworkState, LargeTextState, ZoomOutcome, max_text_size_pt};
pub use stats::{calculate_statistics, layout_statistics};
pub use types::*;
