//! Page rendering
//!
//! - Building the ordered draw commands for each output page
//! - Executing them on a raster surface (tiny-skia by default)
//! - Text measurement and glyph outlines for the overlays

mod command;
mod font;
mod page;
mod skia;
mod surface;
mod text;

pub use command::{DrawCommand, FontRole, TextAlign, TextRun};
pub use font::{FontBook, LoadedFont};
pub use page::{RenderContext, page_commands, render_page, render_pages};
pub use skia::{FontSet, SkiaBackend, SkiaSurface};
pub use surface::{RasterPage, RasterSurface, SurfaceFactory};
pub use text::{PlacedLine, TextMeasure, center_block, wrap_text};

#[cfg(test)]
pub(crate) use text::tests::FixedMeasure;
