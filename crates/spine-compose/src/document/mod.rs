//! PDF serialization of rendered pages
//!
//! The writer is hand-built: one JPEG image per page, drawn full-bleed by a
//! four-operator content stream.

mod encode;
mod writer;

pub use encode::{EncodedPage, encode_page, encode_pages};
pub use writer::{DocumentInfo, PdfWriter, build_document};
