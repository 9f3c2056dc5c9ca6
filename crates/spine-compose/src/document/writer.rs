//! Minimal PDF 1.4 writer
//!
//! Object numbering is fixed: 1 catalog, 2 page tree, then three objects
//! per page (page, image, content). An optional info dictionary comes last.
//! Byte offsets for the cross-reference table are taken from a running
//! counter while writing.

use super::EncodedPage;
use crate::geometry::mm_to_pt;
use crate::types::{ComposeError, Result, SheetSize};
use std::io::Write;

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const OBJECTS_PER_PAGE: usize = 3;

/// Optional document metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub title: Option<String>,
}

/// Appends objects to an in-memory buffer and remembers where each starts
#[derive(Debug, Default)]
pub struct PdfWriter {
    output: Vec<u8>,
    /// Offset of object `i + 1`
    offsets: Vec<usize>,
}

impl PdfWriter {
    pub fn new() -> Result<Self> {
        let mut writer = Self::default();
        writeln!(writer.output, "%PDF-1.4")?;
        // Binary marker so transfer tools treat the file as binary
        writer.output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");
        Ok(writer)
    }

    /// Bytes written so far
    pub fn position(&self) -> usize {
        self.output.len()
    }

    /// Object ids must be written in ascending order without holes
    fn begin_object(&mut self, id: usize) -> Result<()> {
        if id != self.offsets.len() + 1 {
            return Err(ComposeError::Encode(format!(
                "object {} written out of order (expected {})",
                id,
                self.offsets.len() + 1
            )));
        }
        self.offsets.push(self.output.len());
        writeln!(self.output, "{id} 0 obj")?;
        Ok(())
    }

    fn end_object(&mut self) -> Result<()> {
        writeln!(self.output, "endobj")?;
        Ok(())
    }

    /// Write a dictionary-only object
    pub fn write_dict(&mut self, id: usize, dict: &str) -> Result<()> {
        self.begin_object(id)?;
        writeln!(self.output, "{dict}")?;
        self.end_object()
    }

    /// Write a stream object. `/Length` is appended to `dict_entries`.
    pub fn write_stream(&mut self, id: usize, dict_entries: &str, data: &[u8]) -> Result<()> {
        self.begin_object(id)?;
        writeln!(self.output, "<< {} /Length {} >>", dict_entries, data.len())?;
        writeln!(self.output, "stream")?;
        self.output.extend_from_slice(data);
        writeln!(self.output)?;
        writeln!(self.output, "endstream")?;
        self.end_object()
    }

    /// Write the xref table and trailer and return the finished file
    pub fn finish(mut self, root: usize, info: Option<usize>) -> Result<Vec<u8>> {
        let xref_start = self.output.len();
        let size = self.offsets.len() + 1;

        writeln!(self.output, "xref")?;
        writeln!(self.output, "0 {size}")?;
        writeln!(self.output, "0000000000 65535 f ")?;
        for offset in &self.offsets {
            writeln!(self.output, "{offset:010} 00000 n ")?;
        }

        write!(self.output, "trailer\n<< /Size {size} /Root {root} 0 R")?;
        if let Some(info) = info {
            write!(self.output, " /Info {info} 0 R")?;
        }
        writeln!(self.output, " >>")?;
        writeln!(self.output, "startxref")?;
        writeln!(self.output, "{xref_start}")?;
        write!(self.output, "%%EOF")?;

        Ok(self.output)
    }
}

/// Escape a PDF literal string
fn literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            ch if ch.is_ascii() && !ch.is_ascii_control() => out.push(ch),
            _ => out.push('?'),
        }
    }
    out.push(')');
    out
}

/// Serialize pages into one PDF. Every page uses the sheet's media box and
/// shows its image stretched over the whole page.
pub fn build_document(pages: &[EncodedPage], sheet: SheetSize, info: &DocumentInfo) -> Result<Vec<u8>> {
    if pages.is_empty() {
        return Err(ComposeError::InvalidInput(
            "a document needs at least one page".to_string(),
        ));
    }

    let width_pt = mm_to_pt(sheet.width_mm);
    let height_pt = mm_to_pt(sheet.height_mm);
    let page_id = |index: usize| 3 + OBJECTS_PER_PAGE * index;

    let mut writer = PdfWriter::new()?;
    writer.write_dict(
        CATALOG_ID,
        &format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>"),
    )?;

    let kids = (0..pages.len())
        .map(|index| format!("{} 0 R", page_id(index)))
        .collect::<Vec<_>>()
        .join(" ");
    writer.write_dict(
        PAGES_ID,
        &format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            pages.len()
        ),
    )?;

    for (index, page) in pages.iter().enumerate() {
        let id = page_id(index);
        let image_id = id + 1;
        let content_id = id + 2;

        writer.write_dict(
            id,
            &format!(
                "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {width_pt:.4} {height_pt:.4}] \
                 /Resources << /XObject << /Im0 {image_id} 0 R >> >> /Contents {content_id} 0 R >>"
            ),
        )?;
        writer.write_stream(
            image_id,
            &format!(
                "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB \
                 /BitsPerComponent 8 /Filter /DCTDecode",
                page.width_px, page.height_px
            ),
            &page.payload,
        )?;
        let content = format!("q {width_pt:.4} 0 0 {height_pt:.4} 0 0 cm /Im0 Do Q");
        writer.write_stream(content_id, "", content.as_bytes())?;
    }

    let info_id = match &info.title {
        Some(title) => {
            let id = page_id(pages.len());
            writer.write_dict(id, &format!("<< /Title {} /Producer (spine-compose) >>", literal(title)))?;
            Some(id)
        }
        None => None,
    };

    log::debug!("Serialized {} pages", pages.len());
    writer.finish(CATALOG_ID, info_id)
}
