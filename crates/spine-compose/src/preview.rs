//! Page previews recovered from a composed document

use crate::types::*;
use image::{ImageFormat, RgbaImage};
use lopdf::{Dictionary, Document, Object};

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Object> {
    match object {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Dictionary> {
    Ok(resolve(doc, object)?.as_dict()?)
}

/// Decode the first image XObject of a page
fn page_image(doc: &Document, page: &Dictionary) -> Result<RgbaImage> {
    let resources = resolve_dict(doc, page.get(b"Resources")?)?;
    let xobjects = resolve_dict(doc, resources.get(b"XObject")?)?;
    let (name, object) = xobjects
        .iter()
        .next()
        .ok_or_else(|| ComposeError::InvalidInput("page has no image".to_string()))?;
    let stream = resolve(doc, object)?.as_stream()?;

    let filter = stream.dict.get(b"Filter").and_then(Object::as_name);
    if filter.ok() != Some(b"DCTDecode".as_slice()) {
        return Err(ComposeError::InvalidInput(format!(
            "image {} is not JPEG encoded",
            String::from_utf8_lossy(name)
        )));
    }

    Ok(image::load_from_memory_with_format(&stream.content, ImageFormat::Jpeg)?.to_rgba8())
}

/// One preview image per page, in page order.
pub fn extract_previews(bytes: &[u8]) -> Result<Vec<RgbaImage>> {
    let doc = Document::load_mem(bytes)?;
    let pages = doc.get_pages();
    log::debug!("Extracting previews for {} pages", pages.len());

    pages
        .values()
        .map(|&page_id| page_image(&doc, doc.get_dictionary(page_id)?))
        .collect()
}

/// [`extract_previews`] on the blocking pool
pub async fn extract_previews_async(bytes: Vec<u8>) -> Result<Vec<RgbaImage>> {
    tokio::task::spawn_blocking(move || extract_previews(&bytes)).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf() {
        assert!(matches!(
            extract_previews(b"hello"),
            Err(ComposeError::Pdf(_))
        ));
    }
}
