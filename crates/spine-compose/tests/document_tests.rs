use lopdf::Document;
use spine_compose::document::{DocumentInfo, EncodedPage, build_document, encode_page};
use spine_compose::*;

fn page(seed: u8) -> EncodedPage {
    let image = image::RgbImage::from_fn(24, 16, |x, y| {
        image::Rgb([seed, (x * 10) as u8, (y * 10) as u8])
    });
    encode_page(&RasterPage { image }, 85).unwrap()
}

fn find_from(haystack: &[u8], needle: &[u8], start: usize) -> Option<usize> {
    haystack[start..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + start)
}

/// Parse the xref table that `startxref` points at
fn xref_offsets(pdf: &[u8]) -> Vec<usize> {
    let marker = find_from(pdf, b"startxref\n", 0).unwrap() + b"startxref\n".len();
    let end = find_from(pdf, b"\n", marker).unwrap();
    let start: usize = std::str::from_utf8(&pdf[marker..end])
        .unwrap()
        .parse()
        .unwrap();
    assert!(pdf[start..].starts_with(b"xref\n"));

    let table = std::str::from_utf8(&pdf[start..marker]).unwrap();
    let mut lines = table.lines().skip(1);
    let count: usize = lines
        .next()
        .unwrap()
        .split_whitespace()
        .nth(1)
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(lines.next(), Some("0000000000 65535 f "));
    lines
        .take(count - 1)
        .map(|line| {
            assert_eq!(line.len(), 19, "xref entries are 20 bytes with the newline");
            assert!(line.ends_with(" 00000 n "));
            line[..10].parse().unwrap()
        })
        .collect()
}

fn check_structure(page_count: usize) {
    let pages: Vec<EncodedPage> = (0..page_count).map(|i| page(i as u8 * 40)).collect();
    let pdf = build_document(&pages, SheetSize::default(), &DocumentInfo::default()).unwrap();

    let offsets = xref_offsets(&pdf);
    assert_eq!(offsets.len(), 2 + 3 * page_count);
    for (index, offset) in offsets.iter().enumerate() {
        let header = format!("{} 0 obj", index + 1);
        assert!(
            pdf[*offset..].starts_with(header.as_bytes()),
            "object {} not at offset {}",
            index + 1,
            offset
        );
    }
    assert!(offsets.windows(2).all(|w| w[0] < w[1]));

    let doc = Document::load_mem(&pdf).unwrap();
    assert_eq!(doc.get_pages().len(), page_count);
}

#[test]
fn test_xref_single_page() {
    check_structure(1);
}

#[test]
fn test_xref_two_pages() {
    check_structure(2);
}

#[test]
fn test_xref_five_pages() {
    check_structure(5);
}

#[test]
fn test_image_length_matches_payload() {
    let pages = vec![page(10), page(200)];
    let pdf = build_document(&pages, SheetSize::default(), &DocumentInfo::default()).unwrap();
    let doc = Document::load_mem(&pdf).unwrap();

    for (index, encoded) in pages.iter().enumerate() {
        let image_id = (4 + 3 * index as u32, 0);
        let stream = doc.get_object(image_id).unwrap().as_stream().unwrap();
        assert_eq!(
            stream.dict.get(b"Length").unwrap().as_i64().unwrap(),
            encoded.payload.len() as i64
        );
        assert_eq!(stream.content, encoded.payload);
        assert_eq!(
            stream.dict.get(b"Width").unwrap().as_i64().unwrap(),
            encoded.width_px as i64
        );
    }
}

#[test]
fn test_pages_in_input_order() {
    let pages: Vec<EncodedPage> = (0..3).map(|i| page(i * 80)).collect();
    let pdf = build_document(&pages, SheetSize::default(), &DocumentInfo::default()).unwrap();
    let doc = Document::load_mem(&pdf).unwrap();

    let ids: Vec<u32> = doc.get_pages().values().map(|id| id.0).collect();
    assert_eq!(ids, vec![3, 6, 9]);
}

#[test]
fn test_swapping_payload_keeps_document_valid() {
    let small = page(1);
    let mut large = page(2);
    large.payload = encode_page(
        &RasterPage {
            image: image::RgbImage::from_fn(120, 80, |x, y| {
                image::Rgb([(x ^ y) as u8, x as u8, y as u8])
            }),
        },
        95,
    )
    .unwrap()
    .payload;
    large.width_px = 120;
    large.height_px = 80;
    assert_ne!(small.payload.len(), large.payload.len());

    for pages in [vec![small.clone(), small.clone()], vec![small, large]] {
        let pdf = build_document(&pages, SheetSize::default(), &DocumentInfo::default()).unwrap();
        let offsets = xref_offsets(&pdf);
        for (index, offset) in offsets.iter().enumerate() {
            assert!(pdf[*offset..].starts_with(format!("{} 0 obj", index + 1).as_bytes()));
        }
        assert_eq!(Document::load_mem(&pdf).unwrap().get_pages().len(), 2);
    }
}

#[test]
fn test_media_box_is_the_sheet() {
    let pdf = build_document(&[page(0)], SheetSize::default(), &DocumentInfo::default()).unwrap();
    let doc = Document::load_mem(&pdf).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    let media_box = doc
        .get_dictionary(page_id)
        .unwrap()
        .get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|o| match o {
            lopdf::Object::Integer(i) => *i as f32,
            lopdf::Object::Real(r) => *r,
            other => panic!("unexpected MediaBox entry {:?}", other),
        })
        .collect::<Vec<f32>>();
    assert_eq!(media_box.len(), 4);
    assert!((media_box[2] - 1224.0).abs() < 0.01);
    assert!((media_box[3] - 792.0).abs() < 0.01);
}
