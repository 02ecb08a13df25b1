//! Page document output.
//!
//! Each sheet gets a page of its own. Sheets are drawn at their physical size
//! for the configured print density and positioned by the page offset, measured
//! from the top-left corner of the page. A sheet larger than the space right of
//! and below the offset is shrunk to fit, keeping its aspect ratio, the same way
//! `convert -page` does.

use crate::sheets::PageSpec;
use image::RgbaImage;
use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, TextStr};

const IMAGE_NAME: Name<'static> = Name(b"Im1");

/// Render `sheets`, one per page, into the bytes of a PDF document.
pub fn render_pages(sheets: &[RgbaImage], page: &PageSpec, dpi: f32) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let pages_id = alloc.bump();
    let info_id = alloc.bump();

    let (page_width, page_height) = page.size.points();
    let mut page_ids = Vec::with_capacity(sheets.len());

    for sheet in sheets {
        let page_id = alloc.bump();
        let content_id = alloc.bump();
        let image_id = alloc.bump();

        embed_image(&mut pdf, &mut alloc, image_id, sheet);

        let mut content = Content::new();
        content
            .save_state()
            .transform(placement(sheet.dimensions(), page, dpi))
            .x_object(IMAGE_NAME)
            .restore_state();
        let content = compress_to_vec_zlib(&content.finish(), 6);
        pdf.stream(content_id, &content)
            .filter(Filter::FlateDecode);

        {
            let mut pdf_page = pdf.page(page_id);
            pdf_page
                .media_box(Rect::new(0.0, 0.0, page_width, page_height))
                .parent(pages_id)
                .contents(content_id);
            pdf_page
                .resources()
                .x_objects()
                .pair(IMAGE_NAME, image_id);
        }

        page_ids.push(page_id);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);
    pdf.document_info(info_id)
        .creator(TextStr(concat!("card-deck v", env!("CARGO_PKG_VERSION"))));

    pdf.finish()
}

/// Image transform placing a `width` x `height` pixel sheet on the page.
///
/// Never scales up; the offset corner stays put when scaling down.
fn placement((width, height): (u32, u32), page: &PageSpec, dpi: f32) -> [f32; 6] {
    let (page_width, page_height) = page.size.points();
    let width = width as f32 * 72.0 / dpi;
    let height = height as f32 * 72.0 / dpi;
    let room_x = page_width - page.offset_x as f32;
    let room_y = page_height - page.offset_y as f32;

    let fit = (room_x / width).min(room_y / height).min(1.0);
    let fit = if fit > 0.0 { fit } else { 1.0 };
    let (width, height) = (width * fit, height * fit);

    let x = page.offset_x as f32;
    let y = page_height - page.offset_y as f32 - height;
    [width, 0.0, 0.0, height, x, y]
}

/// Embed `image` as a flate-compressed RGB image XObject, with a soft mask
/// when any pixel is translucent.
fn embed_image(pdf: &mut Pdf, alloc: &mut Ref, image_id: Ref, image: &RgbaImage) {
    let (width, height) = image.dimensions();
    let has_alpha = image.pixels().any(|p| p.0[3] < 255);

    let mask_id = if has_alpha {
        let alpha: Vec<u8> = image.pixels().map(|p| p.0[3]).collect();
        let alpha = compress_to_vec_zlib(&alpha, 6);
        let mask_id = alloc.bump();
        let mut mask = pdf.image_xobject(mask_id, &alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(width as i32);
        mask.height(height as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        Some(mask_id)
    } else {
        None
    };

    let rgb: Vec<u8> = image
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let rgb = compress_to_vec_zlib(&rgb, 6);
    let mut xobj = pdf.image_xobject(image_id, &rgb);
    xobj.filter(Filter::FlateDecode);
    xobj.width(width as i32);
    xobj.height(height as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_id) = mask_id {
        xobj.s_mask(mask_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn one_page_per_sheet() {
        let sheets = vec![
            RgbaImage::from_pixel(10, 40, Rgba([255, 0, 0, 255])),
            RgbaImage::from_pixel(10, 40, Rgba([0, 255, 0, 255])),
            RgbaImage::from_pixel(10, 40, Rgba([0, 0, 255, 255])),
        ];
        let bytes = render_pages(&sheets, &PageSpec::default(), 72.0);
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(count(&bytes, b"/Type /Page\n"), 3);
        assert_eq!(count(&bytes, b"/Count 3"), 1);
        assert_eq!(count(&bytes, b"/SMask"), 0);
    }

    /// Raw bytes of every stream object in a document.
    fn streams(bytes: &[u8]) -> Vec<&[u8]> {
        let mut found = Vec::new();
        let mut rest = bytes;
        while let Some(start) = rest.windows(7).position(|w| w == b"stream\n") {
            let body = &rest[start + 7..];
            let Some(end) = body.windows(10).position(|w| w == b"\nendstream") else {
                break;
            };
            found.push(&body[..end]);
            rest = &body[end + 10..];
        }
        found
    }

    fn assert_on_page(m: [f32; 6], page: &PageSpec) {
        let (page_width, page_height) = page.size.points();
        let [w, _, _, h, x, y] = m;
        assert!(x >= 0.0 && y >= -0.01, "sheet starts off the page: {m:?}");
        assert!(x + w <= page_width + 0.01, "sheet runs off the right: {m:?}");
        assert!(y + h <= page_height + 0.01, "sheet runs off the top: {m:?}");
    }

    #[test]
    fn five_card_strip_fits_a4() {
        let page = PageSpec::default();
        let m = placement((1050, 3750), &page, 300.0);
        assert_on_page(m, &page);
        // height is the binding side; aspect ratio is kept
        assert!((m[3] - 842.0).abs() < 0.01);
        assert!((m[0] / m[3] - 1050.0 / 3750.0).abs() < 1e-4);
        assert_eq!(m[4], 100.0);
        assert!(m[5].abs() < 0.01);
    }

    #[test]
    fn small_sheets_keep_physical_size() {
        let m = placement((300, 600), &PageSpec::default(), 300.0);
        assert_eq!(m, [72.0, 0.0, 0.0, 144.0, 100.0, 842.0 - 144.0]);
    }

    #[test]
    fn wide_sheets_fit_beside_the_offset() {
        let page = PageSpec::default();
        let m = placement((3750, 1050), &page, 300.0);
        assert_on_page(m, &page);
        assert!((m[0] - (595.0 - 100.0)).abs() < 0.01);
    }

    #[test]
    fn rendered_page_places_strip_inside_media_box() {
        let page = PageSpec::default();
        let bytes = render_pages(&[RgbaImage::new(1050, 3750)], &page, 300.0);

        let content = streams(&bytes)
            .into_iter()
            .filter_map(|raw| miniz_oxide::inflate::decompress_to_vec_zlib(raw).ok())
            .filter_map(|data| String::from_utf8(data).ok())
            .find(|text| text.contains(" cm"))
            .expect("page has a content stream");
        let numbers: Vec<f32> = content
            .split(" cm")
            .next()
            .expect("has a transform")
            .split_whitespace()
            .filter_map(|t| t.parse().ok())
            .collect();
        let m: [f32; 6] = numbers[numbers.len() - 6..]
            .try_into()
            .expect("six transform operands");
        assert_on_page(m, &page);
    }

    #[test]
    fn translucent_sheets_get_masks() {
        let sheets = vec![RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]))];
        let bytes = render_pages(&sheets, &PageSpec::default(), 300.0);
        assert_eq!(count(&bytes, b"/SMask"), 1);
    }

    #[test]
    fn no_sheets_is_an_empty_document() {
        let bytes = render_pages(&[], &PageSpec::default(), 300.0);
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(count(&bytes, b"/Count 0"), 1);
    }
}
