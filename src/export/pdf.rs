//! PDF writer for the drawing-command renderer.
//!
//! Consumes the [`DrawOp`] sequence produced by [`layout`] and emits the
//! bytes of a finished multi-page A4 PDF. Y coordinates are flipped here:
//! the layout measures from the top of the page, PDF user space from the
//! bottom.

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Px,
    Rect as PdfRect,
};
use printpdf::path::PaintMode;

use crate::document::Document;
use crate::error::{AfsError, Result};
use crate::render::layout;
use crate::render::ops::{Align, DrawOp, FontStyle, Rgb};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

fn pt_to_mm(pt: f32) -> f32 {
    pt * 25.4 / 72.0
}

fn flip_y(pt: f32) -> f32 {
    PAGE_HEIGHT_MM - pt_to_mm(pt)
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        rgb.0 as f32 / 255.0,
        rgb.1 as f32 / 255.0,
        rgb.2 as f32 / 255.0,
        None,
    ))
}

/// Approximate width of a Helvetica string, for right- and center-aligned
/// text. Good enough for the column layout in use here.
fn text_width_pt(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

fn draw_text(
    layer: &PdfLayerReference,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
    text: &str,
    x: f32,
    y: f32,
    size: f32,
    style: FontStyle,
    fill: Rgb,
    align: Align,
) {
    let x = match align {
        Align::Left => x,
        Align::Center => x - text_width_pt(text, size) / 2.0,
        Align::Right => x - text_width_pt(text, size),
    };
    let font = match style {
        FontStyle::Regular => regular,
        FontStyle::Bold => bold,
    };
    layer.set_fill_color(color(fill));
    layer.use_text(text, size, Mm(pt_to_mm(x)), Mm(flip_y(y)), font);
}

fn draw_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, fill: Rgb) {
    layer.set_fill_color(color(fill));
    let rect = PdfRect::new(
        Mm(pt_to_mm(x)),
        Mm(flip_y(y + h)),
        Mm(pt_to_mm(x + w)),
        Mm(flip_y(y)),
    )
    .with_mode(PaintMode::Fill);
    layer.add_rect(rect);
}

fn draw_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, stroke: Rgb) {
    layer.set_outline_color(color(stroke));
    layer.set_outline_thickness(width);
    let line = Line {
        points: vec![
            (Point::new(Mm(pt_to_mm(x1)), Mm(flip_y(y1))), false),
            (Point::new(Mm(pt_to_mm(x2)), Mm(flip_y(y2))), false),
        ],
        is_closed: false,
    };
    layer.add_line(line);
}

/// Place a decoded logo so that it covers `w` x `h` points. Decode or
/// placement problems drop the logo rather than failing the export.
fn draw_logo(layer: &PdfLayerReference, logo: &[u8], x: f32, y: f32, w: f32, _h: f32) {
    let Ok(decoded) = image::load_from_memory(logo) else {
        return;
    };
    let rgb = decoded.to_rgb8();
    let (px_w, px_h) = rgb.dimensions();
    if px_w == 0 || px_h == 0 {
        return;
    }
    let image = Image::from(ImageXObject {
        width: Px(px_w as usize),
        height: Px(px_h as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: rgb.into_raw(),
        image_filter: None,
        smask: None,
        clipping_bbox: None,
    });
    // dpi chosen so the pixel width maps onto the requested box width; the
    // height follows the image's own aspect ratio.
    let dpi = px_w as f32 / (pt_to_mm(w) / 25.4);
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(pt_to_mm(x))),
            translate_y: Some(Mm(flip_y(y) - pt_to_mm(px_h as f32 * w / px_w as f32))),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}

/// Render one document to PDF bytes. `logo` is the raw bytes of the company
/// logo image, if one is configured.
pub fn render_pdf(document: &Document, logo: Option<&[u8]>) -> Result<Vec<u8>> {
    let title = format!("{} {}", document.kind(), document.number);
    let (doc, page, layer) = PdfDocument::new(
        &title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AfsError::PdfGeneration(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AfsError::PdfGeneration(e.to_string()))?;

    let mut current_layer = doc.get_page(page).get_layer(layer);

    for op in layout(document) {
        match op {
            DrawOp::Rect { x, y, w, h, color } => {
                draw_rect(&current_layer, x, y, w, h, color);
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                draw_line(&current_layer, x1, y1, x2, y2, width, color);
            }
            DrawOp::Text {
                text,
                x,
                y,
                size,
                style,
                color,
                align,
            } => {
                draw_text(
                    &current_layer,
                    &regular,
                    &bold,
                    &text,
                    x,
                    y,
                    size,
                    style,
                    color,
                    align,
                );
            }
            DrawOp::Logo { x, y, w, h } => {
                if let Some(bytes) = logo {
                    draw_logo(&current_layer, bytes, x, y, w, h);
                }
            }
            DrawOp::NewPage => {
                let (new_page, new_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                current_layer = doc.get_page(new_page).get_layer(new_layer);
            }
        }
    }

    let mut bytes = Vec::new();
    doc.save(&mut BufWriter::new(&mut bytes))
        .map_err(|e| AfsError::PdfGeneration(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocKind, LineItem};

    #[test]
    fn produces_valid_pdf_bytes() {
        let doc = Document::new(DocKind::Invoice);
        let bytes = render_pdf(&doc, None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_invoices_produce_multiple_pages() {
        let mut doc = Document::new(DocKind::Invoice);
        doc.billing_mut().unwrap().items = (0..60)
            .map(|i| LineItem::new(format!("Item {i}"), 10.0, 1.0))
            .collect();
        let bytes = render_pdf(&doc, None).unwrap();
        let body = String::from_utf8_lossy(&bytes);
        // Page count in the page tree grows with the item list.
        assert!(body.contains("/Count 3") || body.contains("/Count 2"));
    }

    #[test]
    fn bad_logo_bytes_are_skipped() {
        let doc = Document::new(DocKind::Invoice);
        let bytes = render_pdf(&doc, Some(b"not an image")).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
