//! Single-page PDF container
//!
//! Builds a US Letter page with printpdf: the rasterized code centered on the
//! page and an optional one-line caption underneath, set in the builtin
//! Helvetica font.

use crate::error::{Error, Result};
use crate::export::ExportFormat;
use crate::string_utils::truncate_with_ellipsis;
use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument, Pt};
use std::io::BufWriter;

const DOCUMENT_TITLE: &str = "QR Code";
const LAYER_NAME: &str = "QR Code";

// ─────────────────────────────────────────────────────────────────────────────
// Layout
// ─────────────────────────────────────────────────────────────────────────────

/// Page geometry in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentLayout {
    pub page_width: f32,
    pub page_height: f32,
    /// Side length of the drawn image square
    pub image_extent: f32,
    pub caption_font_size: f32,
    /// Distance from the image's bottom edge to the caption baseline
    pub caption_gap: f32,
    /// Caption character budget before the ellipsis marker
    pub caption_limit: usize,
}

impl Default for DocumentLayout {
    /// US Letter with a 300pt image.
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            image_extent: 300.0,
            caption_font_size: 12.0,
            caption_gap: 24.0,
            caption_limit: 60,
        }
    }
}

impl DocumentLayout {
    /// Lower-left corner of the centered image.
    pub fn image_origin(&self) -> (f32, f32) {
        (
            (self.page_width - self.image_extent) / 2.0,
            (self.page_height - self.image_extent) / 2.0,
        )
    }

    /// Resolution at which `pixel_width` pixels span `image_extent` points.
    pub fn image_dpi(&self, pixel_width: u32) -> f32 {
        pixel_width as f32 * 72.0 / self.image_extent
    }

    /// Baseline start of `caption`, centered under the image.
    pub fn caption_origin(&self, caption: &str) -> (f32, f32) {
        let width = text_width(caption, self.caption_font_size);
        let (_, image_y) = self.image_origin();
        (
            ((self.page_width - width) / 2.0).max(0.0),
            image_y - self.caption_gap,
        )
    }
}

/// Straight RGB pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbRaster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Serialize a one-page document.
///
/// # Errors
///
/// `Error::EncodeFailed` when the pixel data does not match the raster size
/// or printpdf cannot serialize the page.
pub fn build_document(
    layout: &DocumentLayout,
    raster: &RgbRaster,
    caption: Option<&str>,
) -> Result<Vec<u8>> {
    let doc = PdfDocument::empty(DOCUMENT_TITLE);
    let (page, layer) = doc.add_page(
        Mm::from(Pt(layout.page_width)),
        Mm::from(Pt(layout.page_height)),
        LAYER_NAME,
    );
    let layer = doc.get_page(page).get_layer(layer);

    let pixels = RgbImage::from_raw(raster.width, raster.height, raster.data.clone())
        .ok_or_else(|| encode_error("pixel data does not match the raster size"))?;
    let (x, y) = layout.image_origin();
    Image::from_dynamic_image(&DynamicImage::ImageRgb8(pixels)).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm::from(Pt(x))),
            translate_y: Some(Mm::from(Pt(y))),
            dpi: Some(layout.image_dpi(raster.width)),
            ..ImageTransform::default()
        },
    );

    if let Some(text) = caption_text(caption, layout.caption_limit) {
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| encode_error(e.to_string()))?;
        let (caption_x, caption_y) = layout.caption_origin(&text);

        layer.begin_text_section();
        layer.set_font(&font, layout.caption_font_size);
        layer.set_text_cursor(Mm::from(Pt(caption_x)), Mm::from(Pt(caption_y)));
        layer.write_text(text, &font);
        layer.end_text_section();
    }

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer)
        .map_err(|e| encode_error(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| encode_error(e.error().to_string()))
}

fn encode_error(message: impl Into<String>) -> Error {
    Error::EncodeFailed {
        format: ExportFormat::Document,
        message: message.into(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Caption Text
// ─────────────────────────────────────────────────────────────────────────────

/// The caption as drawn: trimmed, truncated with `...`, and with characters
/// outside WinAnsi replaced by `?`. `None` when nothing is left to draw.
pub fn caption_text(caption: Option<&str>, limit: usize) -> Option<String> {
    let caption = caption.map(str::trim).filter(|c| !c.is_empty())?;
    Some(
        truncate_with_ellipsis(caption, limit)
            .chars()
            .map(|c| if is_win_ansi(c) { c } else { '?' })
            .collect(),
    )
}

/// Characters above Latin-1 that WinAnsiEncoding maps into 0x80..=0x9F.
const WIN_ANSI_EXTRAS: [char; 27] = [
    '€', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', 'Ž', '‘', '’', '“', '”', '•', '–',
    '—', '˜', '™', 'š', '›', 'œ', 'ž', 'Ÿ',
];

/// Whether the builtin fonts can show `c`.
fn is_win_ansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}') || WIN_ANSI_EXTRAS.contains(&c)
}

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Approximate rendered width of `text` in points. Characters outside ASCII
/// count as a digit width.
fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match c {
            ' '..='~' => u32::from(HELVETICA_WIDTHS[c as usize - 32]),
            _ => 556,
        })
        .sum();
    units as f32 * font_size / 1000.0
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
