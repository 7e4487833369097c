//! Format encoding
//!
//! Turns a vector source into exportable bytes: SVG passthrough, PNG/JPEG
//! through the rasterizer, or a PDF document container.

use crate::error::{Error, Result};
use crate::export::document::{build_document, DocumentLayout, RgbRaster};
use crate::export::{
    EncodedExport, ExportFormat, ExportRequest, PixelBuffer, PixelSize, RasterSize, Rasterizer,
    VectorSource,
};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use log::debug;

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncoderOptions {
    /// Square pixel size of the image embedded in documents
    pub document_resolution: PixelSize,
    /// Square pixel size of images attached to shares
    pub share_resolution: PixelSize,
    /// JPEG quality, 1..=100
    pub jpeg_quality: u8,
    pub layout: DocumentLayout,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            document_resolution: PixelSize::square_saturating(600),
            share_resolution: PixelSize::square_saturating(512),
            jpeg_quality: 90,
            layout: DocumentLayout::default(),
        }
    }
}

/// Produces export bytes for every `ExportFormat`.
#[derive(Debug, Clone, Default)]
pub struct FormatEncoder {
    rasterizer: Rasterizer,
    options: EncoderOptions,
}

impl FormatEncoder {
    pub fn new(options: EncoderOptions) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            options,
        }
    }

    pub fn rasterizer(&self) -> &Rasterizer {
        &self.rasterizer
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Encode `request.source` in `request.format`.
    ///
    /// Entitlement is not checked here; requests must already be permitted.
    /// Failures are terminal: no other format is attempted.
    pub fn encode(&self, request: &ExportRequest<'_>) -> Result<EncodedExport> {
        let export = match request.format {
            ExportFormat::Vector => {
                let markup = request.source.markup().ok_or(Error::SourceMissing)?;
                EncodedExport::new(ExportFormat::Vector, markup.into_bytes())
            }
            format @ (ExportFormat::RasterPng | ExportFormat::RasterJpeg) => {
                let buffer = self.rasterizer.rasterize(request.source, request.resolution)?;
                EncodedExport::new(format, self.encode_raster(&buffer, format)?)
            }
            ExportFormat::Document => {
                let buffer = self.rasterizer.rasterize(
                    request.source,
                    RasterSize::Fixed(self.options.document_resolution),
                )?;
                let raster = RgbRaster {
                    width: buffer.width(),
                    height: buffer.height(),
                    data: buffer.to_rgb_bytes(),
                };
                let bytes = build_document(&self.options.layout, &raster, request.caption)?;
                EncodedExport::new(ExportFormat::Document, bytes)
            }
        };

        debug!(
            "Encoded {} ({} bytes)",
            export.file_name,
            export.bytes.len()
        );
        Ok(export)
    }

    /// PNG image for attaching to a share or handing to an app without a
    /// share URL.
    pub fn share_image(&self, source: &dyn VectorSource) -> Result<EncodedExport> {
        let buffer = self
            .rasterizer
            .rasterize(source, RasterSize::Fixed(self.options.share_resolution))?;
        let bytes = self.encode_raster(&buffer, ExportFormat::RasterPng)?;
        Ok(EncodedExport::new(ExportFormat::RasterPng, bytes))
    }

    /// Encode a pixel buffer as PNG or JPEG.
    pub fn encode_raster(&self, buffer: &PixelBuffer, format: ExportFormat) -> Result<Vec<u8>> {
        match format {
            ExportFormat::RasterPng => encode_png(buffer),
            ExportFormat::RasterJpeg => self.encode_jpeg(buffer),
            other => Err(Error::EncodeFailed {
                format: other,
                message: "not a raster format".to_string(),
            }),
        }
    }

    fn encode_jpeg(&self, buffer: &PixelBuffer) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, self.options.jpeg_quality)
            .write_image(
                &buffer.to_rgb_bytes(),
                buffer.width(),
                buffer.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| Error::EncodeFailed {
                format: ExportFormat::RasterJpeg,
                message: e.to_string(),
            })?;
        Ok(bytes)
    }
}

fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            &buffer.to_rgba_bytes(),
            buffer.width(),
            buffer.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| Error::EncodeFailed {
            format: ExportFormat::RasterPng,
            message: e.to_string(),
        })?;
    Ok(bytes)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitlement::SubscriptionTier;
    use crate::export::SvgMarkup;

    const QR_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="40" viewBox="0 0 4 4"><path d="M0 0h1v1H0zM3 3h1v1H3z" fill="black"/></svg>"#;

    fn request(source: &SvgMarkup, format: ExportFormat) -> ExportRequest<'_> {
        ExportRequest::new(source, format, SubscriptionTier::Business)
    }

    #[test]
    fn test_vector_is_passthrough() {
        let source = SvgMarkup::new(QR_SVG);
        let export = FormatEncoder::default()
            .encode(&request(&source, ExportFormat::Vector))
            .unwrap();
        assert_eq!(export.bytes, QR_SVG.as_bytes());
        assert_eq!(export.mime_type, "image/svg+xml");
        assert_eq!(export.file_name, "qrcode.svg");
    }

    #[test]
    fn test_vector_skips_decoding() {
        // Not parseable, but vector export never decodes
        let source = SvgMarkup::new("<svg");
        let export = FormatEncoder::default()
            .encode(&request(&source, ExportFormat::Vector))
            .unwrap();
        assert_eq!(export.bytes, b"<svg");
    }

    #[test]
    fn test_png_at_natural_size() {
        let source = SvgMarkup::new(QR_SVG);
        let export = FormatEncoder::default()
            .encode(&request(&source, ExportFormat::RasterPng))
            .unwrap();

        let decoded = image::load_from_memory(&export.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 40));
        assert_eq!(export.mime_type, "image/png");
    }

    #[test]
    fn test_jpeg_is_opaque_rgb() {
        let source = SvgMarkup::new(QR_SVG);
        let size = PixelSize::square(80).unwrap();
        let export = FormatEncoder::default()
            .encode(
                &request(&source, ExportFormat::RasterJpeg)
                    .with_resolution(RasterSize::Fixed(size)),
            )
            .unwrap();

        assert_eq!(&export.bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&export.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (80, 80));
        assert!(!decoded.color().has_alpha());
        // Transparent middle area must come out white, not black
        let middle = decoded.to_rgb8().get_pixel(40, 40).0;
        assert!(middle.iter().all(|&c| c > 240));
    }

    #[test]
    fn test_document_is_pdf() {
        let source = SvgMarkup::new(QR_SVG);
        let export = FormatEncoder::default()
            .encode(&request(&source, ExportFormat::Document).with_caption("hello"))
            .unwrap();

        assert_eq!(export.file_name, "qrcode.pdf");
        assert_eq!(export.mime_type, "application/pdf");
        assert!(export.bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_share_image_is_fixed_square_png() {
        let export = FormatEncoder::default()
            .share_image(&SvgMarkup::new(QR_SVG))
            .unwrap();
        let decoded = image::load_from_memory(&export.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (512, 512));
        assert_eq!(export.file_name, "qrcode.png");
    }

    #[test]
    fn test_missing_source_for_every_format() {
        let source: Option<SvgMarkup> = None;
        let encoder = FormatEncoder::default();
        for &format in ExportFormat::all() {
            let result = encoder.encode(&ExportRequest::new(&source, format, SubscriptionTier::Pro));
            assert!(matches!(result, Err(Error::SourceMissing)), "{:?}", format);
        }
    }

    #[test]
    fn test_undecodable_source_does_not_fall_back() {
        let source = SvgMarkup::new("<not-svg>");
        let result = FormatEncoder::default().encode(&request(&source, ExportFormat::RasterPng));
        assert!(matches!(result, Err(Error::DecodeFailed(_))));
    }

    #[test]
    fn test_repeated_downloads_are_identical() {
        let source = SvgMarkup::new(QR_SVG);
        let encoder = FormatEncoder::default();
        for &format in ExportFormat::download_choices() {
            let first = encoder.encode(&request(&source, format)).unwrap();
            let second = encoder.encode(&request(&source, format)).unwrap();
            assert_eq!(first, second, "{:?}", format);
        }
    }
}
