//! Export formats, requests and encoded results
//!
//! This module defines the data that flows through the export pipeline:
//! which format is wanted, at what pixel size, for which tier, and what the
//! encoder hands back.

use crate::entitlement::SubscriptionTier;
use crate::export::VectorSource;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Base name for every exported file.
pub const EXPORT_FILE_STEM: &str = "qrcode";

// ─────────────────────────────────────────────────────────────────────────────
// Export Format
// ─────────────────────────────────────────────────────────────────────────────

/// Output formats for a QR code export.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum ExportFormat {
    /// Serialized SVG markup, no rasterization
    #[default]
    #[serde(rename = "svg")]
    Vector,
    /// PNG raster image
    #[serde(rename = "png")]
    RasterPng,
    /// JPEG raster image (opaque background)
    #[serde(rename = "jpeg")]
    RasterJpeg,
    /// Single-page PDF with the code and a caption
    #[serde(rename = "pdf")]
    Document,
}

impl ExportFormat {
    /// Get the display label for this format.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Vector => "SVG",
            ExportFormat::RasterPng => "PNG",
            ExportFormat::RasterJpeg => "JPEG",
            ExportFormat::Document => "PDF",
        }
    }

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Vector => "svg",
            ExportFormat::RasterPng => "png",
            ExportFormat::RasterJpeg => "jpeg",
            ExportFormat::Document => "pdf",
        }
    }

    /// Get the MIME type of the encoded bytes.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Vector => "image/svg+xml",
            ExportFormat::RasterPng => "image/png",
            ExportFormat::RasterJpeg => "image/jpeg",
            ExportFormat::Document => "application/pdf",
        }
    }

    /// Suggested download file name, e.g. `qrcode.png`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", EXPORT_FILE_STEM, self.extension())
    }

    /// Formats offered as a plain download preference.
    pub fn download_choices() -> &'static [ExportFormat] {
        &[
            ExportFormat::Vector,
            ExportFormat::RasterPng,
            ExportFormat::RasterJpeg,
        ]
    }

    /// Get all export formats.
    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::Vector,
            ExportFormat::RasterPng,
            ExportFormat::RasterJpeg,
            ExportFormat::Document,
        ]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Raster Size
// ─────────────────────────────────────────────────────────────────────────────

/// A strictly positive pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelSize {
    width: NonZeroU32,
    height: NonZeroU32,
}

impl PixelSize {
    /// Create a size; `None` if either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            width: NonZeroU32::new(width)?,
            height: NonZeroU32::new(height)?,
        })
    }

    /// Create a square size; `None` if `side` is zero.
    pub fn square(side: u32) -> Option<Self> {
        Self::new(side, side)
    }

    /// Create a square size, raising `side` to at least one pixel.
    pub fn square_saturating(side: u32) -> Self {
        let side = NonZeroU32::new(side).unwrap_or(NonZeroU32::MIN);
        Self {
            width: side,
            height: side,
        }
    }

    pub fn width(&self) -> u32 {
        self.width.get()
    }

    pub fn height(&self) -> u32 {
        self.height.get()
    }
}

/// Target resolution for rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RasterSize {
    /// The intrinsic size declared by the vector source
    #[default]
    Natural,
    /// An explicit pixel size
    Fixed(PixelSize),
}

// ─────────────────────────────────────────────────────────────────────────────
// Export Request
// ─────────────────────────────────────────────────────────────────────────────

/// One export of one vector source.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    /// The live vector source to export
    pub source: &'a dyn VectorSource,
    /// The requested output format
    pub format: ExportFormat,
    /// Raster resolution; ignored for `Vector` and `Document`
    pub resolution: RasterSize,
    /// The requesting subscription tier
    pub tier: SubscriptionTier,
    /// Caption text for document containers
    pub caption: Option<&'a str>,
}

impl<'a> ExportRequest<'a> {
    /// Create a request at the natural size with no caption.
    pub fn new(
        source: &'a dyn VectorSource,
        format: ExportFormat,
        tier: SubscriptionTier,
    ) -> Self {
        Self {
            source,
            format,
            resolution: RasterSize::Natural,
            tier,
            caption: None,
        }
    }

    /// Set the raster resolution.
    pub fn with_resolution(mut self, resolution: RasterSize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the document caption.
    pub fn with_caption(mut self, caption: &'a str) -> Self {
        self.caption = Some(caption);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Encoded Export
// ─────────────────────────────────────────────────────────────────────────────

/// Bytes ready to be saved, with their type and suggested file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedExport {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub file_name: String,
}

impl EncodedExport {
    pub fn new(format: ExportFormat, bytes: Vec<u8>) -> Self {
        Self {
            format,
            bytes,
            mime_type: format.mime_type(),
            file_name: format.file_name(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
