//! QR Code Export Module
//!
//! This module turns a live vector source into downloadable bytes.
//!
//! # Supported Export Formats
//!
//! - **SVG**: the serialized markup, untouched
//! - **PNG / JPEG**: rasterized on a white background
//! - **PDF**: a single page with the code centered and the payload as caption
//!
//! # Architecture
//!
//! - `options.rs` - Formats, requests and encoded results
//! - `source.rs` - Vector sources handed in by the UI
//! - `raster.rs` - SVG rasterization (resvg)
//! - `encoder.rs` - Format encoding (image)
//! - `document.rs` - The PDF container (printpdf)
//! - `save.rs` - Save dialog and download directory

pub mod document;
pub mod encoder;
pub mod options;
pub mod raster;
pub mod save;
pub mod source;

pub use document::DocumentLayout;
pub use encoder::{EncoderOptions, FormatEncoder};
pub use options::{EncodedExport, ExportFormat, ExportRequest, PixelSize, RasterSize};
pub use raster::{PixelBuffer, Rasterizer};
pub use save::{DialogSaver, DirectorySaver, FileSaver, SaveOutcome};
pub use source::{SvgFile, SvgMarkup, VectorSource};
