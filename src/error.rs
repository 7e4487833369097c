//! Centralized error handling for QRito Share
//!
//! This module provides a unified error type that covers all error scenarios
//! in the export/share pipeline: source lookup, rasterization, encoding,
//! entitlement checks, clipboard and sharing, plus file I/O and configuration.

use crate::actions::Notice;
use crate::entitlement::SubscriptionTier;
use crate::export::ExportFormat;
use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the crate.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Export Pipeline Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The vector source could not be found or serialized
    SourceMissing,

    /// The vector markup could not be decoded into an image
    DecodeFailed(String),

    /// The pixel buffer or markup could not be encoded into the target format
    EncodeFailed {
        format: ExportFormat,
        message: String,
    },

    /// The subscription tier does not unlock the requested format
    NotEntitled {
        tier: SubscriptionTier,
        format: ExportFormat,
        /// Tiers that would unlock the format, for the upgrade prompt
        unlocked_by: Vec<SubscriptionTier>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Platform Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Neither clipboard path could copy the text
    ClipboardFailed(String),

    /// A share channel or the native share sheet failed
    ShareFailed { target: String, message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // File I/O Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic I/O error wrapper
    Io(io::Error),

    /// Failed to write file contents
    FileWrite { path: PathBuf, source: io::Error },

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load configuration file
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to save configuration file
    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse configuration (invalid JSON/format)
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration directory not found or inaccessible
    ConfigDirNotFound,
}

impl Error {
    /// Build the user-facing notice for this error.
    ///
    /// Notices use fixed wording per category; the internal message is only
    /// ever written to the log.
    pub fn notice(&self) -> Notice {
        match self {
            Error::SourceMissing => Notice::error("Error", "QR code not found"),
            Error::DecodeFailed(_) | Error::EncodeFailed { .. } => {
                Notice::error("Error", "Failed to process QR code")
            }
            Error::NotEntitled {
                format,
                unlocked_by,
                ..
            } => Notice::error(
                "Premium Feature",
                format!(
                    "{} download is only available for {} plans. Please upgrade to access this feature.",
                    format.label(),
                    SubscriptionTier::join_labels(unlocked_by)
                ),
            ),
            Error::ClipboardFailed(_) => Notice::error("Copy Failed", "Could not copy to clipboard"),
            Error::ShareFailed { .. } => Notice::error("Share Failed", "Could not open sharing"),
            Error::Io(_) | Error::FileWrite { .. } => {
                Notice::error("Error", "Failed to save file")
            }
            Error::ConfigLoad { .. }
            | Error::ConfigSave { .. }
            | Error::ConfigParse { .. }
            | Error::ConfigDirNotFound => Notice::error("Error", "Settings could not be updated"),
        }
    }
}

// Implement From traits for convenient error conversion
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for log-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Export Pipeline Errors
            Error::SourceMissing => write!(f, "Vector source not found"),
            Error::DecodeFailed(msg) => write!(f, "Failed to decode vector markup: {}", msg),
            Error::EncodeFailed { format, message } => {
                write!(f, "Failed to encode {}: {}", format.label(), message)
            }
            Error::NotEntitled { tier, format, .. } => {
                write!(
                    f,
                    "{} export is not available on the {} plan",
                    format.label(),
                    tier.label()
                )
            }

            // Platform Errors
            Error::ClipboardFailed(msg) => write!(f, "Clipboard copy failed: {}", msg),
            Error::ShareFailed { target, message } => {
                write!(f, "Sharing via {} failed: {}", target, message)
            }

            // File I/O Errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::FileWrite { path, source } => {
                write!(f, "Failed to write '{}': {}", path.display(), source)
            }

            // Configuration Errors
            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::FileWrite { source, .. } => Some(source),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigSave { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::SourceMissing
            | Error::DecodeFailed(_)
            | Error::EncodeFailed { .. }
            | Error::NotEntitled { .. }
            | Error::ClipboardFailed(_)
            | Error::ShareFailed { .. }
            | Error::ConfigDirNotFound => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
