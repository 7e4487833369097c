//! Vector sources
//!
//! A vector source is the live QR code graphic handed to the pipeline by the
//! UI layer. It is passed explicitly to every operation that needs it.

use log::debug;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Something that can be serialized to SVG markup on demand.
pub trait VectorSource: fmt::Debug {
    /// Serialize the current graphic.
    ///
    /// Returns `None` when the source no longer exists.
    fn markup(&self) -> Option<String>;
}

/// SVG markup held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgMarkup(String);

impl SvgMarkup {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl VectorSource for SvgMarkup {
    fn markup(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// An SVG file on disk, read fresh on every serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgFile {
    path: PathBuf,
}

impl SvgFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VectorSource for SvgFile {
    fn markup(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(markup) => Some(markup),
            Err(e) => {
                debug!("SVG source {} unavailable: {}", self.path.display(), e);
                None
            }
        }
    }
}

impl<T: VectorSource> VectorSource for Option<T> {
    fn markup(&self) -> Option<String> {
        self.as_ref().and_then(VectorSource::markup)
    }
}
