//! Saving encoded exports
//!
//! The "download" side effect: either a native save dialog (rfd) or a fixed
//! output directory that never overwrites earlier downloads.

use crate::error::{Error, Result};
use crate::export::EncodedExport;
use log::{debug, info};
use rfd::FileDialog;
use std::fs;
use std::path::{Path, PathBuf};

/// What happened to a save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Bytes were written to this path
    Saved(PathBuf),
    /// The user closed the save dialog without choosing a location
    Dismissed,
}

/// Destination for exported bytes.
pub trait FileSaver {
    fn save(&self, export: &EncodedExport) -> Result<SaveOutcome>;
}

/// Write `export` to `path`.
pub fn write_export(path: &Path, export: &EncodedExport) -> Result<()> {
    fs::write(path, &export.bytes).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(
        "Saved {} ({} bytes) to {}",
        export.mime_type,
        export.bytes.len(),
        path.display()
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Native Save Dialog
// ─────────────────────────────────────────────────────────────────────────────

/// Asks the user where to save through a native dialog.
#[derive(Debug, Clone, Default)]
pub struct DialogSaver {
    initial_dir: Option<PathBuf>,
}

impl DialogSaver {
    pub fn new(initial_dir: Option<PathBuf>) -> Self {
        Self { initial_dir }
    }
}

impl FileSaver for DialogSaver {
    fn save(&self, export: &EncodedExport) -> Result<SaveOutcome> {
        let mut dialog = FileDialog::new()
            .set_title("Save QR Code")
            .add_filter(export.format.label(), &[export.format.extension()])
            .set_file_name(export.file_name.as_str());

        if let Some(dir) = &self.initial_dir {
            dialog = dialog.set_directory(dir);
        }

        match dialog.save_file() {
            Some(path) => {
                write_export(&path, export)?;
                Ok(SaveOutcome::Saved(path))
            }
            None => {
                debug!("Save dialog dismissed for {}", export.file_name);
                Ok(SaveOutcome::Dismissed)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Directory Saver
// ─────────────────────────────────────────────────────────────────────────────

/// Saves straight into a directory, like a browser's downloads folder.
///
/// Existing files are kept: a second `qrcode.png` lands as `qrcode (1).png`.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// First free path for `file_name` in the directory.
    fn available_path(&self, file_name: &str) -> PathBuf {
        let candidate = self.dir.join(file_name);
        if !candidate.exists() {
            return candidate;
        }

        let (stem, extension) = match file_name.rsplit_once('.') {
            Some((stem, ext)) => (stem, format!(".{}", ext)),
            None => (file_name, String::new()),
        };

        (1..)
            .map(|n| self.dir.join(format!("{} ({}){}", stem, n, extension)))
            .find(|path| !path.exists())
            .unwrap_or(candidate)
    }
}

impl FileSaver for DirectorySaver {
    fn save(&self, export: &EncodedExport) -> Result<SaveOutcome> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::FileWrite {
            path: self.dir.clone(),
            source: e,
        })?;

        let path = self.available_path(&export.file_name);
        write_export(&path, export)?;
        Ok(SaveOutcome::Saved(path))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
