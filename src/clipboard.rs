//! Clipboard Service
//!
//! Copies text to the system clipboard. The primary path is the arboard
//! crate; when it is unavailable or refuses the write, a legacy path pipes the
//! text through the platform's copy command (`pbcopy`, `clip`, `wl-copy`,
//! `xclip`) from a scratch file that is removed whatever the outcome.

// - enum_variant_names: Error variants follow standard naming convention
#![allow(clippy::enum_variant_names)]

use crate::error::{Error, Result};
use arboard::Clipboard;
use log::{debug, info, warn};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors from a single clipboard backend.
#[derive(Debug)]
pub enum ClipboardError {
    /// Failed to access clipboard
    AccessError(String),
    /// Failed to set clipboard content
    WriteError(String),
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::AccessError(msg) => write!(f, "Clipboard access error: {}", msg),
            ClipboardError::WriteError(msg) => write!(f, "Clipboard write error: {}", msg),
        }
    }
}

impl std::error::Error for ClipboardError {}

impl From<arboard::Error> for ClipboardError {
    fn from(err: arboard::Error) -> Self {
        ClipboardError::WriteError(err.to_string())
    }
}

impl From<std::io::Error> for ClipboardError {
    fn from(err: std::io::Error) -> Self {
        ClipboardError::WriteError(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Results
// ─────────────────────────────────────────────────────────────────────────────

/// Which path completed a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardMethod {
    NativeApi,
    LegacyFallback,
}

/// Outcome of a successful copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardResult {
    pub succeeded: bool,
    pub method: ClipboardMethod,
}

// ─────────────────────────────────────────────────────────────────────────────
// Backends
// ─────────────────────────────────────────────────────────────────────────────

/// A way of putting text on the clipboard.
pub trait ClipboardBackend {
    fn write_text(&self, text: &str) -> std::result::Result<(), ClipboardError>;
}

/// The system clipboard through arboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardBackend for SystemClipboard {
    fn write_text(&self, text: &str) -> std::result::Result<(), ClipboardError> {
        let mut clipboard =
            Clipboard::new().map_err(|e| ClipboardError::AccessError(e.to_string()))?;

        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::WriteError(e.to_string()))?;

        Ok(())
    }
}

/// Copies by running a platform copy command on a scratch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
    scratch_dir: Option<PathBuf>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            scratch_dir: None,
        }
    }

    /// Create scratch files in `dir` instead of the system temp directory.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// The copy command for the current platform, if there is one.
    pub fn platform_default() -> Option<Self> {
        if cfg!(target_os = "macos") {
            Some(Self::new("pbcopy", &[]))
        } else if cfg!(target_os = "windows") {
            Some(Self::new("clip", &[]))
        } else if cfg!(unix) {
            if std::env::var_os("WAYLAND_DISPLAY").is_some() {
                Some(Self::new("wl-copy", &[]))
            } else {
                Some(Self::new("xclip", &["-selection", "clipboard"]))
            }
        } else {
            None
        }
    }
}

impl ClipboardBackend for CommandClipboard {
    fn write_text(&self, text: &str) -> std::result::Result<(), ClipboardError> {
        let builder = {
            let mut b = tempfile::Builder::new();
            b.prefix("qrito-clip-").suffix(".txt");
            b
        };
        // Removed on drop, on every return path below
        let mut scratch = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| ClipboardError::AccessError(e.to_string()))?;

        scratch.write_all(text.as_bytes())?;
        scratch.flush()?;
        let input = scratch.reopen()?;

        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::from(input))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| ClipboardError::AccessError(format!("{}: {}", self.program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::WriteError(format!(
                "{} exited with {}",
                self.program, status
            )))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Service
// ─────────────────────────────────────────────────────────────────────────────

/// Primary clipboard with a legacy fallback, tried once each.
pub struct ClipboardService {
    primary: Option<Box<dyn ClipboardBackend>>,
    fallback: Option<Box<dyn ClipboardBackend>>,
}

impl ClipboardService {
    pub fn new(
        primary: Option<Box<dyn ClipboardBackend>>,
        fallback: Option<Box<dyn ClipboardBackend>>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// arboard first, then the platform copy command.
    pub fn system() -> Self {
        Self::new(
            Some(Box::new(SystemClipboard)),
            CommandClipboard::platform_default()
                .map(|c| Box::new(c) as Box<dyn ClipboardBackend>),
        )
    }

    /// Copy `text`, falling back once if the primary path fails.
    ///
    /// # Errors
    ///
    /// `Error::ClipboardFailed` when no path succeeded.
    pub fn copy_text(&self, text: &str) -> Result<ClipboardResult> {
        let mut failures = Vec::new();

        if let Some(primary) = &self.primary {
            match primary.write_text(text) {
                Ok(()) => {
                    debug!("Copied {} bytes via clipboard API", text.len());
                    return Ok(ClipboardResult {
                        succeeded: true,
                        method: ClipboardMethod::NativeApi,
                    });
                }
                Err(e) => {
                    warn!("Clipboard API failed, trying fallback: {}", e);
                    failures.push(e.to_string());
                }
            }
        }

        if let Some(fallback) = &self.fallback {
            match fallback.write_text(text) {
                Ok(()) => {
                    info!("Copied {} bytes via legacy copy command", text.len());
                    return Ok(ClipboardResult {
                        succeeded: true,
                        method: ClipboardMethod::LegacyFallback,
                    });
                }
                Err(e) => failures.push(e.to_string()),
            }
        }

        if failures.is_empty() {
            failures.push("no clipboard available".to_string());
        }
        Err(Error::ClipboardFailed(failures.join("; ")))
    }
}

impl std::fmt::Debug for ClipboardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardService")
            .field("primary", &self.primary.is_some())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
