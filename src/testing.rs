//! Fakes for the platform collaborators, shared by unit tests.

use crate::clipboard::{ClipboardBackend, ClipboardError, ClipboardService};
use crate::error::Result;
use crate::export::{EncodedExport, FileSaver, SaveOutcome, VectorSource};
use crate::launcher::{LaunchOutcome, UrlLauncher};
use crate::share::{NativeShare, NativeShareOutcome, NativeShareRequest, ShareCapability};
use std::cell::{Cell, RefCell};
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Mutex;

/// A 40x40 code-like graphic with transparent gaps.
pub const QR_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="40" viewBox="0 0 4 4"><rect x="0" y="0" width="2" height="2" fill="black"/><rect x="2" y="2" width="2" height="2" fill="black"/></svg>"#;

// ─────────────────────────────────────────────────────────────────────────────
// Vector Source
// ─────────────────────────────────────────────────────────────────────────────

/// Counts how often the markup is serialized.
#[derive(Debug)]
pub struct CountingSource {
    markup: Option<String>,
    calls: Cell<usize>,
}

impl CountingSource {
    pub fn qr() -> Self {
        Self {
            markup: Some(QR_SVG.to_string()),
            calls: Cell::new(0),
        }
    }

    pub fn missing() -> Self {
        Self {
            markup: None,
            calls: Cell::new(0),
        }
    }

    pub fn with_markup(markup: &str) -> Self {
        Self {
            markup: Some(markup.to_string()),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl VectorSource for CountingSource {
    fn markup(&self) -> Option<String> {
        self.calls.set(self.calls.get() + 1);
        self.markup.clone()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Launcher
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum LaunchBehavior {
    Open,
    Block,
    Fail,
}

/// Records every URL it is asked to open.
#[derive(Debug)]
pub struct RecordingLauncher {
    behavior: LaunchBehavior,
    urls: Mutex<Vec<String>>,
}

impl RecordingLauncher {
    fn with(behavior: LaunchBehavior) -> Self {
        Self {
            behavior,
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn opening() -> Self {
        Self::with(LaunchBehavior::Open)
    }

    pub fn blocking() -> Self {
        Self::with(LaunchBehavior::Block)
    }

    pub fn failing() -> Self {
        Self::with(LaunchBehavior::Fail)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.urls.lock().unwrap().len()
    }

    /// URLs opened that start with `prefix`.
    pub fn count_prefixed(&self, prefix: &str) -> usize {
        self.urls().iter().filter(|u| u.starts_with(prefix)).count()
    }
}

impl UrlLauncher for RecordingLauncher {
    fn open_url(&self, url: &str) -> io::Result<LaunchOutcome> {
        self.urls.lock().unwrap().push(url.to_string());
        match self.behavior {
            LaunchBehavior::Open => Ok(LaunchOutcome::Opened),
            LaunchBehavior::Block => Ok(LaunchOutcome::Blocked),
            LaunchBehavior::Fail => Err(io::Error::new(io::ErrorKind::Other, "no browser")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Saver
// ─────────────────────────────────────────────────────────────────────────────

/// Keeps saved exports in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySaver {
    saved: Rc<RefCell<Vec<EncodedExport>>>,
    dismiss: bool,
}

impl MemorySaver {
    /// Behaves like a save dialog the user closes.
    pub fn dismissing() -> Self {
        Self {
            dismiss: true,
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Vec<EncodedExport> {
        self.saved.borrow().clone()
    }
}

impl FileSaver for MemorySaver {
    fn save(&self, export: &EncodedExport) -> Result<SaveOutcome> {
        if self.dismiss {
            return Ok(SaveOutcome::Dismissed);
        }
        self.saved.borrow_mut().push(export.clone());
        Ok(SaveOutcome::Saved(PathBuf::from(&export.file_name)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard
// ─────────────────────────────────────────────────────────────────────────────

/// Clipboard backend that records writes, or rejects them.
#[derive(Debug, Clone, Default)]
pub struct RecordingClipboard {
    writes: Rc<RefCell<Vec<String>>>,
    fail: bool,
}

impl RecordingClipboard {
    pub fn rejecting() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }

    /// A service using this backend as its only path.
    pub fn service(&self) -> ClipboardService {
        ClipboardService::new(Some(Box::new(self.clone())), None)
    }
}

impl ClipboardBackend for RecordingClipboard {
    fn write_text(&self, text: &str) -> std::result::Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::WriteError("rejected".to_string()));
        }
        self.writes.borrow_mut().push(text.to_string());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Native Share
// ─────────────────────────────────────────────────────────────────────────────

/// Native share surface with a fixed capability and outcome.
#[derive(Debug, Clone)]
pub struct FakeNativeShare {
    capability: ShareCapability,
    outcome: NativeShareOutcome,
    probes: Rc<Cell<usize>>,
    requests: Rc<RefCell<Vec<NativeShareRequest>>>,
}

impl FakeNativeShare {
    pub fn new(capability: ShareCapability, outcome: NativeShareOutcome) -> Self {
        Self {
            capability,
            outcome,
            probes: Rc::new(Cell::new(0)),
            requests: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn unavailable() -> Self {
        Self::new(
            ShareCapability::Unavailable,
            NativeShareOutcome::Failed("unavailable".to_string()),
        )
    }

    pub fn probes(&self) -> usize {
        self.probes.get()
    }

    pub fn requests(&self) -> Vec<NativeShareRequest> {
        self.requests.borrow().clone()
    }
}

impl NativeShare for FakeNativeShare {
    fn probe(&self) -> ShareCapability {
        self.probes.set(self.probes.get() + 1);
        self.capability
    }

    fn share(&self, request: &NativeShareRequest) -> NativeShareOutcome {
        self.requests.borrow_mut().push(request.clone());
        self.outcome.clone()
    }
}
