//! Application state for the QRito Share window
//!
//! Holds what the UI layer owns: the settings, the loaded code with its
//! payload and link, and transient UI state such as the toast.

use log::{debug, info};
use qrito_share::actions::{notice_for, ActionOutcome, Notice};
use qrito_share::config::{save_config_silent, Settings};
use qrito_share::export::SvgFile;
use qrito_share::Result;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

/// Transient UI state.
#[derive(Debug, Default)]
pub struct UiState {
    /// Notice shown in the status bar
    pub toast: Option<Notice>,
    /// When the toast should expire (as seconds since app start)
    pub toast_expires_at: Option<f64>,
    /// Whether the channel list is open
    pub show_channels: bool,
    /// Whether the preview texture must be rebuilt
    pub preview_dirty: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// App State
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct AppState {
    pub settings: Settings,
    /// The loaded QR code
    pub source: Option<SvgFile>,
    /// Data encoded into the code
    pub payload: String,
    /// Canonical link to the code
    pub link: String,
    /// Whether a code was loaded in this session
    pub generated: bool,
    pub ui: UiState,
    settings_dirty: bool,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            source: None,
            payload: String::new(),
            link: String::new(),
            generated: false,
            ui: UiState::default(),
            settings_dirty: false,
        }
    }

    /// Use the SVG at `path` as the current code.
    pub fn load_svg(&mut self, path: PathBuf) {
        info!("Loaded QR code from {}", path.display());
        if self.payload.is_empty() {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                self.payload = stem.to_string();
            }
        }
        self.source = Some(SvgFile::new(path));
        self.generated = true;
        self.ui.show_channels = false;
        self.ui.preview_dirty = true;
    }

    pub fn mark_settings_dirty(&mut self) {
        self.settings_dirty = true;
    }

    /// Persist settings if anything changed since the last save.
    pub fn save_settings_if_dirty(&mut self) {
        if self.settings_dirty && save_config_silent(&self.settings) {
            debug!("Settings saved");
            self.settings_dirty = false;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Action results
    // ─────────────────────────────────────────────────────────────────────────

    /// Show the result of an action.
    pub fn apply_result(&mut self, result: Result<ActionOutcome>, current_time: f64) {
        if let Ok(ActionOutcome::ChooseChannel) = result {
            self.ui.show_channels = true;
        }
        if let Some(notice) = notice_for(&result) {
            let duration = if notice.is_error() { 4.0 } else { 2.5 };
            self.show_toast(notice, current_time, duration);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Toast
    // ─────────────────────────────────────────────────────────────────────────

    /// Show a toast notice for `duration` seconds.
    pub fn show_toast(&mut self, notice: Notice, current_time: f64, duration: f64) {
        self.ui.toast = Some(notice);
        self.ui.toast_expires_at = Some(current_time + duration);
    }

    /// Update toast state - clears expired toasts.
    ///
    /// Call this each frame with the current time.
    pub fn update_toast(&mut self, current_time: f64) {
        if let Some(expires_at) = self.ui.toast_expires_at {
            if current_time >= expires_at {
                self.clear_toast();
            }
        }
    }

    /// Clear any active toast message.
    pub fn clear_toast(&mut self) {
        self.ui.toast = None;
        self.ui.toast_expires_at = None;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
