//! Settings on disk
//!
//! `Settings` live as pretty JSON in the platform config directory. Reads
//! never fail the caller: a missing, empty or unreadable file yields the
//! defaults. Writes go to a sibling `.bak` file first and are renamed into
//! place.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "qrito-share";
const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_BACKUP_NAME: &str = "config.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Locations
// ─────────────────────────────────────────────────────────────────────────────

/// `<config dir>/qrito-share`, e.g. `~/.config/qrito-share` on Linux or
/// `%APPDATA%\qrito-share` on Windows.
pub fn get_config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or(Error::ConfigDirNotFound)?;
    Ok(base.join(APP_NAME))
}

pub fn get_config_file_path() -> Result<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// The user's download directory, used as the save dialog's starting point.
pub fn default_download_dir() -> Option<PathBuf> {
    dirs::download_dir()
}

// ─────────────────────────────────────────────────────────────────────────────
// Reading
// ─────────────────────────────────────────────────────────────────────────────

/// Settings from the default location, or the defaults.
pub fn load_config() -> Settings {
    get_config_file_path()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

/// Read and sanitize settings from `path`.
///
/// A missing or blank file is not an error and yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Settings> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Settings::default());
        }
        Err(e) => {
            return Err(Error::ConfigLoad {
                path: path.to_path_buf(),
                source: Box::new(e),
            })
        }
    };

    if contents.trim().is_empty() {
        debug!("Config at {} is blank, using defaults", path.display());
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
        warn!("Invalid JSON in {}: {}", path.display(), e);
        Error::ConfigParse {
            message: format!("{}: {}", path.display(), e),
            source: Some(Box::new(e)),
        }
    })?;

    info!("Loaded settings from {}", path.display());
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Writing
// ─────────────────────────────────────────────────────────────────────────────

fn save_error<E>(path: &Path) -> impl FnOnce(E) -> Error + '_
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |e| Error::ConfigSave {
        path: path.to_path_buf(),
        source: Box::new(e),
    }
}

/// Write settings to the default location.
pub fn save_config(settings: &Settings) -> Result<()> {
    save_config_to(&get_config_dir()?, settings)
}

/// Write `settings` as `config.json` inside `config_dir`, creating it.
pub fn save_config_to(config_dir: &Path, settings: &Settings) -> Result<()> {
    fs::create_dir_all(config_dir).map_err(save_error(config_dir))?;

    let target = config_dir.join(CONFIG_FILE_NAME);
    let staging = config_dir.join(CONFIG_BACKUP_NAME);

    let json = serde_json::to_string_pretty(settings).map_err(save_error(&target))?;
    fs::write(&staging, json).map_err(save_error(&staging))?;
    fs::rename(&staging, &target).map_err(save_error(&target))?;

    info!("Saved settings to {}", target.display());
    Ok(())
}

/// Best-effort save; failures are logged. Returns whether it worked.
pub fn save_config_silent(settings: &Settings) -> bool {
    save_config(settings)
        .map_err(|e| warn!("Failed to save configuration: {}", e))
        .is_ok()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
