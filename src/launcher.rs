//! Opening URLs in a new browsing context
//!
//! Share-channel deep links and the promotional destination are opened
//! through the `UrlLauncher` trait; the system implementation hands the URL to
//! the default browser with the `open` crate.

use log::debug;
use std::io;

/// Result of asking the platform to open a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// A browsing context was opened
    Opened,
    /// The platform refused to open one (e.g. a popup blocker)
    Blocked,
}

/// Opens URLs in a new browsing context.
pub trait UrlLauncher: Send + Sync {
    fn open_url(&self, url: &str) -> io::Result<LaunchOutcome>;
}

/// The default browser of the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl UrlLauncher for SystemLauncher {
    fn open_url(&self, url: &str) -> io::Result<LaunchOutcome> {
        debug!("Opening {}", url);
        open::that(url)?;
        Ok(LaunchOutcome::Opened)
    }
}
