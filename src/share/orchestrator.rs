//! Share Orchestrator
//!
//! Sharing is a small state machine. A capability probe decides between a
//! native attempt and manual channel selection; the native attempt either
//! resolves the share or falls back to channel selection. `transition` is the
//! whole policy and performs no I/O; `ShareOrchestrator` drives it against the
//! platform collaborators.

use crate::clipboard::ClipboardService;
use crate::error::{Error, Result};
use crate::export::{FileSaver, FormatEncoder, SaveOutcome, VectorSource};
use crate::launcher::{LaunchOutcome, UrlLauncher};
use crate::share::{
    NativeShare, NativeShareOutcome, NativeShareRequest, ShareCapability, SharePayload,
    ShareTarget,
};
use log::{debug, info, warn};

// ─────────────────────────────────────────────────────────────────────────────
// State Machine
// ─────────────────────────────────────────────────────────────────────────────

/// Terminal result of a share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareResolution {
    Shared,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareState {
    /// Initial state
    CapabilityProbe,
    /// Native share is about to be attempted
    NativeAttempt { include_image: bool },
    /// The user picks a channel
    ManualFallback,
    Resolved(ShareResolution),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareEvent {
    Probed(ShareCapability),
    NativeFinished(NativeShareOutcome),
}

/// Next state for `event` in `state`.
///
/// Events that do not apply to a state leave it unchanged.
pub fn transition(state: ShareState, event: &ShareEvent) -> ShareState {
    match (state, event) {
        (ShareState::CapabilityProbe, ShareEvent::Probed(capability)) => match capability {
            ShareCapability::Unavailable => ShareState::ManualFallback,
            ShareCapability::TextOnly => ShareState::NativeAttempt {
                include_image: false,
            },
            ShareCapability::Files => ShareState::NativeAttempt {
                include_image: true,
            },
        },
        (ShareState::NativeAttempt { .. }, ShareEvent::NativeFinished(outcome)) => match outcome {
            NativeShareOutcome::Shared => ShareState::Resolved(ShareResolution::Shared),
            NativeShareOutcome::Cancelled => ShareState::Resolved(ShareResolution::Cancelled),
            NativeShareOutcome::Failed(_) => ShareState::ManualFallback,
        },
        (state, _) => state,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Outcomes
// ─────────────────────────────────────────────────────────────────────────────

/// Where a share request ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareFlow {
    Shared,
    /// Cancelled by the user; not an error
    Cancelled,
    /// No native share; the caller presents channel selection
    ChooseChannel,
}

/// Result of a single channel action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOutcome {
    /// The channel's compose page was opened
    Opened(ShareTarget),
    /// Image saved and text copied, for channels without a share URL
    ImageSavedAndCopied,
    /// Only the text could be copied
    CopiedOnly,
    /// Routed to the native share surface
    Native(ShareFlow),
}

// ─────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ─────────────────────────────────────────────────────────────────────────────

/// Runs one share against borrowed platform collaborators.
pub struct ShareOrchestrator<'a> {
    pub native: &'a dyn NativeShare,
    pub launcher: &'a dyn UrlLauncher,
    pub clipboard: &'a ClipboardService,
    pub saver: &'a dyn FileSaver,
    pub encoder: &'a FormatEncoder,
    /// Title passed to the native share surface
    pub title: &'a str,
}

impl<'a> ShareOrchestrator<'a> {
    /// Share through the richest surface available.
    ///
    /// The probe runs before anything touches `source`. Image failures only
    /// degrade the share to text and link.
    pub fn share(&self, source: &dyn VectorSource, text: &str, link: &str) -> ShareFlow {
        let mut state = ShareState::CapabilityProbe;
        let capability = self.native.probe();
        debug!("Share capability: {:?}", capability);
        state = transition(state, &ShareEvent::Probed(capability));

        loop {
            match state {
                ShareState::NativeAttempt { include_image } => {
                    let image = if include_image {
                        self.share_image(source)
                    } else {
                        None
                    };
                    let request = NativeShareRequest {
                        title: self.title.to_string(),
                        payload: SharePayload::new(text, link).with_image(image),
                    };
                    let outcome = self.native.share(&request);
                    if let NativeShareOutcome::Failed(reason) = &outcome {
                        info!("Native share failed, falling back to channels: {}", reason);
                    }
                    state = transition(state, &ShareEvent::NativeFinished(outcome));
                }
                ShareState::Resolved(ShareResolution::Shared) => return ShareFlow::Shared,
                ShareState::Resolved(ShareResolution::Cancelled) => {
                    debug!("Native share cancelled");
                    return ShareFlow::Cancelled;
                }
                ShareState::ManualFallback | ShareState::CapabilityProbe => {
                    return ShareFlow::ChooseChannel
                }
            }
        }
    }

    /// Share to one chosen channel.
    ///
    /// # Errors
    ///
    /// `Error::ShareFailed` when the channel page could not be opened, and
    /// `Error::ClipboardFailed` when a channel without a share URL could not
    /// even receive the copied text.
    pub fn share_to_channel(
        &self,
        target: ShareTarget,
        source: &dyn VectorSource,
        text: &str,
        link: &str,
    ) -> Result<ChannelOutcome> {
        if target == ShareTarget::NativeSystemShare {
            return Ok(ChannelOutcome::Native(self.share(source, text, link)));
        }

        if target.needs_image() {
            return self.save_and_copy(source, text);
        }

        let url = target.deep_link(text, link).ok_or_else(|| Error::ShareFailed {
            target: target.label().to_string(),
            message: "channel has no share link".to_string(),
        })?;

        match self.launcher.open_url(&url) {
            Ok(LaunchOutcome::Opened) => {
                info!("Opened {} for sharing", target.label());
                Ok(ChannelOutcome::Opened(target))
            }
            Ok(LaunchOutcome::Blocked) => Err(Error::ShareFailed {
                target: target.label().to_string(),
                message: "popup blocked".to_string(),
            }),
            Err(e) => Err(Error::ShareFailed {
                target: target.label().to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn save_and_copy(&self, source: &dyn VectorSource, text: &str) -> Result<ChannelOutcome> {
        let saved = match self.encoder.share_image(source) {
            Ok(image) => match self.saver.save(&image) {
                Ok(SaveOutcome::Saved(path)) => {
                    debug!("Share image saved to {}", path.display());
                    true
                }
                Ok(SaveOutcome::Dismissed) => false,
                Err(e) => {
                    warn!("Could not save share image: {}", e);
                    false
                }
            },
            Err(e) => {
                warn!("Could not render share image: {}", e);
                false
            }
        };

        self.clipboard.copy_text(text)?;

        Ok(if saved {
            ChannelOutcome::ImageSavedAndCopied
        } else {
            ChannelOutcome::CopiedOnly
        })
    }

    fn share_image(&self, source: &dyn VectorSource) -> Option<Vec<u8>> {
        match self.encoder.share_image(source) {
            Ok(image) => Some(image.bytes),
            Err(e) => {
                warn!("Sharing without image: {}", e);
                None
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
