//! Native system share capability
//!
//! Desktop platforms reached through this crate have no share sheet, so the
//! system implementation reports `Unavailable` and every share goes straight
//! to channel selection. Hosts that do have one plug it in through
//! `NativeShare`.

/// Data handed to a share surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SharePayload {
    pub text: String,
    pub url: String,
    /// PNG bytes; only present when rasterization succeeded
    pub image_blob: Option<Vec<u8>>,
}

impl SharePayload {
    pub fn new(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
            image_blob: None,
        }
    }

    pub fn with_image(mut self, image: Option<Vec<u8>>) -> Self {
        self.image_blob = image;
        self
    }
}

/// What the platform share surface can do, as reported by a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareCapability {
    /// No native share surface
    Unavailable,
    /// Text and links only
    TextOnly,
    /// Text, links and files
    Files,
}

/// One native share invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeShareRequest {
    pub title: String,
    pub payload: SharePayload,
}

/// How a native share ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeShareOutcome {
    Shared,
    /// The user dismissed the share surface
    Cancelled,
    Failed(String),
}

/// A platform share surface.
pub trait NativeShare {
    fn probe(&self) -> ShareCapability;
    fn share(&self, request: &NativeShareRequest) -> NativeShareOutcome;
}

/// The share surface of platforms that have none.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNativeShare;

impl NativeShare for NoNativeShare {
    fn probe(&self) -> ShareCapability {
        ShareCapability::Unavailable
    }

    fn share(&self, _request: &NativeShareRequest) -> NativeShareOutcome {
        NativeShareOutcome::Failed("native sharing is not available".to_string())
    }
}
