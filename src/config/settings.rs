//! Settings
//!
//! User preferences and deployment parameters for the export/share pipeline,
//! serialized as JSON. Every field has a default so partial or older config
//! files keep loading.

use crate::entitlement::{EntitlementTable, SubscriptionTier};
use crate::export::{DocumentLayout, EncoderOptions, ExportFormat, PixelSize};
use crate::promo::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Destination the monetization side effect opens.
pub const DEFAULT_PROMO_URL: &str =
    "https://www.profitableratecpm.com/i05a32zv3x?key=e8aa2d7d76baecb611b49ce0d5af754f";

// ─────────────────────────────────────────────────────────────────────────────
// Promo Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Monetization side-effect settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromoSettings {
    pub enabled: bool,
    pub url: String,
    pub retry: RetryPolicy,
}

impl Default for PromoSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_PROMO_URL.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 520.0,
            height: 640.0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Download format for tiers that honor a preference
    pub preferred_format: ExportFormat,

    /// Tier of the current user, as supplied by the account layer
    pub subscription_tier: SubscriptionTier,

    /// Elevated tiers allowed to export documents
    pub document_export_tiers: Vec<SubscriptionTier>,

    pub promo: PromoSettings,

    /// Title handed to the native share surface
    pub share_title: String,

    /// Document caption budget in characters
    pub caption_limit: usize,

    /// Side of the raster embedded in documents, in pixels
    pub document_resolution: u32,

    /// Side of the image attached to shares, in pixels
    pub share_image_resolution: u32,

    pub jpeg_quality: u8,

    /// Save straight into this directory instead of asking with a dialog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    pub window_size: WindowSize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preferred_format: ExportFormat::Vector,
            subscription_tier: SubscriptionTier::Free,
            document_export_tiers: vec![SubscriptionTier::Pro, SubscriptionTier::Business],
            promo: PromoSettings::default(),
            share_title: "QR Code from QRito".to_string(),
            caption_limit: 60,
            document_resolution: 600,
            share_image_resolution: 512,
            jpeg_quality: 90,
            output_dir: None,
            window_size: WindowSize::default(),
        }
    }
}

impl Settings {
    pub const MIN_CAPTION_LIMIT: usize = 8;
    pub const MAX_CAPTION_LIMIT: usize = 200;
    pub const MIN_RESOLUTION: u32 = 64;
    pub const MAX_RESOLUTION: u32 = 4096;
    pub const MIN_JPEG_QUALITY: u8 = 1;
    pub const MAX_JPEG_QUALITY: u8 = 100;
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;

    /// Sanitize settings by clamping values to valid ranges.
    pub fn sanitize(&mut self) {
        self.caption_limit = self
            .caption_limit
            .clamp(Self::MIN_CAPTION_LIMIT, Self::MAX_CAPTION_LIMIT);
        self.document_resolution = self
            .document_resolution
            .clamp(Self::MIN_RESOLUTION, Self::MAX_RESOLUTION);
        self.share_image_resolution = self
            .share_image_resolution
            .clamp(Self::MIN_RESOLUTION, Self::MAX_RESOLUTION);
        self.jpeg_quality = self
            .jpeg_quality
            .clamp(Self::MIN_JPEG_QUALITY, Self::MAX_JPEG_QUALITY);

        // Free never exports documents; keep the list short and unique
        self.document_export_tiers
            .retain(|tier| *tier != SubscriptionTier::Free);
        self.document_export_tiers.sort();
        self.document_export_tiers.dedup();

        self.promo.retry = self.promo.retry.sanitized();

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
    }

    /// Load settings and sanitize them to ensure validity.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// The entitlement gate for these settings.
    pub fn entitlement_table(&self) -> EntitlementTable {
        EntitlementTable::new(&self.document_export_tiers)
    }

    /// Encoder options for these settings.
    pub fn encoder_options(&self) -> EncoderOptions {
        EncoderOptions {
            document_resolution: PixelSize::square_saturating(self.document_resolution),
            share_resolution: PixelSize::square_saturating(self.share_image_resolution),
            jpeg_quality: self.jpeg_quality,
            layout: DocumentLayout {
                caption_limit: self.caption_limit,
                ..DocumentLayout::default()
            },
        }
    }

    /// Promo URL, or `None` when the side effect is switched off.
    pub fn promo_url(&self) -> Option<&str> {
        let url = self.promo.url.trim();
        (self.promo.enabled && !url.is_empty()).then_some(url)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
