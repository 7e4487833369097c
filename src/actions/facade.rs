//! Action Facade
//!
//! The entry surface for the UI. Every action runs its steps in a fixed order
//! on the calling thread:
//!
//! - download / export: entitlement check, promo, encode, save
//! - copy: promo, clipboard
//! - share: promo, share orchestrator
//!
//! Nothing happens before the entitlement check, so a rejected request has
//! no side effects.

use crate::actions::{ActionOutcome, Notice};
use crate::clipboard::ClipboardService;
use crate::config::{default_download_dir, Settings};
use crate::entitlement::{EntitlementTable, SubscriptionTier};
use crate::error::Result;
use crate::export::{
    DialogSaver, DirectorySaver, ExportFormat, ExportRequest, FileSaver, FormatEncoder,
    SaveOutcome, VectorSource,
};
use crate::launcher::{SystemLauncher, UrlLauncher};
use crate::promo::PromoTrigger;
use crate::share::{
    ChannelOutcome, NativeShare, NoNativeShare, ShareFlow, ShareOrchestrator, ShareTarget,
};
use log::{debug, info};
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// Platform
// ─────────────────────────────────────────────────────────────────────────────

/// Platform side effects used by the facade.
pub struct Platform {
    pub clipboard: ClipboardService,
    pub saver: Box<dyn FileSaver>,
    pub launcher: Arc<dyn UrlLauncher>,
    pub native_share: Box<dyn NativeShare>,
}

impl Platform {
    /// The host system: save dialog (or the configured directory), arboard,
    /// the default browser, and no native share sheet.
    pub fn system(settings: &Settings) -> Self {
        let saver: Box<dyn FileSaver> = match &settings.output_dir {
            Some(dir) => Box::new(DirectorySaver::new(dir)),
            None => Box::new(DialogSaver::new(default_download_dir())),
        };

        Self {
            clipboard: ClipboardService::system(),
            saver,
            launcher: Arc::new(SystemLauncher),
            native_share: Box::new(NoNativeShare),
        }
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("clipboard", &self.clipboard)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Context
// ─────────────────────────────────────────────────────────────────────────────

/// What the UI knows about the current code, passed to every action.
#[derive(Debug, Clone, Copy)]
pub struct QrContext<'a> {
    pub source: &'a dyn VectorSource,
    /// The data encoded into the code
    pub payload: &'a str,
    /// Canonical link to the code
    pub link: &'a str,
    pub tier: SubscriptionTier,
}

// ─────────────────────────────────────────────────────────────────────────────
// Facade
// ─────────────────────────────────────────────────────────────────────────────

pub struct ActionFacade {
    entitlements: EntitlementTable,
    encoder: FormatEncoder,
    promo: PromoTrigger,
    preferred_format: ExportFormat,
    share_title: String,
    platform: Platform,
}

impl ActionFacade {
    pub fn new(settings: &Settings, platform: Platform) -> Self {
        let promo = match settings.promo_url() {
            Some(url) => PromoTrigger::new(
                Arc::clone(&platform.launcher),
                url,
                settings.promo.retry,
            ),
            None => PromoTrigger::disabled(Arc::clone(&platform.launcher)),
        };

        Self {
            entitlements: settings.entitlement_table(),
            encoder: FormatEncoder::new(settings.encoder_options()),
            promo,
            preferred_format: settings.preferred_format,
            share_title: settings.share_title.clone(),
            platform,
        }
    }

    pub fn entitlements(&self) -> &EntitlementTable {
        &self.entitlements
    }

    pub fn encoder(&self) -> &FormatEncoder {
        &self.encoder
    }

    pub fn preferred_format(&self) -> ExportFormat {
        self.preferred_format
    }

    pub fn set_preferred_format(&mut self, format: ExportFormat) {
        self.preferred_format = format;
    }

    /// Whether the action buttons are offered at all.
    ///
    /// Requires a link, plus either a freshly generated code or a payload on
    /// a paid tier.
    pub fn actions_visible(
        generated: bool,
        payload: &str,
        link: &str,
        tier: SubscriptionTier,
    ) -> bool {
        let has_code = generated || (!payload.is_empty() && tier != SubscriptionTier::Free);
        has_code && !link.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Download
    // ─────────────────────────────────────────────────────────────────────────

    /// Plain download in the tier's download format.
    ///
    /// Free always downloads PNG; other tiers use the preferred format.
    pub fn download(&self, ctx: &QrContext<'_>) -> Result<ActionOutcome> {
        let format = self
            .entitlements
            .entitlement(ctx.tier)
            .resolve_download_format(self.preferred_format);
        self.export(ctx, format)
    }

    /// Document download with the payload as caption.
    pub fn export_document(&self, ctx: &QrContext<'_>) -> Result<ActionOutcome> {
        self.export(ctx, ExportFormat::Document)
    }

    /// Export in an explicit format.
    ///
    /// # Errors
    ///
    /// `Error::NotEntitled` before anything else happens when the tier may not
    /// produce `format`; otherwise source, encode and file errors.
    pub fn export(&self, ctx: &QrContext<'_>, format: ExportFormat) -> Result<ActionOutcome> {
        self.entitlements.check(ctx.tier, format)?;
        self.promo.fire();

        let mut request = ExportRequest::new(ctx.source, format, ctx.tier);
        if format == ExportFormat::Document {
            request = request.with_caption(ctx.payload);
        }
        let export = self.encoder.encode(&request)?;

        match self.platform.saver.save(&export)? {
            SaveOutcome::Saved(path) => {
                info!("Downloaded {} to {}", format.label(), path.display());
                Ok(ActionOutcome::Completed(download_notice(format)))
            }
            SaveOutcome::Dismissed => {
                debug!("Download of {} dismissed", export.file_name);
                Ok(ActionOutcome::NoOp)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Copy
    // ─────────────────────────────────────────────────────────────────────────

    /// Copy the payload text.
    pub fn copy(&self, ctx: &QrContext<'_>) -> Result<ActionOutcome> {
        self.promo.fire();
        let result = self.platform.clipboard.copy_text(ctx.payload)?;
        debug!("Copied via {:?}", result.method);
        Ok(ActionOutcome::Completed(Notice::success(
            "Copied",
            "QR code content copied to clipboard",
        )))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Share
    // ─────────────────────────────────────────────────────────────────────────

    /// Quick share through the native surface, or ask for a channel.
    pub fn share(&self, ctx: &QrContext<'_>) -> Result<ActionOutcome> {
        self.promo.fire();
        let flow = self.orchestrator().share(ctx.source, ctx.payload, ctx.link);
        Ok(flow_outcome(flow))
    }

    /// Share to a specific channel.
    pub fn share_to_channel(
        &self,
        ctx: &QrContext<'_>,
        target: ShareTarget,
    ) -> Result<ActionOutcome> {
        self.promo.fire();
        let outcome =
            self.orchestrator()
                .share_to_channel(target, ctx.source, ctx.payload, ctx.link)?;

        Ok(match outcome {
            ChannelOutcome::Opened(target) => ActionOutcome::Completed(Notice::success(
                "Opened Sharing",
                format!("Opened {} for sharing", target.label()),
            )),
            ChannelOutcome::ImageSavedAndCopied => ActionOutcome::Completed(Notice::success(
                "QR Code Downloaded for Instagram",
                "QR image downloaded and content copied. Upload the image to Instagram with the copied text.",
            )),
            ChannelOutcome::CopiedOnly => ActionOutcome::Completed(Notice::success(
                "Content Copied",
                "Content copied! Download the QR image and share on Instagram.",
            )),
            ChannelOutcome::Native(flow) => flow_outcome(flow),
        })
    }

    fn orchestrator(&self) -> ShareOrchestrator<'_> {
        ShareOrchestrator {
            native: self.platform.native_share.as_ref(),
            launcher: self.platform.launcher.as_ref(),
            clipboard: &self.platform.clipboard,
            saver: self.platform.saver.as_ref(),
            encoder: &self.encoder,
            title: &self.share_title,
        }
    }
}

impl std::fmt::Debug for ActionFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionFacade")
            .field("preferred_format", &self.preferred_format)
            .field("promo", &self.promo)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

fn download_notice(format: ExportFormat) -> Notice {
    match format {
        ExportFormat::Document => Notice::success(
            "PDF Download Started",
            "QR code downloaded as PDF successfully",
        ),
        other => Notice::success(
            "Download started",
            format!("QR code downloaded as {}", other.label()),
        ),
    }
}

fn flow_outcome(flow: ShareFlow) -> ActionOutcome {
    match flow {
        ShareFlow::Shared => {
            ActionOutcome::Completed(Notice::success("Shared Successfully", "Shared QR code"))
        }
        ShareFlow::Cancelled => ActionOutcome::NoOp,
        ShareFlow::ChooseChannel => ActionOutcome::ChooseChannel,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PROMO_URL;
    use crate::error::Error;
    use crate::share::{NativeShareOutcome, ShareCapability};
    use crate::testing::{
        CountingSource, FakeNativeShare, MemorySaver, RecordingClipboard, RecordingLauncher,
    };

    const PAYLOAD: &str = "hello";
    const LINK: &str = "https://q.example/hello";

    struct Harness {
        facade: ActionFacade,
        launcher: Arc<RecordingLauncher>,
        saver: MemorySaver,
        clipboard: RecordingClipboard,
        native: FakeNativeShare,
    }

    impl Harness {
        fn new(settings: &Settings) -> Self {
            Self::with(settings, MemorySaver::default(), FakeNativeShare::unavailable())
        }

        fn with(settings: &Settings, saver: MemorySaver, native: FakeNativeShare) -> Self {
            let launcher = Arc::new(RecordingLauncher::opening());
            let clipboard = RecordingClipboard::default();
            let platform = Platform {
                clipboard: clipboard.service(),
                saver: Box::new(saver.clone()),
                launcher: launcher.clone(),
                native_share: Box::new(native.clone()),
            };
            Self {
                facade: ActionFacade::new(settings, platform),
                launcher,
                saver,
                clipboard,
                native,
            }
        }

        fn promo_opens(&self) -> usize {
            self.launcher.count_prefixed(DEFAULT_PROMO_URL)
        }
    }

    fn ctx(source: &CountingSource, tier: SubscriptionTier) -> QrContext<'_> {
        QrContext {
            source,
            payload: PAYLOAD,
            link: LINK,
            tier,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Entitlement ordering
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_free_document_rejected_without_side_effects() {
        let harness = Harness::new(&Settings::default());
        let source = CountingSource::qr();

        let result = harness
            .facade
            .export_document(&ctx(&source, SubscriptionTier::Free));

        match result {
            Err(Error::NotEntitled {
                format,
                unlocked_by,
                ..
            }) => {
                assert_eq!(format, ExportFormat::Document);
                assert_eq!(
                    unlocked_by,
                    vec![SubscriptionTier::Pro, SubscriptionTier::Business]
                );
            }
            other => panic!("Expected NotEntitled, got {:?}", other),
        }
        assert_eq!(source.calls(), 0);
        assert_eq!(harness.launcher.count(), 0);
        assert!(harness.saver.saved().is_empty());
    }

    #[test]
    fn test_rejection_notice_is_upgrade_prompt() {
        let harness = Harness::new(&Settings::default());
        let source = CountingSource::qr();
        let err = harness
            .facade
            .export_document(&ctx(&source, SubscriptionTier::Free))
            .unwrap_err();

        let notice = err.notice();
        assert_eq!(notice.title, "Premium Feature");
        assert_eq!(
            notice.description,
            "PDF download is only available for Pro and Business plans. Please upgrade to access this feature."
        );
    }

    #[test]
    fn test_free_explicit_vector_rejected() {
        let harness = Harness::new(&Settings::default());
        let source = CountingSource::qr();
        let result = harness
            .facade
            .export(&ctx(&source, SubscriptionTier::Free), ExportFormat::Vector);
        assert!(matches!(result, Err(Error::NotEntitled { .. })));
        assert_eq!(harness.promo_opens(), 0);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Download
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_free_download_forced_to_png() {
        let harness = Harness::new(&Settings::default());
        let source = CountingSource::qr();

        let outcome = harness
            .facade
            .download(&ctx(&source, SubscriptionTier::Free))
            .unwrap();

        assert_eq!(
            outcome.notice().unwrap().description,
            "QR code downloaded as PNG"
        );
        let saved = harness.saver.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].file_name, "qrcode.png");
        assert_eq!(harness.promo_opens(), 1);
    }

    #[test]
    fn test_pro_download_uses_preference() {
        let settings = Settings {
            preferred_format: ExportFormat::RasterJpeg,
            ..Settings::default()
        };
        let harness = Harness::new(&settings);
        let source = CountingSource::qr();

        harness
            .facade
            .download(&ctx(&source, SubscriptionTier::Pro))
            .unwrap();
        assert_eq!(harness.saver.saved()[0].file_name, "qrcode.jpeg");
    }

    #[test]
    fn test_vector_download_is_passthrough() {
        let harness = Harness::new(&Settings::default());
        let source = CountingSource::qr();

        harness
            .facade
            .download(&ctx(&source, SubscriptionTier::Business))
            .unwrap();
        let saved = harness.saver.saved();
        assert_eq!(saved[0].mime_type, "image/svg+xml");
        assert_eq!(saved[0].bytes, crate::testing::QR_SVG.as_bytes());
    }

    #[test]
    fn test_repeated_downloads_are_identical() {
        let harness = Harness::new(&Settings::default());
        let source = CountingSource::qr();
        let context = ctx(&source, SubscriptionTier::Free);

        harness.facade.download(&context).unwrap();
        harness.facade.download(&context).unwrap();

        let saved = harness.saver.saved();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].bytes, saved[1].bytes);
        assert_eq!(harness.promo_opens(), 2);
    }

    #[test]
    fn test_document_export_for_pro() {
        let harness = Harness::new(&Settings::default());
        let source = CountingSource::qr();

        let outcome = harness
            .facade
            .export_document(&ctx(&source, SubscriptionTier::Pro))
            .unwrap();

        assert_eq!(outcome.notice().unwrap().title, "PDF Download Started");
        let saved = harness.saver.saved();
        assert_eq!(saved[0].file_name, "qrcode.pdf");
        assert!(saved[0].bytes.starts_with(b"%PDF-"));
        assert_eq!(harness.promo_opens(), 1);
    }

    #[test]
    fn test_document_tiers_are_configurable() {
        let settings = Settings {
            document_export_tiers: vec![SubscriptionTier::Pro],
            ..Settings::default()
        };
        let harness = Harness::new(&settings);
        let source = CountingSource::qr();

        let result = harness
            .facade
            .export_document(&ctx(&source, SubscriptionTier::Business));
        match result {
            Err(Error::NotEntitled { unlocked_by, .. }) => {
                assert_eq!(unlocked_by, vec![SubscriptionTier::Pro])
            }
            other => panic!("Expected NotEntitled, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_source_is_reported() {
        let harness = Harness::new(&Settings::default());
        let source = CountingSource::missing();

        let err = harness
            .facade
            .download(&ctx(&source, SubscriptionTier::Free))
            .unwrap_err();
        assert!(matches!(err, Error::SourceMissing));
        assert_eq!(err.notice().description, "QR code not found");
        assert!(harness.saver.saved().is_empty());
    }

    #[test]
    fn test_dismissed_save_is_noop() {
        let harness = Harness::with(
            &Settings::default(),
            MemorySaver::dismissing(),
            FakeNativeShare::unavailable(),
        );
        let source = CountingSource::qr();

        let outcome = harness
            .facade
            .download(&ctx(&source, SubscriptionTier::Free))
            .unwrap();
        assert_eq!(outcome, ActionOutcome::NoOp);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Copy
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_copy_fires_promo_and_copies_payload() {
        let harness = Harness::new(&Settings::default());
        let source = CountingSource::qr();

        let outcome = harness
            .facade
            .copy(&ctx(&source, SubscriptionTier::Free))
            .unwrap();

        assert_eq!(outcome.notice().unwrap().title, "Copied");
        assert_eq!(harness.clipboard.writes(), vec![PAYLOAD.to_string()]);
        assert_eq!(harness.promo_opens(), 1);
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn test_promo_disabled() {
        let mut settings = Settings::default();
        settings.promo.enabled = false;
        let harness = Harness::new(&settings);
        let source = CountingSource::qr();

        harness
            .facade
            .copy(&ctx(&source, SubscriptionTier::Free))
            .unwrap();
        assert_eq!(harness.launcher.count(), 0);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Share
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_share_without_native_asks_for_channel() {
        let harness = Harness::new(&Settings::default());
        let source = CountingSource::qr();

        let outcome = harness
            .facade
            .share(&ctx(&source, SubscriptionTier::Free))
            .unwrap();
        assert_eq!(outcome, ActionOutcome::ChooseChannel);
        assert_eq!(source.calls(), 0);
        assert_eq!(harness.promo_opens(), 1);
    }

    #[test]
    fn test_native_cancel_is_noop() {
        let harness = Harness::with(
            &Settings::default(),
            MemorySaver::default(),
            FakeNativeShare::new(ShareCapability::Files, NativeShareOutcome::Cancelled),
        );
        let source = CountingSource::qr();

        let result = harness.facade.share(&ctx(&source, SubscriptionTier::Pro));
        assert_eq!(result.unwrap(), ActionOutcome::NoOp);
        assert_eq!(harness.native.requests()[0].title, "QR Code from QRito");
    }

    #[test]
    fn test_share_to_twitter() {
        let harness = Harness::new(&Settings::default());
        let source = CountingSource::qr();

        let outcome = harness
            .facade
            .share_to_channel(&ctx(&source, SubscriptionTier::Free), ShareTarget::Twitter)
            .unwrap();

        assert_eq!(
            outcome.notice().unwrap().description,
            "Opened Twitter for sharing"
        );
        let urls = harness.launcher.urls();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0], DEFAULT_PROMO_URL);
        assert_eq!(
            urls[1],
            "https://twitter.com/intent/tweet?text=hello&url=https%3A%2F%2Fq.example%2Fhello"
        );
    }

    #[test]
    fn test_share_to_instagram() {
        let harness = Harness::new(&Settings::default());
        let source = CountingSource::qr();

        let outcome = harness
            .facade
            .share_to_channel(&ctx(&source, SubscriptionTier::Free), ShareTarget::Instagram)
            .unwrap();

        assert_eq!(
            outcome.notice().unwrap().title,
            "QR Code Downloaded for Instagram"
        );
        assert_eq!(harness.launcher.urls(), vec![DEFAULT_PROMO_URL.to_string()]);
        assert_eq!(harness.saver.saved()[0].file_name, "qrcode.png");
        assert_eq!(harness.clipboard.writes(), vec![PAYLOAD.to_string()]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Visibility
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_actions_visible() {
        use SubscriptionTier::*;
        assert!(ActionFacade::actions_visible(true, "", LINK, Free));
        assert!(!ActionFacade::actions_visible(false, PAYLOAD, LINK, Free));
        assert!(ActionFacade::actions_visible(false, PAYLOAD, LINK, Pro));
        assert!(!ActionFacade::actions_visible(true, PAYLOAD, "", Business));
        assert!(!ActionFacade::actions_visible(false, "", LINK, Business));
    }
}
