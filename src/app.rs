//! Main application module for QRito Share
//!
//! The window around the export/share pipeline. It owns the vector source,
//! payload, link and tier the core needs, and shows action results as toasts.

use crate::state::AppState;
use eframe::egui;
use log::{debug, info, warn};
use qrito_share::actions::{ActionFacade, ActionOutcome, Platform, QrContext};
use qrito_share::config::Settings;
use qrito_share::entitlement::SubscriptionTier;
use qrito_share::export::{ExportFormat, PixelSize, RasterSize, VectorSource};
use qrito_share::share::ShareTarget;
use qrito_share::string_utils::preview_text;
use qrito_share::Result;
use std::path::PathBuf;

/// Side of the on-screen preview in pixels.
const PREVIEW_SIDE: u32 = 256;

/// Characters of the payload shown under the preview.
const PAYLOAD_PREVIEW_CHARS: usize = 60;

/// Which action button was pressed this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiAction {
    Download,
    Document,
    Copy,
    Share,
    Channel(ShareTarget),
}

pub struct QritoApp {
    state: AppState,
    facade: ActionFacade,
    /// Rasterized preview of the loaded code
    preview: Option<egui::TextureHandle>,
    /// Application start time for timing toast messages
    start_time: std::time::Instant,
}

impl QritoApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        settings: Settings,
        initial_svg: Option<PathBuf>,
    ) -> Self {
        info!("Initializing QRito Share");

        let facade = ActionFacade::new(&settings, Platform::system(&settings));
        let mut state = AppState::new(settings);
        if let Some(path) = initial_svg {
            state.load_svg(path);
        }

        Self {
            state,
            facade,
            preview: None,
            start_time: std::time::Instant::now(),
        }
    }

    /// Get elapsed time since app start in seconds.
    fn get_app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    fn open_svg_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Open QR Code")
            .add_filter("SVG", &["svg"])
            .pick_file();

        match picked {
            Some(path) => self.state.load_svg(path),
            None => debug!("Open dialog dismissed"),
        }
    }

    /// Rebuild the preview texture after the source changed.
    fn refresh_preview(&mut self, ctx: &egui::Context) {
        if !self.state.ui.preview_dirty {
            return;
        }
        self.state.ui.preview_dirty = false;
        self.preview = None;

        let Some(source) = &self.state.source else {
            return;
        };

        let size = RasterSize::Fixed(PixelSize::square_saturating(PREVIEW_SIDE));
        match self.facade.encoder().rasterizer().rasterize(source, size) {
            Ok(buffer) => {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [buffer.width() as usize, buffer.height() as usize],
                    &buffer.to_rgba_bytes(),
                );
                self.preview =
                    Some(ctx.load_texture("qr-preview", image, egui::TextureOptions::NEAREST));
            }
            Err(e) => {
                warn!("Preview unavailable: {}", e);
                let time = self.get_app_time();
                self.state.show_toast(e.notice(), time, 4.0);
            }
        }
    }

    /// Run a UI action through the facade and show its result.
    fn run_action(&mut self, action: UiAction) {
        let result = match &self.state.source {
            Some(source) => {
                let ctx = QrContext {
                    source: source as &dyn VectorSource,
                    payload: &self.state.payload,
                    link: &self.state.link,
                    tier: self.state.settings.subscription_tier,
                };
                dispatch(&self.facade, &ctx, action)
            }
            None => Err(qrito_share::Error::SourceMissing),
        };

        if let (UiAction::Channel(_), Ok(ActionOutcome::Completed(_))) = (action, &result) {
            self.state.ui.show_channels = false;
        }

        let time = self.get_app_time();
        self.state.apply_result(result, time);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Panels
    // ─────────────────────────────────────────────────────────────────────────

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.state.settings.subscription_tier.label());
                if let Some(toast) = &self.state.ui.toast {
                    let text = format!("{}: {}", toast.title, toast.description);
                    let text = if toast.is_error() {
                        egui::RichText::new(text).color(ui.visuals().error_fg_color)
                    } else {
                        egui::RichText::new(text).italics()
                    };
                    ui.with_layout(
                        egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                        |ui| {
                            ui.label(text);
                        },
                    );
                }
            });
        });
    }

    /// Inputs owned by the UI layer. Returns `true` when settings changed.
    fn render_inputs(&mut self, ui: &mut egui::Ui) -> bool {
        let mut settings_changed = false;

        egui::Grid::new("qr_inputs")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Payload");
                ui.text_edit_singleline(&mut self.state.payload);
                ui.end_row();

                ui.label("Link");
                ui.text_edit_singleline(&mut self.state.link);
                ui.end_row();

                ui.label("Plan");
                let tier = &mut self.state.settings.subscription_tier;
                egui::ComboBox::from_id_source("tier_select")
                    .selected_text(tier.label())
                    .show_ui(ui, |ui| {
                        for option in SubscriptionTier::all() {
                            settings_changed |= ui
                                .selectable_value(tier, *option, option.label())
                                .changed();
                        }
                    });
                ui.end_row();

                ui.label("Download as");
                let format = &mut self.state.settings.preferred_format;
                egui::ComboBox::from_id_source("format_select")
                    .selected_text(format.label())
                    .show_ui(ui, |ui| {
                        for option in ExportFormat::download_choices() {
                            settings_changed |= ui
                                .selectable_value(format, *option, option.label())
                                .changed();
                        }
                    });
                ui.end_row();
            });

        settings_changed
    }

    fn render_actions(&mut self, ui: &mut egui::Ui) -> Option<UiAction> {
        let mut action = None;
        let tier = self.state.settings.subscription_tier;
        let document_allowed = self
            .facade
            .entitlements()
            .entitlement(tier)
            .allows_document_export;

        ui.horizontal(|ui| {
            if ui.button("Download").clicked() {
                action = Some(UiAction::Download);
            }
            let pdf = ui.button("PDF");
            let pdf = if document_allowed {
                pdf
            } else {
                pdf.on_hover_text("Available on paid plans")
            };
            if pdf.clicked() {
                action = Some(UiAction::Document);
            }
            if ui.button("Copy").clicked() {
                action = Some(UiAction::Copy);
            }
            if ui.button("Share").clicked() {
                action = Some(UiAction::Share);
            }
            ui.menu_button("Share to…", |ui| {
                for target in ShareTarget::channels() {
                    if ui.button(target.label()).clicked() {
                        action = Some(UiAction::Channel(*target));
                        ui.close_menu();
                    }
                }
            });
        });

        if self.state.ui.show_channels {
            ui.separator();
            ui.label("Choose where to share");
            ui.horizontal_wrapped(|ui| {
                for target in ShareTarget::channels() {
                    if ui.button(target.label()).clicked() {
                        action = Some(UiAction::Channel(*target));
                    }
                }
                if ui.button("Close").clicked() {
                    self.state.ui.show_channels = false;
                }
            });
        }

        action
    }
}

impl eframe::App for QritoApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let current_time = self.get_app_time();
        self.state.update_toast(current_time);
        if self.state.ui.toast.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }

        self.refresh_preview(ctx);
        self.render_status_bar(ctx);

        let mut action = None;
        let mut open_requested = false;
        let mut settings_changed = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open SVG…").clicked() {
                    open_requested = true;
                }
                if let Some(source) = &self.state.source {
                    ui.label(source.path().display().to_string());
                }
            });
            ui.separator();

            match &self.preview {
                Some(texture) => {
                    ui.vertical_centered(|ui| {
                        ui.image((texture.id(), texture.size_vec2()));
                        if !self.state.payload.is_empty() {
                            ui.small(preview_text(&self.state.payload, PAYLOAD_PREVIEW_CHARS));
                        }
                    });
                }
                None => {
                    ui.label("Open an SVG QR code to get started.");
                }
            }
            ui.separator();

            settings_changed = self.render_inputs(ui);
            ui.separator();

            let visible = ActionFacade::actions_visible(
                self.state.generated,
                &self.state.payload,
                &self.state.link,
                self.state.settings.subscription_tier,
            );
            if visible {
                action = self.render_actions(ui);
            } else {
                ui.weak("Enter a link to enable download and sharing.");
            }
        });

        if settings_changed {
            self.facade
                .set_preferred_format(self.state.settings.preferred_format);
            self.state.mark_settings_dirty();
        }
        if open_requested {
            self.open_svg_dialog();
        }
        if let Some(action) = action {
            self.run_action(action);
        }
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.state.save_settings_if_dirty();
    }

    /// Save persistent state.
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        debug!("Saving application state");
        self.state.save_settings_if_dirty();
    }
}

fn dispatch(facade: &ActionFacade, ctx: &QrContext<'_>, action: UiAction) -> Result<ActionOutcome> {
    match action {
        UiAction::Download => facade.download(ctx),
        UiAction::Document => facade.export_document(ctx),
        UiAction::Copy => facade.copy(ctx),
        UiAction::Share => facade.share(ctx),
        UiAction::Channel(target) => facade.share_to_channel(ctx, target),
    }
}
