// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! QRito Share - Main Entry Point
//!
//! A small window around the export/share pipeline: open an SVG QR code,
//! enter its payload and link, then download, copy or share it.

mod app;
mod state;

use app::QritoApp;
use log::info;
use qrito_share::config::load_config;
use std::path::PathBuf;

/// Application name constant.
const APP_NAME: &str = "QRito Share";

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    let settings = load_config();
    let window_size = settings.window_size;

    // Optional SVG path as the first argument
    let initial_svg = std::env::args_os().nth(1).map(PathBuf::from);

    let viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([360.0, 420.0]);

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(QritoApp::new(cc, settings, initial_svg)))),
    )
}
