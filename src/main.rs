// Hide the console window on Windows release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use clap::Parser;
use drawstudio::app::DrawStudioApp;
use drawstudio::cli::LaunchArgs;
use drawstudio::logger;
use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    let args = LaunchArgs::parse();
    let settings = args.editor_settings();

    // Initialize session log (overwrites previous session log)
    logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("DrawStudio"),
        ..Default::default()
    };

    eframe::run_native(
        "DrawStudio",
        options,
        Box::new(move |cc| Box::new(DrawStudioApp::new(cc, settings))),
    )
}
