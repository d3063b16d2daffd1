#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod driver;
mod surface;

use app::TwixApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 260.0])
            .with_title("twix"),
        ..Default::default()
    };

    eframe::run_native("twix", options, Box::new(|cc| Ok(Box::new(TwixApp::new(cc)?))))
}
