//! shelfmap entry point: load a catalog, hand it to the app shell.

use std::path::Path;

use eframe::egui;

mod app;
mod ui;

use app::AtlasApp;

fn main() {
    env_logger::init();

    let records = match std::env::args().nth(1) {
        Some(path) => match shelfmap::record::load_records(Path::new(&path)) {
            Ok(records) => {
                log::info!("loaded {} records from {path}", records.len());
                records
            }
            Err(err) => {
                eprintln!("shelfmap: {err}");
                std::process::exit(1);
            }
        },
        None => {
            log::info!("no dataset given, showing the built-in sample catalog");
            shelfmap::record::sample_catalog()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "shelfmap — Catalog Treemap",
        options,
        Box::new(move |_cc| Ok(Box::new(AtlasApp::new(records)))),
    )
    .expect("Failed to start shelfmap");
}
