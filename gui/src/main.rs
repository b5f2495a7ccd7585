//! Desktop minesweeper: a thin egui window over `minesweeper-core`.

use eframe::{NativeOptions, egui};
use tracing::info;

use crate::app::MinesweeperApp;

mod app;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();
    info!("Starting minesweeper");

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([420.0, 460.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Minesweeper",
        options,
        Box::new(|cc| Ok(Box::new(MinesweeperApp::new(cc)?))),
    )
}
