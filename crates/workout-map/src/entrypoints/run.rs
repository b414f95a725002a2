//! Native entry point

use crate::app::WorkoutMapApp;
use crate::entrypoints::logging;

pub const APP_NAME: &str = "Workout Map";

/// Start the desktop application. Blocks until the window is closed.
pub fn native_main() -> eframe::Result<()> {
    logging::setup_logging();
    logging::log_version_info();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([480.0, 360.0])
            .with_title(APP_NAME),
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(|cc| Ok(Box::new(WorkoutMapApp::new(cc)))),
    )
}
