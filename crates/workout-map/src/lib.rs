//! Workout Map - Application Library
//!
//! Integrates the workout controller from `workout-map-lib` with an
//! eframe/walkers user interface, for desktop and the browser.

mod app;
pub mod entrypoints;

pub use app::WorkoutMapApp;

#[cfg(not(target_arch = "wasm32"))]
pub use entrypoints::run::native_main;

#[cfg(target_arch = "wasm32")]
pub use entrypoints::web::WebHandle;
