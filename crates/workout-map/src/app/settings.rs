use crate::entrypoints::cli::parse_args;
use clap::Parser;
use std::path::PathBuf;
use workout_map_lib::{
    ControllerConfig, Coords, DEFAULT_STORAGE_KEY, DEFAULT_ZOOM, ValidationRules,
};

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Workout Map - Log running and cycling workouts by clicking on a map
pub struct Settings {
    /// Latitude reported as the current position (native only)
    #[clap(long, allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    /// Longitude reported as the current position (native only)
    #[clap(long, allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    /// Zoom level used when centering the map
    #[clap(short, long, default_value_t = DEFAULT_ZOOM)]
    pub zoom: f64,

    /// Storage key holding the workout log
    #[clap(long, default_value = DEFAULT_STORAGE_KEY)]
    pub storage_key: String,

    /// Location of the storage file (native only)
    #[clap(long, value_name = "FILE")]
    pub storage_file: Option<PathBuf>,

    /// Reject negative elevation gain for cycling workouts
    #[clap(long, default_value = "false")]
    pub require_positive_elevation: bool,

    /// Ignore previously persisted workouts and start fresh
    #[clap(long, default_value = "false")]
    pub ignore_persisted: bool,

    /// Delete persisted workouts on startup
    #[clap(long, default_value = "false")]
    pub reset: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::parse_from(["workout-map"])
    }
}

impl Settings {
    pub fn from_cli() -> Self {
        match parse_args::<Settings>() {
            Ok(args) => args,
            Err(e) => {
                #[cfg(not(target_arch = "wasm32"))]
                e.exit();
                #[cfg(target_arch = "wasm32")]
                {
                    let user_msg = format!(
                        "Error parsing CLI:\n{}\n
    You should change the GET params, using the cli prefix.\n
    Starting anyway without args.",
                        e
                    );
                    if let Some(window) = web_sys::window() {
                        window.alert_with_message(&user_msg).unwrap_or(());
                    } else {
                        tracing::error!(user_msg);
                    }
                    Settings::default()
                }
            }
        }
    }

    /// Position configured on the command line, if both halves are present
    pub fn fixed_position(&self) -> Option<Coords> {
        Some(Coords::new(self.latitude?, self.longitude?))
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            storage_key: self.storage_key.clone(),
            zoom: self.zoom,
            rules: ValidationRules::default()
                .with_positive_elevation(self.require_positive_elevation),
        }
    }
}
