//! Application module
//!
//! This module wires the workout controller to the UI:
//! - Full-screen OpenStreetMap view with workout markers and popups
//! - Sidebar with the entry form and the workout list
//! - Geolocation on startup, animated pan when a workout is selected
//! - Responsive layout (sidebar from bottom on portrait displays)

mod geolocation;
mod pan;
mod plugin;
pub(crate) mod settings;
mod storage;
mod ui_panels;

use crate::app::geolocation::PositionResult;
use crate::app::pan::PanAnimation;
use crate::app::plugin::{ClickSlot, WorkoutMarkersPlugin, closed_by_click};
use crate::app::settings::Settings;
use crate::app::ui_panels::SidebarAction;
use eframe::egui;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use walkers::{
    HttpTiles, Map, MapMemory,
    sources::{OpenStreetMap, TileSource},
};
use workout_map_lib::{
    Controller, ControllerError, Coords, MapStatus, MemoryStorage, StorageBackend, WorkoutId,
};

/// Main application structure
pub struct WorkoutMapApp {
    /// Workout log and form/map state
    controller: Controller,

    settings: Settings,

    /// Map tiles provider (OpenStreetMap)
    tiles: HttpTiles,

    /// Map state (camera position, zoom, etc.)
    map_memory: MapMemory,

    /// Clicks reported by the map plugin
    map_clicks: ClickSlot,

    /// Popups the user closed by clicking the map
    closed_popups: HashSet<WorkoutId>,

    /// Pending position request, `None` once answered
    position_rx: Option<oneshot::Receiver<PositionResult>>,

    /// The position request was answered with an error
    location_denied: bool,

    /// Running pan towards a selected workout
    pan: Option<PanAnimation>,

    /// Message of the blocking alert, if one is shown
    alert: Option<String>,

    /// Show help overlay
    show_help: bool,
}

impl WorkoutMapApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = Settings::from_cli();
        let mut alert = None;

        let storage: Box<dyn StorageBackend> =
            match storage::default_storage_backend(settings.storage_file.clone()) {
                Ok(storage) => storage,
                Err(e) => {
                    tracing::error!("Storage unavailable, workouts will not be saved: {}", e);
                    alert = Some(format!("Workouts will not be saved: {}", e));
                    Box::new(MemoryStorage::new())
                }
            };

        let mut controller = Controller::new(storage, settings.controller_config());

        if settings.reset {
            tracing::info!("Clearing stored workouts (--reset flag)");
            if let Err(e) = controller.reset() {
                tracing::error!("Failed to clear stored workouts: {}", e);
            }
        }

        if settings.ignore_persisted {
            tracing::info!("Ignoring persisted workouts (--ignore-persisted flag)");
        } else if let Err(e) = controller.restore() {
            tracing::error!("Failed to restore workouts: {}", e);
        }

        let position_rx = Some(geolocation::request_position(&cc.egui_ctx, &settings));

        Self {
            controller,
            settings,
            tiles: HttpTiles::new(OpenStreetMap, cc.egui_ctx.clone()),
            map_memory: MapMemory::default(),
            map_clicks: Arc::new(Mutex::new(None)),
            closed_popups: HashSet::new(),
            position_rx,
            location_denied: false,
            pan: None,
            alert,
            show_help: false,
        }
    }

    /// Show the alert of a user-facing error, log the rest
    fn report(&mut self, error: ControllerError) {
        match error.alert_message() {
            Some(message) => self.alert = Some(message.to_string()),
            None => tracing::warn!("{}", error),
        }
    }

    /// Finish initialization once the position request is answered
    fn poll_geolocation(&mut self, ctx: &egui::Context) {
        let Some(rx) = self.position_rx.as_mut() else {
            return;
        };
        let Some(result) = geolocation::poll_position(rx) else {
            ctx.request_repaint_after(Duration::from_millis(100));
            return;
        };
        self.position_rx = None;

        match self.controller.initialize(result) {
            Ok(center) => {
                self.location_denied = false;
                self.map_memory
                    .center_at(walkers::lat_lon(center.lat, center.lng));
                let _ = self.map_memory.set_zoom(self.controller.config().zoom);
            }
            Err(e) => {
                self.location_denied = true;
                self.report(e);
            }
        }
    }

    fn handle_action(&mut self, ctx: &egui::Context, action: SidebarAction) {
        match action {
            SidebarAction::Submit => {
                if let Err(e) = self.controller.submit() {
                    self.report(e);
                }
            }
            SidebarAction::Select(id) => {
                let from = match self.controller.map_status() {
                    MapStatus::Ready { center, .. } => center,
                    MapStatus::Uninitialized => return,
                };
                match self.controller.move_to_workout(&id) {
                    Ok(request) => {
                        self.pan = Some(PanAnimation::from_memory(&self.map_memory, from, request));
                        ctx.request_repaint();
                    }
                    Err(e) => self.report(e),
                }
            }
            SidebarAction::Reset => self.reset(ctx),
        }
    }

    /// Forget every workout and start over
    fn reset(&mut self, ctx: &egui::Context) {
        if let Err(e) = self.controller.reset() {
            tracing::error!("Reset failed: {}", e);
            return;
        }

        #[cfg(target_arch = "wasm32")]
        if let Some(window) = web_sys::window()
            && let Err(e) = window.location().reload()
        {
            tracing::error!("Failed to reload the page: {:?}", e);
        }

        self.closed_popups.clear();
        self.pan = None;
        self.location_denied = false;
        self.map_memory = MapMemory::default();
        self.position_rx = Some(geolocation::request_position(ctx, &self.settings));
    }

    fn render_map(&mut self, ui: &mut egui::Ui, center: Coords) {
        profiling::scope!("map_panel");

        let markers = self.controller.markers();
        let plugin =
            WorkoutMarkersPlugin::new(markers.clone(), &self.closed_popups, self.map_clicks.clone());

        let map = Map::new(
            Some(&mut self.tiles),
            &mut self.map_memory,
            walkers::lat_lon(center.lat, center.lng),
        )
        .with_plugin(plugin);
        ui.add(map);

        let painter = ui.painter();
        let screen_rect = ui.max_rect();
        painter.text(
            screen_rect.center_bottom() + egui::vec2(0.0, -5.0),
            egui::Align2::CENTER_BOTTOM,
            OpenStreetMap.attribution().text,
            egui::FontId::proportional(10.0),
            egui::Color32::from_black_alpha(180),
        );

        let clicked = match self.map_clicks.lock() {
            Ok(mut slot) => slot.take(),
            Err(e) => {
                tracing::error!("Click slot poisoned: {}", e);
                None
            }
        };
        if let Some(coords) = clicked {
            self.closed_popups.extend(closed_by_click(&markers));
            if let Err(e) = self.controller.handle_map_click(coords) {
                self.report(e);
            }
        }
    }
}

#[profiling::all_functions]
impl eframe::App for WorkoutMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle keyboard shortcuts
        ctx.input(|i| {
            if i.key_pressed(egui::Key::F1) {
                self.show_help = !self.show_help;
            }
            if i.key_pressed(egui::Key::H) && i.modifiers.ctrl {
                self.show_help = !self.show_help;
            }
        });

        self.poll_geolocation(ctx);

        if let Some(pan) = &self.pan {
            if pan.apply(&mut self.map_memory) {
                self.pan = None;
            } else {
                ctx.request_repaint();
            }
        }

        if self.show_help {
            ui_panels::help_overlay(ctx, &mut self.show_help);
        }

        // Render the main sidebar (responsive: side or bottom based on orientation)
        let action = ui_panels::render_sidebar(ctx, &mut self.controller);

        // Central panel: Map view (full screen)
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| match self.controller.map_status() {
                MapStatus::Ready { center, .. } => self.render_map(ui, center),
                MapStatus::Uninitialized if self.location_denied => {
                    ui_panels::map_placeholder(ui, "Map unavailable without your position")
                }
                MapStatus::Uninitialized => ui_panels::map_placeholder(ui, "Locating…"),
            });

        if let Some(action) = action {
            self.handle_action(ctx, action);
        }

        ui_panels::alert_modal(ctx, &mut self.alert);
    }
}
