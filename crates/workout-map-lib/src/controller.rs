//! Application controller
//!
//! Owns the workout log and drives the form/map state machine:
//!
//! ```text
//!   Idle ──map click──▶ AwaitingInput{coords} ──valid submit──▶ Idle
//!                          ▲        │
//!                          └─click──┘ (coords overwritten)
//! ```
//!
//! The map itself is tracked separately ([`MapStatus`]) because clicks are
//! only possible once geolocation has centered it.

use crate::form::WorkoutDraft;
use crate::log::WorkoutLog;
use crate::storage::{StorageBackend, StorageError, load_json, save_json};
use crate::validation::{ValidationError, ValidationRules};
use crate::view::{MarkerView, WorkoutRow};
use crate::workout::{Coords, Workout, WorkoutId, WorkoutType};
use chrono::{DateTime, Local};
use std::time::Duration;

/// Storage key holding the serialized workout log
pub const DEFAULT_STORAGE_KEY: &str = "workouts";

/// Zoom level used whenever the map is centered on something
pub const DEFAULT_ZOOM: f64 = 13.0;

/// Length of the animated pan when a workout is selected
pub const PAN_DURATION: Duration = Duration::from_secs(1);

/// Visibility of the entry form
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum FormState {
    #[default]
    Idle,
    AwaitingInput {
        coords: Coords,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum MapStatus {
    #[default]
    Uninitialized,
    Ready {
        center: Coords,
        zoom: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("the position request was denied")]
    Denied,

    #[error("geolocation is not available on this platform")]
    Unavailable,
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("could not get your position: {0}")]
    GeolocationDenied(#[from] GeolocationError),

    #[error("invalid workout input: {0}")]
    InvalidWorkoutInput(#[from] ValidationError),

    #[error("no location selected on the map")]
    NoPendingLocation,

    #[error("the map is not initialized yet")]
    MapNotReady,

    #[error("no workout with id {0}")]
    UnknownWorkout(WorkoutId),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ControllerError {
    /// Text of the blocking alert shown to the user, if this error is one
    pub fn alert_message(&self) -> Option<&'static str> {
        match self {
            Self::GeolocationDenied(_) => Some("Could not get your position"),
            Self::InvalidWorkoutInput(_) => Some("Inputs have to be positive numbers"),
            _ => None,
        }
    }
}

pub type ControllerResult<T> = Result<T, ControllerError>;

#[derive(Clone, Debug, PartialEq)]
pub struct ControllerConfig {
    pub storage_key: String,
    pub zoom: f64,
    pub rules: ValidationRules,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            zoom: DEFAULT_ZOOM,
            rules: ValidationRules::default(),
        }
    }
}

/// Where and how to move the map after a workout is selected
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanRequest {
    pub target: Coords,
    pub zoom: f64,
    pub duration: Duration,
}

pub struct Controller {
    config: ControllerConfig,
    storage: Box<dyn StorageBackend>,
    workouts: WorkoutLog,
    form: FormState,
    map: MapStatus,
    draft: WorkoutDraft,
    focus_requested: bool,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Controller {
    pub fn new(storage: Box<dyn StorageBackend>, config: ControllerConfig) -> Self {
        Self {
            config,
            storage,
            workouts: WorkoutLog::new(),
            form: FormState::Idle,
            map: MapStatus::Uninitialized,
            draft: WorkoutDraft::default(),
            focus_requested: false,
        }
    }

    #[inline]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[inline]
    pub fn workouts(&self) -> &WorkoutLog {
        &self.workouts
    }

    #[inline]
    pub fn form_state(&self) -> FormState {
        self.form
    }

    #[inline]
    pub fn map_status(&self) -> MapStatus {
        self.map
    }

    pub fn is_form_visible(&self) -> bool {
        matches!(self.form, FormState::AwaitingInput { .. })
    }

    pub fn draft(&self) -> &WorkoutDraft {
        &self.draft
    }

    /// Text inputs of the form, edited in place by the UI
    pub fn draft_mut(&mut self) -> &mut WorkoutDraft {
        &mut self.draft
    }

    /// Whether the distance field should grab keyboard focus. Consumed on read.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    /// Finish startup with the outcome of the geolocation request.
    pub fn initialize(
        &mut self,
        position: Result<Coords, GeolocationError>,
    ) -> ControllerResult<Coords> {
        match position {
            Ok(center) => {
                tracing::info!("Map centered at {}", center);
                self.map = MapStatus::Ready {
                    center,
                    zoom: self.config.zoom,
                };
                Ok(center)
            }
            Err(e) => {
                tracing::warn!("Geolocation failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Remember the clicked position and show the form
    pub fn handle_map_click(&mut self, coords: Coords) -> ControllerResult<()> {
        if self.map == MapStatus::Uninitialized {
            return Err(ControllerError::MapNotReady);
        }
        tracing::debug!("Map clicked at {}", coords);
        self.form = FormState::AwaitingInput { coords };
        self.focus_requested = true;
        Ok(())
    }

    pub fn toggle_workout_type(&mut self, workout_type: WorkoutType) {
        self.draft.toggle_type(workout_type);
    }

    /// Validate the form and log a new workout at the clicked position
    pub fn submit(&mut self) -> ControllerResult<&Workout> {
        self.submit_at(Local::now())
    }

    /// Like [`Controller::submit`] with an explicit creation date
    pub fn submit_at(&mut self, date: DateTime<Local>) -> ControllerResult<&Workout> {
        let FormState::AwaitingInput { coords } = self.form else {
            return Err(ControllerError::NoPendingLocation);
        };
        let input = self.draft.parse(&self.config.rules).inspect_err(|e| {
            tracing::debug!("Rejected workout input: {}", e);
        })?;

        let workout = input.into_workout_at(coords, date);
        tracing::info!("New workout {} ({})", workout.id(), workout.description());

        self.workouts.push(workout);
        self.draft.clear();
        self.form = FormState::Idle;

        if let Err(e) = self.persist() {
            tracing::error!("Failed to persist workouts: {}", e);
        }

        let index = self.workouts.len() - 1;
        Ok(&self.workouts.as_slice()[index])
    }

    /// Markers to draw. Empty until the map is ready.
    pub fn markers(&self) -> Vec<MarkerView> {
        match self.map {
            MapStatus::Uninitialized => Vec::new(),
            MapStatus::Ready { .. } => self.workouts.iter().map(MarkerView::from).collect(),
        }
    }

    /// List rows in creation order
    pub fn rows(&self) -> Vec<WorkoutRow> {
        self.workouts.iter().map(WorkoutRow::from).collect()
    }

    /// Select a workout from the list: count the click and pan to it
    pub fn move_to_workout(&mut self, id: &WorkoutId) -> ControllerResult<PanRequest> {
        if self.map == MapStatus::Uninitialized {
            return Err(ControllerError::MapNotReady);
        }
        let workout = self
            .workouts
            .get_mut(id)
            .ok_or_else(|| ControllerError::UnknownWorkout(id.clone()))?;
        workout.click();

        let request = PanRequest {
            target: workout.coords(),
            zoom: self.config.zoom,
            duration: PAN_DURATION,
        };
        self.map = MapStatus::Ready {
            center: request.target,
            zoom: request.zoom,
        };
        Ok(request)
    }

    /// Overwrite the stored log with the current one
    pub fn persist(&self) -> ControllerResult<()> {
        save_json(self.storage.as_ref(), &self.config.storage_key, &self.workouts)?;
        tracing::debug!("Persisted {} workouts", self.workouts.len());
        Ok(())
    }

    /// Replace the log with the stored one. A missing key means no workouts;
    /// an unreadable value is discarded with a warning.
    pub fn restore(&mut self) -> ControllerResult<usize> {
        match load_json::<WorkoutLog>(self.storage.as_ref(), &self.config.storage_key) {
            Ok(Some(log)) => {
                self.workouts = log;
                tracing::info!("Restored {} workouts", self.workouts.len());
            }
            Ok(None) => {
                tracing::info!("No stored workouts found, starting fresh");
                self.workouts.clear();
            }
            Err(StorageError::Json(e)) => {
                tracing::warn!("Ignoring unreadable stored workouts: {}", e);
                self.workouts.clear();
            }
            Err(e) => return Err(e.into()),
        }
        Ok(self.workouts.len())
    }

    /// Forget every workout, stored ones included, and start over
    pub fn reset(&mut self) -> ControllerResult<()> {
        self.storage.remove(&self.config.storage_key)?;
        self.workouts.clear();
        self.draft = WorkoutDraft::default();
        self.form = FormState::Idle;
        self.map = MapStatus::Uninitialized;
        self.focus_requested = false;
        tracing::info!("Workouts reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::TimeZone;
    use std::sync::Arc;

    const HOME: Coords = Coords {
        lat: 38.72,
        lng: -9.14,
    };

    fn controller() -> (Controller, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let controller = Controller::new(Box::new(storage.clone()), ControllerConfig::default());
        (controller, storage)
    }

    fn ready_controller() -> (Controller, Arc<MemoryStorage>) {
        let (mut controller, storage) = controller();
        controller.initialize(Ok(HOME)).unwrap();
        (controller, storage)
    }

    fn fill(controller: &mut Controller, workout_type: WorkoutType, values: [&str; 3]) {
        controller.toggle_workout_type(workout_type);
        let draft = controller.draft_mut();
        draft.distance = values[0].to_string();
        draft.duration = values[1].to_string();
        let field = draft.secondary_field();
        *draft.text_mut(field) = values[2].to_string();
    }

    fn day(day: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, day, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_initialize_success() {
        let (mut controller, _) = controller();
        assert_eq!(controller.initialize(Ok(HOME)).unwrap(), HOME);
        assert_eq!(
            controller.map_status(),
            MapStatus::Ready {
                center: HOME,
                zoom: DEFAULT_ZOOM
            }
        );
    }

    #[test]
    fn test_initialize_denied() {
        let (mut controller, _) = controller();
        let err = controller
            .initialize(Err(GeolocationError::Denied))
            .unwrap_err();
        assert!(matches!(err, ControllerError::GeolocationDenied(_)));
        assert_eq!(err.alert_message(), Some("Could not get your position"));
        assert_eq!(controller.map_status(), MapStatus::Uninitialized);
        assert!(matches!(
            controller.handle_map_click(HOME),
            Err(ControllerError::MapNotReady)
        ));
        assert!(!controller.is_form_visible());
    }

    #[test]
    fn test_map_click_shows_form_and_requests_focus() {
        let (mut controller, _) = ready_controller();
        assert_eq!(controller.form_state(), FormState::Idle);

        controller.handle_map_click(Coords::new(1.0, 2.0)).unwrap();
        assert!(controller.is_form_visible());
        assert!(controller.take_focus_request());
        assert!(!controller.take_focus_request());

        controller.handle_map_click(Coords::new(3.0, 4.0)).unwrap();
        assert_eq!(
            controller.form_state(),
            FormState::AwaitingInput {
                coords: Coords::new(3.0, 4.0)
            }
        );
    }

    #[test]
    fn test_submit_without_click() {
        let (mut controller, storage) = ready_controller();
        fill(&mut controller, WorkoutType::Running, ["5", "24", "178"]);
        assert!(matches!(
            controller.submit(),
            Err(ControllerError::NoPendingLocation)
        ));
        assert!(controller.workouts().is_empty());
        assert_eq!(storage.get_string(DEFAULT_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_submit_creates_and_persists() {
        let (mut controller, storage) = ready_controller();
        controller.handle_map_click(HOME).unwrap();
        fill(&mut controller, WorkoutType::Running, ["5", "24", "178"]);

        let workout = controller.submit_at(day(1)).unwrap();
        assert_eq!(workout.pace(), Some(4.8));
        assert_eq!(workout.coords(), HOME);

        assert_eq!(controller.form_state(), FormState::Idle);
        assert!(controller.draft().distance.is_empty());
        assert_eq!(controller.workouts().len(), 1);
        assert_eq!(controller.markers().len(), 1);
        assert_eq!(controller.rows().len(), 1);

        let stored = storage.get_string(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert!(stored.contains(r#""type":"running""#));
    }

    #[test]
    fn test_invalid_submit_keeps_state() {
        let (mut controller, storage) = ready_controller();
        controller.handle_map_click(HOME).unwrap();
        fill(&mut controller, WorkoutType::Running, ["5", "0", "178"]);

        let err = controller.submit().unwrap_err();
        assert_eq!(err.alert_message(), Some("Inputs have to be positive numbers"));
        assert!(controller.workouts().is_empty());
        assert!(controller.is_form_visible());
        assert_eq!(controller.draft().duration, "0");
        assert_eq!(storage.get_string(DEFAULT_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_markers_hidden_until_map_ready() {
        let (mut controller, storage) = controller();
        let seeded = WorkoutLog::from_iter([Workout::cycling_at(HOME, 20.0, 60.0, 5.0, day(2))]);
        save_json(storage.as_ref(), DEFAULT_STORAGE_KEY, &seeded).unwrap();

        assert_eq!(controller.restore().unwrap(), 1);
        assert_eq!(controller.rows().len(), 1);
        assert!(controller.markers().is_empty());

        controller.initialize(Ok(HOME)).unwrap();
        assert_eq!(controller.markers().len(), 1);
    }

    #[test]
    fn test_restore_corrupt_value() {
        let (mut controller, storage) = controller();
        storage.set_string(DEFAULT_STORAGE_KEY, "{oops").unwrap();
        assert_eq!(controller.restore().unwrap(), 0);
        assert!(controller.workouts().is_empty());
    }

    #[test]
    fn test_move_to_workout() {
        let (mut controller, _) = ready_controller();
        let target = Coords::new(40.4, -3.7);
        controller.handle_map_click(target).unwrap();
        fill(&mut controller, WorkoutType::Cycling, ["20", "60", "-10"]);
        let id = controller.submit_at(day(3)).unwrap().id().clone();

        let pan = controller.move_to_workout(&id).unwrap();
        assert_eq!(pan.target, target);
        assert_eq!(pan.zoom, DEFAULT_ZOOM);
        assert_eq!(pan.duration, PAN_DURATION);
        assert_eq!(controller.workouts().get(&id).map(Workout::clicks), Some(1));

        assert!(matches!(
            controller.move_to_workout(&WorkoutId::from("nope")),
            Err(ControllerError::UnknownWorkout(_))
        ));
    }

    #[test]
    fn test_custom_storage_key_and_zoom() {
        let storage = Arc::new(MemoryStorage::new());
        let config = ControllerConfig {
            storage_key: "my-workouts".to_string(),
            zoom: 15.0,
            ..Default::default()
        };
        let mut controller = Controller::new(Box::new(storage.clone()), config);
        controller.initialize(Ok(HOME)).unwrap();
        controller.handle_map_click(HOME).unwrap();
        fill(&mut controller, WorkoutType::Running, ["5", "24", "178"]);
        controller.submit_at(day(4)).unwrap();

        assert!(storage.get_string("my-workouts").unwrap().is_some());
        assert_eq!(storage.get_string(DEFAULT_STORAGE_KEY).unwrap(), None);
        assert_eq!(
            controller.map_status(),
            MapStatus::Ready {
                center: HOME,
                zoom: 15.0
            }
        );
    }

    #[test]
    fn test_reset() {
        let (mut controller, storage) = ready_controller();
        controller.handle_map_click(HOME).unwrap();
        fill(&mut controller, WorkoutType::Running, ["5", "24", "178"]);
        controller.submit_at(day(5)).unwrap();

        controller.reset().unwrap();
        assert!(controller.workouts().is_empty());
        assert_eq!(controller.map_status(), MapStatus::Uninitialized);
        assert_eq!(controller.form_state(), FormState::Idle);
        assert_eq!(storage.get_string(DEFAULT_STORAGE_KEY).unwrap(), None);
    }
}
