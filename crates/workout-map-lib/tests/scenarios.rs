//! End-to-end scenarios through the public controller API

use chrono::{Datelike, Local, TimeZone};
use std::sync::Arc;
use workout_map_lib::{
    Controller, ControllerConfig, ControllerError, Coords, DEFAULT_STORAGE_KEY, Field, FormState,
    MemoryStorage, StorageBackend, ValidationError, WorkoutType,
};

const LONDON: Coords = Coords {
    lat: 51.5,
    lng: -0.12,
};

fn started(storage: Arc<MemoryStorage>) -> Controller {
    let mut controller = Controller::new(Box::new(storage), ControllerConfig::default());
    controller.restore().unwrap();
    controller.initialize(Ok(LONDON)).unwrap();
    controller
}

fn log_workout(
    controller: &mut Controller,
    workout_type: WorkoutType,
    distance: &str,
    duration: &str,
    extra: &str,
) -> Result<(), ControllerError> {
    controller.handle_map_click(LONDON)?;
    controller.toggle_workout_type(workout_type);
    let draft = controller.draft_mut();
    draft.distance = distance.to_string();
    draft.duration = duration.to_string();
    let field = draft.secondary_field();
    *draft.text_mut(field) = extra.to_string();
    controller.submit().map(|_| ())
}

#[test]
fn test_running_scenario() {
    let storage = Arc::new(MemoryStorage::new());
    let mut controller = started(storage.clone());

    log_workout(&mut controller, WorkoutType::Running, "5", "24", "178").unwrap();

    assert_eq!(controller.workouts().len(), 1);
    let run = &controller.workouts().as_slice()[0];
    assert_eq!(run.pace(), Some(4.8));
    assert_eq!(run.coords(), LONDON);
    assert_eq!(controller.rows().len(), 1);
    assert_eq!(controller.markers().len(), 1);
    assert_eq!(controller.form_state(), FormState::Idle);
    assert!(storage.get_string(DEFAULT_STORAGE_KEY).unwrap().is_some());
}

#[test]
fn test_cycling_scenario_allows_negative_elevation() {
    let mut controller = started(Arc::new(MemoryStorage::new()));

    log_workout(&mut controller, WorkoutType::Cycling, "20", "60", "-10").unwrap();

    let ride = &controller.workouts().as_slice()[0];
    assert_eq!(ride.speed(), Some(20.0));
    assert_eq!(ride.elevation_gain(), Some(-10.0));
}

#[test]
fn test_cycling_blank_elevation_counts_as_zero() {
    let mut controller = started(Arc::new(MemoryStorage::new()));

    log_workout(&mut controller, WorkoutType::Cycling, "20", "60", "").unwrap();

    let ride = &controller.workouts().as_slice()[0];
    assert_eq!(ride.elevation_gain(), Some(0.0));
    assert_eq!(ride.speed(), Some(20.0));
}

#[test]
fn test_blank_cadence_scenario() {
    let storage = Arc::new(MemoryStorage::new());
    let mut controller = started(storage.clone());

    let err = log_workout(&mut controller, WorkoutType::Running, "5", "24", "").unwrap_err();

    assert!(matches!(
        err,
        ControllerError::InvalidWorkoutInput(ValidationError::NotPositive {
            field: Field::Cadence
        })
    ));
    assert!(err.alert_message().is_some());
    assert!(controller.workouts().is_empty());
    assert!(controller.is_form_visible());
    assert_eq!(storage.get_string(DEFAULT_STORAGE_KEY).unwrap(), None);
}

#[test]
fn test_invalid_submit_leaves_stored_log_untouched() {
    let storage = Arc::new(MemoryStorage::new());
    let mut controller = started(storage.clone());
    log_workout(&mut controller, WorkoutType::Running, "5", "24", "178").unwrap();
    let before = storage.get_string(DEFAULT_STORAGE_KEY).unwrap();

    for (distance, duration, extra) in [("abc", "24", "178"), ("5", "-1", "178"), ("5", "24", "0")] {
        assert!(
            log_workout(&mut controller, WorkoutType::Running, distance, duration, extra).is_err()
        );
    }

    assert_eq!(controller.workouts().len(), 1);
    assert_eq!(storage.get_string(DEFAULT_STORAGE_KEY).unwrap(), before);
}

#[test]
fn test_restore_rebuilds_equivalent_workouts() {
    let storage = Arc::new(MemoryStorage::new());
    let mut controller = started(storage.clone());
    log_workout(&mut controller, WorkoutType::Running, "5", "24", "178").unwrap();
    log_workout(&mut controller, WorkoutType::Cycling, "27", "95", "523").unwrap();
    let original = controller.workouts().clone();

    let reloaded = started(storage);

    assert_eq!(reloaded.workouts().len(), 2);
    for (before, after) in original.iter().zip(reloaded.workouts()) {
        assert_eq!(after.workout_type(), before.workout_type());
        assert_eq!(after.distance(), before.distance());
        assert_eq!(after.duration(), before.duration());
        assert_eq!(after.pace(), before.pace());
        assert_eq!(after.speed(), before.speed());
        assert_eq!(after.id(), before.id());
        assert_eq!(after.description(), before.description());
    }
    assert_eq!(reloaded.rows(), controller.rows());
}

#[test]
fn test_description_matches_creation_date() {
    let mut controller = started(Arc::new(MemoryStorage::new()));
    controller.handle_map_click(LONDON).unwrap();
    let draft = controller.draft_mut();
    draft.distance = "10".into();
    draft.duration = "50".into();
    draft.cadence = "170".into();

    let date = Local.with_ymd_and_hms(2025, 2, 14, 6, 45, 0).unwrap();
    let run = controller.submit_at(date).unwrap();

    assert_eq!(run.date().day(), 14);
    assert_eq!(run.description(), "Running on February 14");
}
