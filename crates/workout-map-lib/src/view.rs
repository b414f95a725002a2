//! Presentation data derived from workouts
//!
//! These are plain values; the application paints them with egui/walkers.

use crate::workout::{Coords, Workout, WorkoutId, WorkoutKind, WorkoutType};

/// Popup configuration of a workout marker
#[derive(Clone, Debug, PartialEq)]
pub struct PopupOptions {
    pub max_width: f32,
    pub min_width: f32,
    /// Close when another popup opens
    pub auto_close: bool,
    /// Close when the map is clicked
    pub close_on_click: bool,
    /// Style class, `"<type>-popup"`
    pub class_name: String,
}

impl PopupOptions {
    pub fn for_type(workout_type: WorkoutType) -> Self {
        Self {
            max_width: 250.0,
            min_width: 100.0,
            auto_close: false,
            close_on_click: false,
            class_name: format!("{}-popup", workout_type.name()),
        }
    }
}

/// A map marker with its popup
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerView {
    pub id: WorkoutId,
    pub coords: Coords,
    pub workout_type: WorkoutType,
    /// "<icon> <description>"
    pub content: String,
    pub popup: PopupOptions,
}

impl From<&Workout> for MarkerView {
    fn from(workout: &Workout) -> Self {
        Self {
            id: workout.id().clone(),
            coords: workout.coords(),
            workout_type: workout.workout_type(),
            content: format!("{} {}", workout.icon(), workout.description()),
            popup: PopupOptions::for_type(workout.workout_type()),
        }
    }
}

/// One "icon value unit" item of a list row
#[derive(Clone, Debug, PartialEq)]
pub struct RowDetail {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

impl RowDetail {
    fn new(icon: &'static str, value: String, unit: &'static str) -> Self {
        Self { icon, value, unit }
    }
}

/// Summary of a workout in the sidebar list
#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutRow {
    pub id: WorkoutId,
    pub workout_type: WorkoutType,
    pub title: String,
    pub details: Vec<RowDetail>,
}

impl From<&Workout> for WorkoutRow {
    fn from(workout: &Workout) -> Self {
        let mut details = vec![
            RowDetail::new(workout.icon(), workout.distance().to_string(), "km"),
            RowDetail::new("⏱", workout.duration().to_string(), "min"),
        ];
        match workout.kind() {
            WorkoutKind::Running { cadence, pace } => {
                details.push(RowDetail::new("⚡️", metric(*pace), "min/km"));
                details.push(RowDetail::new("🦶🏼", cadence.to_string(), "spm"));
            }
            WorkoutKind::Cycling {
                elevation_gain,
                speed,
            } => {
                details.push(RowDetail::new("⚡️", metric(*speed), "km/h"));
                details.push(RowDetail::new("⛰", elevation_gain.to_string(), "m"));
            }
        }

        Self {
            id: workout.id().clone(),
            workout_type: workout.workout_type(),
            title: workout.description().to_string(),
            details,
        }
    }
}

/// One decimal, or a dash when the value is not a finite number
fn metric(value: f64) -> String {
    if value.is_finite() {
        format!("{:.1}", value)
    } else {
        "–".to_string()
    }
}
