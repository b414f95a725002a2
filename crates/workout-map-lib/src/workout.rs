//! Workout records
//!
//! A workout is built once from validated form input and is read-only
//! afterwards, apart from its selection counter. Derived metrics (pace or
//! speed) and the human readable description are computed in the variant
//! constructors, which are also used when records are restored from storage.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 position in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(coords: Coords) -> Self {
        [coords.lat, coords.lng]
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lng)
    }
}

/// Identifier derived from the creation timestamp
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    /// Last 10 digits of the timestamp in milliseconds.
    pub fn from_timestamp(date: &DateTime<Local>) -> Self {
        let millis = date.timestamp_millis().to_string();
        let start = millis.len().saturating_sub(10);
        Self(millis[start..].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorkoutId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two supported workout types
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    #[default]
    Running,
    Cycling,
}

impl WorkoutType {
    pub fn all() -> &'static [Self] {
        &[Self::Running, Self::Cycling]
    }

    /// Lowercase name, also used as the stored type tag
    pub fn name(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Running => "🏃‍♂️",
            Self::Cycling => "🚴‍♀️",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Variant-specific data together with its derived metric
#[derive(Clone, Debug, PartialEq)]
pub enum WorkoutKind {
    /// `pace` in min/km
    Running { cadence: f64, pace: f64 },
    /// `speed` in km/h
    Cycling { elevation_gain: f64, speed: f64 },
}

impl WorkoutKind {
    pub fn workout_type(&self) -> WorkoutType {
        match self {
            Self::Running { .. } => WorkoutType::Running,
            Self::Cycling { .. } => WorkoutType::Cycling,
        }
    }
}

/// A single logged workout
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "StoredWorkout", try_from = "StoredWorkout")]
pub struct Workout {
    id: WorkoutId,
    date: DateTime<Local>,
    coords: Coords,
    /// Kilometers
    distance: f64,
    /// Minutes
    duration: f64,
    description: String,
    clicks: u32,
    kind: WorkoutKind,
}

impl Workout {
    /// Create a running workout timestamped now
    pub fn running(coords: Coords, distance: f64, duration: f64, cadence: f64) -> Self {
        Self::running_at(coords, distance, duration, cadence, Local::now())
    }

    /// Create a cycling workout timestamped now
    pub fn cycling(coords: Coords, distance: f64, duration: f64, elevation_gain: f64) -> Self {
        Self::cycling_at(coords, distance, duration, elevation_gain, Local::now())
    }

    pub fn running_at(
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
        date: DateTime<Local>,
    ) -> Self {
        let pace = duration / distance;
        Self::build(
            date,
            coords,
            distance,
            duration,
            WorkoutKind::Running { cadence, pace },
        )
    }

    pub fn cycling_at(
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
        date: DateTime<Local>,
    ) -> Self {
        let speed = distance / (duration / 60.0);
        Self::build(
            date,
            coords,
            distance,
            duration,
            WorkoutKind::Cycling {
                elevation_gain,
                speed,
            },
        )
    }

    fn build(
        date: DateTime<Local>,
        coords: Coords,
        distance: f64,
        duration: f64,
        kind: WorkoutKind,
    ) -> Self {
        Self {
            id: WorkoutId::from_timestamp(&date),
            description: describe(kind.workout_type(), &date),
            date,
            coords,
            distance,
            duration,
            clicks: 0,
            kind,
        }
    }

    #[inline]
    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    #[inline]
    pub fn date(&self) -> &DateTime<Local> {
        &self.date
    }

    #[inline]
    pub fn coords(&self) -> Coords {
        self.coords
    }

    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    #[inline]
    pub fn kind(&self) -> &WorkoutKind {
        &self.kind
    }

    pub fn workout_type(&self) -> WorkoutType {
        self.kind.workout_type()
    }

    pub fn icon(&self) -> &'static str {
        self.workout_type().icon()
    }

    /// Minutes per kilometer, running only
    pub fn pace(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Running { pace, .. } => Some(pace),
            WorkoutKind::Cycling { .. } => None,
        }
    }

    /// Kilometers per hour, cycling only
    pub fn speed(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Cycling { speed, .. } => Some(speed),
            WorkoutKind::Running { .. } => None,
        }
    }

    pub fn cadence(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Running { cadence, .. } => Some(cadence),
            WorkoutKind::Cycling { .. } => None,
        }
    }

    pub fn elevation_gain(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Cycling { elevation_gain, .. } => Some(elevation_gain),
            WorkoutKind::Running { .. } => None,
        }
    }

    /// Count one selection of this workout
    pub fn click(&mut self) {
        self.clicks = self.clicks.saturating_add(1);
    }
}

/// "<Type> on <Month> <day>", e.g. "Running on April 3"
fn describe(workout_type: WorkoutType, date: &DateTime<Local>) -> String {
    format!("{} on {}", workout_type.label(), date.format("%B %-d"))
}

#[derive(Debug, thiserror::Error)]
#[error("stored {workout_type} workout is missing `{field}`")]
pub struct IncompleteRecord {
    workout_type: WorkoutType,
    field: &'static str,
}

/// On-disk shape of a workout: an explicit type tag plus the minimal field
/// set. Derived values are written for readers of the raw data but are
/// recomputed on load.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredWorkout {
    #[serde(rename = "type")]
    workout_type: WorkoutType,
    id: WorkoutId,
    date: DateTime<Local>,
    coords: Coords,
    distance: f64,
    duration: f64,
    #[serde(default)]
    clicks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cadence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pace: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    elevation_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speed: Option<f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    description: String,
}

impl From<Workout> for StoredWorkout {
    fn from(workout: Workout) -> Self {
        let (cadence, pace, elevation_gain, speed) = match workout.kind {
            WorkoutKind::Running { cadence, pace } => (Some(cadence), Some(pace), None, None),
            WorkoutKind::Cycling {
                elevation_gain,
                speed,
            } => (None, None, Some(elevation_gain), Some(speed)),
        };
        Self {
            workout_type: workout.kind.workout_type(),
            id: workout.id,
            date: workout.date,
            coords: workout.coords,
            distance: workout.distance,
            duration: workout.duration,
            clicks: workout.clicks,
            cadence,
            pace,
            elevation_gain,
            speed,
            description: workout.description,
        }
    }
}

impl TryFrom<StoredWorkout> for Workout {
    type Error = IncompleteRecord;

    fn try_from(stored: StoredWorkout) -> Result<Self, Self::Error> {
        let missing = |field| IncompleteRecord {
            workout_type: stored.workout_type,
            field,
        };
        let mut workout = match stored.workout_type {
            WorkoutType::Running => Workout::running_at(
                stored.coords,
                stored.distance,
                stored.duration,
                stored.cadence.ok_or_else(|| missing("cadence"))?,
                stored.date,
            ),
            WorkoutType::Cycling => Workout::cycling_at(
                stored.coords,
                stored.distance,
                stored.duration,
                stored
                    .elevation_gain
                    .ok_or_else(|| missing("elevationGain"))?,
                stored.date,
            ),
        };
        workout.id = stored.id;
        workout.clicks = stored.clicks;
        Ok(workout)
    }
}
