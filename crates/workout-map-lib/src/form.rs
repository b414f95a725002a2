//! Entry form draft
//!
//! Holds the raw text typed into the workout form. Parsing follows the
//! configured [`ValidationRules`]. A blank field counts as zero; a
//! non-numeric one is "not a number" and rejected.

use crate::validation::{Field, ValidationError, ValidationRules};
use crate::workout::{Coords, Workout, WorkoutType};
use chrono::{DateTime, Local};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkoutDraft {
    pub workout_type: WorkoutType,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

/// Numbers that passed validation, ready to become a [`Workout`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidInput {
    pub workout_type: WorkoutType,
    pub distance: f64,
    pub duration: f64,
    /// Cadence for running, elevation gain for cycling
    pub secondary: f64,
}

impl WorkoutDraft {
    /// Switch the type, which swaps the cadence and elevation rows.
    /// Values already typed in either row are kept.
    pub fn toggle_type(&mut self, workout_type: WorkoutType) {
        self.workout_type = workout_type;
    }

    /// The type-specific field currently shown
    pub fn secondary_field(&self) -> Field {
        match self.workout_type {
            WorkoutType::Running => Field::Cadence,
            WorkoutType::Cycling => Field::ElevationGain,
        }
    }

    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Distance => &self.distance,
            Field::Duration => &self.duration,
            Field::Cadence => &self.cadence,
            Field::ElevationGain => &self.elevation,
        }
    }

    pub fn text_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Distance => &mut self.distance,
            Field::Duration => &mut self.duration,
            Field::Cadence => &mut self.cadence,
            Field::ElevationGain => &mut self.elevation,
        }
    }

    /// Empty every input, keeping the selected type
    pub fn clear(&mut self) {
        self.distance.clear();
        self.duration.clear();
        self.cadence.clear();
        self.elevation.clear();
    }

    /// Parse and validate the fields relevant to the selected type.
    ///
    /// Every field is checked for being a finite number before any sign
    /// check, so "not a number" wins over "not positive".
    pub fn parse(&self, rules: &ValidationRules) -> Result<ValidInput, ValidationError> {
        let fields = [Field::Distance, Field::Duration, self.secondary_field()];
        let values = fields.map(|field| parse_number(self.text(field)));

        for (field, value) in fields.iter().zip(values) {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite { field: *field });
            }
        }
        for (field, value) in fields.iter().zip(values) {
            rules.check(*field, value)?;
        }

        let [distance, duration, secondary] = values;
        Ok(ValidInput {
            workout_type: self.workout_type,
            distance,
            duration,
            secondary,
        })
    }
}

impl ValidInput {
    pub fn into_workout(self, coords: Coords) -> Workout {
        self.into_workout_at(coords, Local::now())
    }

    pub fn into_workout_at(self, coords: Coords, date: DateTime<Local>) -> Workout {
        match self.workout_type {
            WorkoutType::Running => {
                Workout::running_at(coords, self.distance, self.duration, self.secondary, date)
            }
            WorkoutType::Cycling => {
                Workout::cycling_at(coords, self.distance, self.duration, self.secondary, date)
            }
        }
    }
}

/// Blank is zero, anything else unparsable is NaN
fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}
