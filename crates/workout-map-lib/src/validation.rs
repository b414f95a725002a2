//! Per-field validation rules for workout input

use std::fmt;

/// Numeric inputs of the workout form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Distance,
    Duration,
    Cadence,
    ElevationGain,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Distance => "Distance",
            Self::Duration => "Duration",
            Self::Cadence => "Cadence",
            Self::ElevationGain => "Elevation gain",
        }
    }

    /// Placeholder hint with the expected unit
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Distance => "km",
            Self::Duration => "min",
            Self::Cadence => "step/min",
            Self::ElevationGain => "meters",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a single field must satisfy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldRule {
    /// Finite and strictly greater than zero
    #[default]
    Positive,
    /// Any finite number
    Finite,
}

impl FieldRule {
    pub fn check(self, field: Field, value: f64) -> Result<f64, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field });
        }
        if self == Self::Positive && value <= 0.0 {
            return Err(ValidationError::NotPositive { field });
        }
        Ok(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a number")]
    NotFinite { field: Field },

    #[error("{field} must be a positive number")]
    NotPositive { field: Field },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            Self::NotFinite { field } | Self::NotPositive { field } => *field,
        }
    }
}

/// Validation rule for every form field.
///
/// The default requires distance, duration and cadence to be positive while
/// elevation gain may be any finite number (downhill rides are allowed).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationRules {
    pub distance: FieldRule,
    pub duration: FieldRule,
    pub cadence: FieldRule,
    pub elevation_gain: FieldRule,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            distance: FieldRule::Positive,
            duration: FieldRule::Positive,
            cadence: FieldRule::Positive,
            elevation_gain: FieldRule::Finite,
        }
    }
}

impl ValidationRules {
    pub fn with_positive_elevation(mut self, required: bool) -> Self {
        self.elevation_gain = if required {
            FieldRule::Positive
        } else {
            FieldRule::Finite
        };
        self
    }

    pub fn rule(&self, field: Field) -> FieldRule {
        match field {
            Field::Distance => self.distance,
            Field::Duration => self.duration,
            Field::Cadence => self.cadence,
            Field::ElevationGain => self.elevation_gain,
        }
    }

    pub fn check(&self, field: Field, value: f64) -> Result<f64, ValidationError> {
        self.rule(field).check(field, value)
    }
}
