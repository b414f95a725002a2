//! Workout Map Library - Core types for logging workouts on a map
//!
//! Everything here is independent of the UI toolkit so it can be exercised
//! directly from tests.
//!
//! # Architecture
//!
//! - **[`Workout`]**: Running or cycling record with derived pace/speed
//! - **[`ValidationRules`]**: Per-field rules applied to form input
//! - **[`WorkoutDraft`]**: Raw text of the entry form
//! - **[`WorkoutLog`]**: Insertion-ordered collection, persisted as a whole
//! - **[`StorageBackend`]**: Key-value persistence seam
//! - **[`Controller`]**: Form/map state machine tying the above together
//! - **[`MarkerView`] / [`WorkoutRow`]**: What the UI draws for a workout

mod controller;
mod form;
mod log;
pub mod storage;
mod validation;
mod view;
mod workout;

// Public API exports
pub use controller::{
    Controller, ControllerConfig, ControllerError, ControllerResult, DEFAULT_STORAGE_KEY,
    DEFAULT_ZOOM, FormState, GeolocationError, MapStatus, PAN_DURATION, PanRequest,
};
pub use form::{ValidInput, WorkoutDraft};
pub use log::WorkoutLog;
pub use storage::{MemoryStorage, StorageBackend, StorageError, StorageResult};
pub use validation::{Field, FieldRule, ValidationError, ValidationRules};
pub use view::{MarkerView, PopupOptions, RowDetail, WorkoutRow};
pub use workout::{Coords, IncompleteRecord, Workout, WorkoutId, WorkoutKind, WorkoutType};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        let _: fn(Box<dyn StorageBackend>, ControllerConfig) -> Controller = Controller::new;
        let _: fn() -> ValidationRules = ValidationRules::default;
        let _: fn() -> WorkoutLog = WorkoutLog::new;
    }
}
