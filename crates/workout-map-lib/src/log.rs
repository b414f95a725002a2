//! Insertion-ordered workout collection

use crate::workout::{Workout, WorkoutId};
use serde::{Deserialize, Serialize};

/// All workouts of the session, oldest first
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutLog {
    workouts: Vec<Workout>,
}

impl WorkoutLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, workout: Workout) -> &Workout {
        self.workouts.push(workout);
        &self.workouts[self.workouts.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Workout> {
        self.workouts.iter()
    }

    pub fn as_slice(&self) -> &[Workout] {
        &self.workouts
    }

    /// First workout with the given id
    pub fn get(&self, id: &WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub fn get_mut(&mut self, id: &WorkoutId) -> Option<&mut Workout> {
        self.workouts.iter_mut().find(|w| w.id() == id)
    }

    pub fn clear(&mut self) {
        self.workouts.clear();
    }
}

impl<'a> IntoIterator for &'a WorkoutLog {
    type Item = &'a Workout;
    type IntoIter = std::slice::Iter<'a, Workout>;

    fn into_iter(self) -> Self::IntoIter {
        self.workouts.iter()
    }
}

impl FromIterator<Workout> for WorkoutLog {
    fn from_iter<I: IntoIterator<Item = Workout>>(iter: I) -> Self {
        Self {
            workouts: iter.into_iter().collect(),
        }
    }
}
