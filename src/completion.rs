use crate::models::{CompletionMap, Plan};
use crate::storage::{LocalStorage, week_storage_key};
use crate::view::day_is_fully_done;
use std::collections::BTreeMap;
use tracing::info;

/// Emitted when a toggle finishes every exercise of a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCompleted {
    pub day_id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub exercise_id: String,
    pub done: bool,
    pub day_completed: Option<DayCompleted>,
}

/// Done flags for the current week, written through under the week's key.
#[derive(Debug, Clone)]
pub struct CompletionStore {
    week_key: String,
    completed: CompletionMap,
    // Day id to the exercise ids it held when last seen finished this week.
    // Memory only: after a restart a finished day can be announced again.
    announced: BTreeMap<String, Vec<String>>,
}

impl CompletionStore {
    pub fn load(storage: &LocalStorage, week_key: &str) -> Self {
        Self {
            week_key: week_key.to_string(),
            completed: storage
                .get_json(&week_storage_key(week_key))
                .unwrap_or_default(),
            announced: BTreeMap::new(),
        }
    }

    pub fn week_key(&self) -> &str {
        &self.week_key
    }

    pub fn completed(&self) -> &CompletionMap {
        &self.completed
    }

    /// Switches to another week's map. Returns `false` when already there.
    pub fn roll_to(&mut self, storage: &LocalStorage, week_key: &str) -> bool {
        if self.week_key == week_key {
            return false;
        }
        info!(from = %self.week_key, to = week_key, "starting a new week");
        *self = Self::load(storage, week_key);
        true
    }

    pub fn toggle(
        &mut self,
        storage: &mut LocalStorage,
        plan: &Plan,
        exercise_id: &str,
    ) -> ToggleOutcome {
        let day = plan.day_of_exercise(exercise_id);
        let was_day_done = day.is_some_and(|day| day_is_fully_done(day, &self.completed));

        let done = !self.completed.is_done(exercise_id);
        self.completed.set(exercise_id, done);
        self.persist(storage);

        let mut day_completed = None;
        if let Some(day) = day {
            let exercise_ids: Vec<String> = day.exercises.iter().map(|ex| ex.id.clone()).collect();
            if was_day_done {
                self.announced.insert(day.id.clone(), exercise_ids);
            } else if day_is_fully_done(day, &self.completed)
                && self.announced.get(&day.id) != Some(&exercise_ids)
            {
                self.announced.insert(day.id.clone(), exercise_ids);
                info!(day_id = %day.id, title = %day.title, "workout day completed");
                day_completed = Some(DayCompleted {
                    day_id: day.id.clone(),
                    title: day.title.clone(),
                });
            }
        }

        ToggleOutcome {
            exercise_id: exercise_id.to_string(),
            done,
            day_completed,
        }
    }

    pub fn reset(&mut self, storage: &mut LocalStorage) {
        self.completed = CompletionMap::default();
        self.announced.clear();
        self.persist(storage);
        info!(week = %self.week_key, "week reset");
    }

    fn persist(&self, storage: &mut LocalStorage) {
        storage.set_json(&week_storage_key(&self.week_key), &self.completed);
    }
}
