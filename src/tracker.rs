use crate::calendar::week_key;
use crate::completion::{CompletionStore, ToggleOutcome};
use crate::errors::ValidationError;
use crate::models::{DashboardResponse, Exercise, ExerciseInput, Plan, WorkoutDay};
use crate::plan::PlanStore;
use crate::storage::LocalStorage;
use crate::view::build_dashboard_at;
use chrono::NaiveDateTime;
use std::sync::Arc;

/// Single owner of the storage map and both stores. Every intent is routed
/// through here; views are rebuilt from the current snapshots on each call.
#[derive(Debug)]
pub struct Tracker {
    storage: LocalStorage,
    plan: PlanStore,
    completion: CompletionStore,
}

impl Tracker {
    pub fn open(storage: LocalStorage, now: NaiveDateTime) -> Self {
        let plan = PlanStore::load(&storage);
        let completion = CompletionStore::load(&storage, &week_key(now));
        Self {
            storage,
            plan,
            completion,
        }
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    pub fn plan(&self) -> Arc<Plan> {
        self.plan.snapshot()
    }

    pub fn dashboard(&mut self, now: NaiveDateTime) -> DashboardResponse {
        self.roll_week(now);
        build_dashboard_at(now, self.plan.plan(), self.completion.completed())
    }

    pub fn toggle(&mut self, exercise_id: &str, now: NaiveDateTime) -> ToggleOutcome {
        self.roll_week(now);
        self.completion
            .toggle(&mut self.storage, self.plan.plan(), exercise_id)
    }

    pub fn reset_week(&mut self, now: NaiveDateTime) {
        self.roll_week(now);
        self.completion.reset(&mut self.storage);
    }

    pub fn add_day(
        &mut self,
        day_index: i64,
        title: &str,
        color: &str,
    ) -> Result<WorkoutDay, ValidationError> {
        self.plan.add_day(&mut self.storage, day_index, title, color)
    }

    pub fn remove_day(&mut self, day_id: &str) -> bool {
        self.plan.remove_day(&mut self.storage, day_id)
    }

    pub fn add_exercise(
        &mut self,
        day_id: &str,
        input: &ExerciseInput,
    ) -> Result<Exercise, ValidationError> {
        self.plan.add_exercise(&mut self.storage, day_id, input)
    }

    pub fn edit_exercise(
        &mut self,
        day_id: &str,
        exercise_id: &str,
        input: &ExerciseInput,
    ) -> Result<bool, ValidationError> {
        self.plan
            .edit_exercise(&mut self.storage, day_id, exercise_id, input)
    }

    pub fn remove_exercise(&mut self, day_id: &str, exercise_id: &str) -> bool {
        self.plan
            .remove_exercise(&mut self.storage, day_id, exercise_id)
    }

    pub fn restore_default_plan(&mut self) {
        self.plan.restore_default(&mut self.storage);
    }

    fn roll_week(&mut self, now: NaiveDateTime) {
        self.completion.roll_to(&self.storage, &week_key(now));
    }
}
