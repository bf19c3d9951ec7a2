use crate::calendar::{day_name, day_short, is_valid_ordinal};
use crate::errors::ValidationError;
use crate::models::{Exercise, ExerciseInput, Plan, WorkoutDay};
use crate::storage::{LocalStorage, PLAN_KEY};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const DEFAULT_SETS: u32 = 3;
const DEFAULT_REPS: &str = "12";
const DEFAULT_ICON: &str = "💪";
const DEFAULT_COLOR: &str = "bg-sky-500";

/// Owns the current plan snapshot. Every edit swaps in a fresh `Arc<Plan>`
/// and writes the whole plan through to storage.
#[derive(Debug, Clone)]
pub struct PlanStore {
    plan: Arc<Plan>,
}

impl PlanStore {
    /// Reads the persisted plan, falling back to the default plan when the
    /// key is absent or unreadable.
    pub fn load(storage: &LocalStorage) -> Self {
        let mut plan = match storage.get_json::<Plan>(PLAN_KEY) {
            Some(plan) => plan,
            None => {
                if storage.get_item(PLAN_KEY).is_some() {
                    warn!("persisted plan is unreadable, using the default plan");
                }
                default_plan()
            }
        };
        sort_days(&mut plan);
        Self {
            plan: Arc::new(plan),
        }
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn snapshot(&self) -> Arc<Plan> {
        Arc::clone(&self.plan)
    }

    pub fn add_day(
        &mut self,
        storage: &mut LocalStorage,
        day_index: i64,
        title: &str,
        color: &str,
    ) -> Result<WorkoutDay, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let day_index = u8::try_from(day_index)
            .ok()
            .filter(|ordinal| is_valid_ordinal(*ordinal))
            .ok_or(ValidationError::InvalidDayOfWeek(day_index))?;

        let color = color.trim();
        let day = WorkoutDay {
            id: new_id(),
            day_index,
            day_name: day_name(day_index).to_string(),
            day_short: day_short(day_index).to_string(),
            title: title.to_string(),
            color: if color.is_empty() { DEFAULT_COLOR } else { color }.to_string(),
            exercises: Vec::new(),
        };

        let mut next = (*self.plan).clone();
        next.days.push(day.clone());
        sort_days(&mut next);
        self.commit(storage, next);
        info!(day_id = %day.id, day_index, "added workout day");
        Ok(day)
    }

    /// Returns whether a day was removed.
    pub fn remove_day(&mut self, storage: &mut LocalStorage, day_id: &str) -> bool {
        if self.plan.day(day_id).is_none() {
            return false;
        }
        let mut next = (*self.plan).clone();
        next.days.retain(|day| day.id != day_id);
        self.commit(storage, next);
        info!(day_id, "removed workout day");
        true
    }

    pub fn add_exercise(
        &mut self,
        storage: &mut LocalStorage,
        day_id: &str,
        input: &ExerciseInput,
    ) -> Result<Exercise, ValidationError> {
        let fields = ExerciseFields::parse(input)?;
        let mut next = (*self.plan).clone();
        let day = next
            .days
            .iter_mut()
            .find(|day| day.id == day_id)
            .ok_or_else(|| ValidationError::UnknownDay(day_id.to_string()))?;

        let exercise = fields.into_exercise(new_id());
        day.exercises.push(exercise.clone());
        self.commit(storage, next);
        info!(day_id, exercise_id = %exercise.id, "added exercise");
        Ok(exercise)
    }

    /// Overwrites everything but the id. Unknown ids leave the plan untouched
    /// and return `Ok(false)`.
    pub fn edit_exercise(
        &mut self,
        storage: &mut LocalStorage,
        day_id: &str,
        exercise_id: &str,
        input: &ExerciseInput,
    ) -> Result<bool, ValidationError> {
        let fields = ExerciseFields::parse(input)?;
        let mut next = (*self.plan).clone();
        let Some(exercise) = next
            .days
            .iter_mut()
            .find(|day| day.id == day_id)
            .and_then(|day| day.exercises.iter_mut().find(|ex| ex.id == exercise_id))
        else {
            return Ok(false);
        };

        *exercise = fields.into_exercise(exercise_id.to_string());
        self.commit(storage, next);
        info!(day_id, exercise_id, "edited exercise");
        Ok(true)
    }

    /// Returns whether an exercise was removed.
    pub fn remove_exercise(
        &mut self,
        storage: &mut LocalStorage,
        day_id: &str,
        exercise_id: &str,
    ) -> bool {
        let holds_exercise = self
            .plan
            .day(day_id)
            .is_some_and(|day| day.exercises.iter().any(|ex| ex.id == exercise_id));
        if !holds_exercise {
            return false;
        }

        let mut next = (*self.plan).clone();
        if let Some(day) = next.days.iter_mut().find(|day| day.id == day_id) {
            day.exercises.retain(|ex| ex.id != exercise_id);
        }
        self.commit(storage, next);
        info!(day_id, exercise_id, "removed exercise");
        true
    }

    pub fn restore_default(&mut self, storage: &mut LocalStorage) {
        self.commit(storage, default_plan());
        info!("restored default plan");
    }

    fn commit(&mut self, storage: &mut LocalStorage, plan: Plan) {
        storage.set_json(PLAN_KEY, &plan);
        self.plan = Arc::new(plan);
    }
}

struct ExerciseFields {
    name: String,
    sets: u32,
    reps: String,
    icon: String,
}

impl ExerciseFields {
    fn parse(input: &ExerciseInput) -> Result<Self, ValidationError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let reps = input.reps.trim();
        let icon = input.icon.trim();
        Ok(Self {
            name: name.to_string(),
            sets: parse_sets(&input.sets),
            reps: if reps.is_empty() { DEFAULT_REPS } else { reps }.to_string(),
            icon: if icon.is_empty() { DEFAULT_ICON } else { icon }.to_string(),
        })
    }

    fn into_exercise(self, id: String) -> Exercise {
        Exercise {
            id,
            name: self.name,
            sets: self.sets,
            reps: self.reps,
            icon: self.icon,
        }
    }
}

fn parse_sets(raw: &str) -> u32 {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|sets| *sets > 0)
        .unwrap_or(DEFAULT_SETS)
}

// Stable, so days sharing an ordinal keep insertion order.
fn sort_days(plan: &mut Plan) {
    plan.days.sort_by_key(|day| day.day_index);
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn default_plan() -> Plan {
    Plan {
        days: vec![
            preset_day(
                "mon",
                1,
                "Upper body",
                "bg-emerald-500",
                &[
                    ("Push-ups", 3, "12", "💪"),
                    ("Plank", 3, "30 sec", "🧘"),
                    ("Dumbbell biceps curl", 3, "10", "🏋️"),
                    ("Standing dumbbell press", 3, "10", "💥"),
                ],
            ),
            preset_day(
                "wed",
                3,
                "Cardio + Core",
                "bg-orange-500",
                &[
                    ("Burpees", 3, "8", "🔥"),
                    ("Crunches", 3, "15", "🎯"),
                    ("Jumping jacks", 3, "30 sec", "⚡"),
                    ("Bicycle crunches", 3, "20", "🚴"),
                ],
            ),
            preset_day(
                "fri",
                5,
                "Lower body",
                "bg-violet-500",
                &[
                    ("Squats", 4, "15", "🦵"),
                    ("Lunges", 3, "12 per leg", "🏃"),
                    ("Glute bridge", 3, "15", "🍑"),
                    ("Calf raises", 3, "20", "🦶"),
                ],
            ),
        ],
    }
}

fn preset_day(
    id: &str,
    day_index: u8,
    title: &str,
    color: &str,
    exercises: &[(&str, u32, &str, &str)],
) -> WorkoutDay {
    WorkoutDay {
        id: id.to_string(),
        day_index,
        day_name: day_name(day_index).to_string(),
        day_short: day_short(day_index).to_string(),
        title: title.to_string(),
        color: color.to_string(),
        exercises: exercises
            .iter()
            .enumerate()
            .map(|(n, (name, sets, reps, icon))| Exercise {
                id: format!("{id}-{}", n + 1),
                name: name.to_string(),
                sets: *sets,
                reps: reps.to_string(),
                icon: icon.to_string(),
            })
            .collect(),
    }
}
