use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub sets: u32,
    pub reps: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDay {
    pub id: String,
    pub day_index: u8,
    pub day_name: String,
    pub day_short: String,
    pub title: String,
    pub color: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

/// Workout days ordered by day-of-week ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Plan {
    pub days: Vec<WorkoutDay>,
}

impl Plan {
    pub fn day(&self, day_id: &str) -> Option<&WorkoutDay> {
        self.days.iter().find(|day| day.id == day_id)
    }

    /// First day in plan order that holds the exercise.
    pub fn day_of_exercise(&self, exercise_id: &str) -> Option<&WorkoutDay> {
        self.days
            .iter()
            .find(|day| day.exercises.iter().any(|exercise| exercise.id == exercise_id))
    }
}

/// Exercise id to done flag for one week. Missing ids count as not done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct CompletionMap {
    pub entries: BTreeMap<String, bool>,
}

impl CompletionMap {
    pub fn is_done(&self, exercise_id: &str) -> bool {
        self.entries.get(exercise_id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, exercise_id: &str, done: bool) {
        self.entries.insert(exercise_id.to_string(), done);
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDayRequest {
    pub day_index: i64,
    pub title: String,
    #[serde(default)]
    pub color: String,
}

/// Exercise fields as typed into the edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExerciseInput {
    pub name: String,
    #[serde(default, deserialize_with = "sets_as_text")]
    pub sets: String,
    #[serde(default)]
    pub reps: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SetsField {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

fn sets_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<SetsField>::deserialize(deserializer)? {
        Some(SetsField::Number(value)) => value.to_string(),
        Some(SetsField::Text(value)) => value,
        // Floats and out-of-range numbers fall through to the default count.
        Some(SetsField::Other(_)) | None => String::new(),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub exercise_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    Today,
    Tomorrow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderView {
    pub kind: ReminderKind,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseView {
    pub id: String,
    pub name: String,
    pub sets: u32,
    pub reps: String,
    pub icon: String,
    pub done: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub id: String,
    pub day_index: u8,
    pub day_name: String,
    pub day_short: String,
    pub title: String,
    pub color: String,
    pub is_today: bool,
    pub done: bool,
    pub completed_count: usize,
    pub exercise_count: usize,
    pub progress: u8,
    pub exercises: Vec<ExerciseView>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub week_key: String,
    pub today: u8,
    pub total_exercises: usize,
    pub completed_count: usize,
    pub week_progress: u8,
    pub reminder: Option<ReminderView>,
    pub days: Vec<DayView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub exercise_id: String,
    pub done: bool,
    pub notification: Option<Notification>,
    pub dashboard: DashboardResponse,
}
