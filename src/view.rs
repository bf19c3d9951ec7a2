use crate::calendar::{day_ordinal, week_key};
use crate::models::{
    CompletionMap, DashboardResponse, DayView, ExerciseView, Plan, ReminderKind, ReminderView,
    WorkoutDay,
};
use chrono::{NaiveDateTime, Timelike};

/// Local hour from which today's unfinished workout is no longer suggested.
const REMINDER_CUTOFF_HOUR: u32 = 21;

pub fn total_exercise_count(plan: &Plan) -> usize {
    plan.days.iter().map(|day| day.exercises.len()).sum()
}

pub fn completed_count(plan: &Plan, completed: &CompletionMap) -> usize {
    plan.days
        .iter()
        .map(|day| day_completed_count(day, completed))
        .sum()
}

pub fn week_progress_percent(plan: &Plan, completed: &CompletionMap) -> u8 {
    percent(completed_count(plan, completed), total_exercise_count(plan))
}

pub fn day_progress_percent(day: &WorkoutDay, completed: &CompletionMap) -> u8 {
    percent(day_completed_count(day, completed), day.exercises.len())
}

/// A day without exercises is never done.
pub fn day_is_fully_done(day: &WorkoutDay, completed: &CompletionMap) -> bool {
    !day.exercises.is_empty() && day.exercises.iter().all(|ex| completed.is_done(&ex.id))
}

fn day_completed_count(day: &WorkoutDay, completed: &CompletionMap) -> usize {
    day.exercises
        .iter()
        .filter(|ex| completed.is_done(&ex.id))
        .count()
}

// Rounds half up; 0 when there is nothing to count.
fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    ((200 * part + whole) / (2 * whole)).min(100) as u8
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reminder {
    Today { title: String },
    Tomorrow { title: String },
}

impl Reminder {
    pub fn message(&self) -> String {
        match self {
            Reminder::Today { title } => format!("Today's workout: {title}"),
            Reminder::Tomorrow { title } => format!("Tomorrow: {title}"),
        }
    }

    pub fn to_view(&self) -> ReminderView {
        let (kind, title) = match self {
            Reminder::Today { title } => (ReminderKind::Today, title),
            Reminder::Tomorrow { title } => (ReminderKind::Tomorrow, title),
        };
        ReminderView {
            kind,
            title: title.clone(),
            message: self.message(),
        }
    }
}

/// Only the first day (in plan order) matching today, then tomorrow, is
/// considered. Tomorrow is not wrapped, so Sunday never gets a reminder for
/// Monday.
pub fn next_workout_reminder(
    plan: &Plan,
    completed: &CompletionMap,
    now: NaiveDateTime,
) -> Option<Reminder> {
    let today = day_ordinal(now);

    if let Some(day) = plan.days.iter().find(|day| day.day_index == today) {
        if !day.exercises.is_empty()
            && !day_is_fully_done(day, completed)
            && now.hour() < REMINDER_CUTOFF_HOUR
        {
            return Some(Reminder::Today {
                title: day.title.clone(),
            });
        }
    }

    let tomorrow = today + 1;
    plan.days
        .iter()
        .find(|day| day.day_index == tomorrow)
        .filter(|day| !day.exercises.is_empty())
        .map(|day| Reminder::Tomorrow {
            title: day.title.clone(),
        })
}

pub fn build_dashboard_at(
    now: NaiveDateTime,
    plan: &Plan,
    completed: &CompletionMap,
) -> DashboardResponse {
    let today = day_ordinal(now);

    let days = plan
        .days
        .iter()
        .map(|day| DayView {
            id: day.id.clone(),
            day_index: day.day_index,
            day_name: day.day_name.clone(),
            day_short: day.day_short.clone(),
            title: day.title.clone(),
            color: day.color.clone(),
            is_today: day.day_index == today,
            done: day_is_fully_done(day, completed),
            completed_count: day_completed_count(day, completed),
            exercise_count: day.exercises.len(),
            progress: day_progress_percent(day, completed),
            exercises: day
                .exercises
                .iter()
                .map(|ex| ExerciseView {
                    id: ex.id.clone(),
                    name: ex.name.clone(),
                    sets: ex.sets,
                    reps: ex.reps.clone(),
                    icon: ex.icon.clone(),
                    done: completed.is_done(&ex.id),
                })
                .collect(),
        })
        .collect();

    DashboardResponse {
        week_key: week_key(now),
        today,
        total_exercises: total_exercise_count(plan),
        completed_count: completed_count(plan, completed),
        week_progress: week_progress_percent(plan, completed),
        reminder: next_workout_reminder(plan, completed, now).map(|reminder| reminder.to_view()),
        days,
    }
}
