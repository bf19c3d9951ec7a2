use crate::errors::{AppError, ValidationError};
use crate::models::{
    DashboardResponse, Exercise, ExerciseInput, NewDayRequest, Notification, Plan, ToggleRequest,
    ToggleResponse, WorkoutDay,
};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Redirect},
    Json,
};
use chrono::{Local, NaiveDateTime};
use tracing::{error, warn};

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let dashboard = state.tracker.lock().await.dashboard(now());
    let page = render_index(&dashboard).map_err(|err| {
        error!(error = %err, "failed to render dashboard page");
        AppError::internal(err)
    })?;
    Ok(Html(page))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    let mut tracker = state.tracker.lock().await;
    Ok(Json(tracker.dashboard(now())))
}

pub async fn get_plan(State(state): State<AppState>) -> Json<Plan> {
    let tracker = state.tracker.lock().await;
    Json(Plan::clone(&tracker.plan()))
}

pub async fn toggle(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, AppError> {
    let exercise_id = payload.exercise_id.trim();
    if exercise_id.is_empty() {
        return Err(AppError::bad_request("exerciseId must not be empty"));
    }

    let response = apply_toggle(&state, exercise_id).await?;
    Ok(Json(response))
}

pub async fn toggle_form(
    State(state): State<AppState>,
    Path(exercise_id): Path<String>,
) -> Result<Redirect, AppError> {
    apply_toggle(&state, &exercise_id).await?;
    Ok(Redirect::to("/"))
}

async fn apply_toggle(state: &AppState, exercise_id: &str) -> Result<ToggleResponse, AppError> {
    let now = now();
    let mut tracker = state.tracker.lock().await;
    let outcome = tracker.toggle(exercise_id, now);

    persist_data(&state.data_path, tracker.storage()).await?;

    Ok(ToggleResponse {
        exercise_id: outcome.exercise_id,
        done: outcome.done,
        notification: outcome.day_completed.map(|day| Notification {
            title: "🎉 Workout complete!".to_string(),
            description: format!("{}: great job!", day.title),
        }),
        dashboard: tracker.dashboard(now),
    })
}

pub async fn reset_week(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    let now = now();
    let mut tracker = state.tracker.lock().await;
    tracker.reset_week(now);

    persist_data(&state.data_path, tracker.storage()).await?;

    Ok(Json(tracker.dashboard(now)))
}

pub async fn add_day(
    State(state): State<AppState>,
    Json(payload): Json<NewDayRequest>,
) -> Result<(StatusCode, Json<WorkoutDay>), AppError> {
    let mut tracker = state.tracker.lock().await;
    let day = tracker
        .add_day(payload.day_index, &payload.title, &payload.color)
        .map_err(rejected)?;

    persist_data(&state.data_path, tracker.storage()).await?;

    Ok((StatusCode::CREATED, Json(day)))
}

pub async fn remove_day(
    State(state): State<AppState>,
    Path(day_id): Path<String>,
) -> Result<Json<Plan>, AppError> {
    let mut tracker = state.tracker.lock().await;
    if tracker.remove_day(&day_id) {
        persist_data(&state.data_path, tracker.storage()).await?;
    }
    Ok(Json(Plan::clone(&tracker.plan())))
}

pub async fn add_exercise(
    State(state): State<AppState>,
    Path(day_id): Path<String>,
    Json(input): Json<ExerciseInput>,
) -> Result<(StatusCode, Json<Exercise>), AppError> {
    let mut tracker = state.tracker.lock().await;
    let exercise = tracker.add_exercise(&day_id, &input).map_err(rejected)?;

    persist_data(&state.data_path, tracker.storage()).await?;

    Ok((StatusCode::CREATED, Json(exercise)))
}

pub async fn edit_exercise(
    State(state): State<AppState>,
    Path((day_id, exercise_id)): Path<(String, String)>,
    Json(input): Json<ExerciseInput>,
) -> Result<Json<Plan>, AppError> {
    let mut tracker = state.tracker.lock().await;
    let changed = tracker
        .edit_exercise(&day_id, &exercise_id, &input)
        .map_err(rejected)?;
    if changed {
        persist_data(&state.data_path, tracker.storage()).await?;
    }
    Ok(Json(Plan::clone(&tracker.plan())))
}

pub async fn remove_exercise(
    State(state): State<AppState>,
    Path((day_id, exercise_id)): Path<(String, String)>,
) -> Result<Json<Plan>, AppError> {
    let mut tracker = state.tracker.lock().await;
    if tracker.remove_exercise(&day_id, &exercise_id) {
        persist_data(&state.data_path, tracker.storage()).await?;
    }
    Ok(Json(Plan::clone(&tracker.plan())))
}

pub async fn restore_plan(State(state): State<AppState>) -> Result<Json<Plan>, AppError> {
    let mut tracker = state.tracker.lock().await;
    tracker.restore_default_plan();

    persist_data(&state.data_path, tracker.storage()).await?;

    Ok(Json(Plan::clone(&tracker.plan())))
}

fn rejected(err: ValidationError) -> AppError {
    warn!("rejected plan edit: {err}");
    err.into()
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
