use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/toggle/:exercise_id", post(handlers::toggle_form))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/plan", get(handlers::get_plan))
        .route("/api/plan/restore", post(handlers::restore_plan))
        .route("/api/toggle", post(handlers::toggle))
        .route("/api/reset", post(handlers::reset_week))
        .route("/api/days", post(handlers::add_day))
        .route("/api/days/:day_id", delete(handlers::remove_day))
        .route("/api/days/:day_id/exercises", post(handlers::add_exercise))
        .route(
            "/api/days/:day_id/exercises/:exercise_id",
            put(handlers::edit_exercise).delete(handlers::remove_exercise),
        )
        .with_state(state)
}
