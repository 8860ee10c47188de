use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/state", get(handlers::get_state))
        .route("/api/habits", post(handlers::add_habit))
        .route("/api/habits/select", post(handlers::select_habit))
        .route("/api/habits/delete", post(handlers::request_delete))
        .route("/api/habits/delete/confirm", post(handlers::confirm_delete))
        .route("/api/habits/delete/cancel", post(handlers::cancel_delete))
        .route("/api/toggle", post(handlers::toggle_date))
        .route("/api/toggle/today", post(handlers::toggle_today))
        .with_state(state)
}
