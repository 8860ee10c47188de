use crate::errors::AppError;
use crate::models::{
    date_key, parse_date_key, HabitNameRequest, ToggleRequest, ToggleResponse, TrackerView,
};
use crate::state::AppState;
use crate::storage::{persist_storage, LocalStorage};
use crate::tracker::HabitTracker;
use crate::ui::render_index;
use axum::{extract::State, response::Html, Json};
use chrono::{Local, NaiveDate};
use tracing::error;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let tracker = state.tracker.lock().await;
    Html(render_index(&tracker.view_at(today())))
}

pub async fn get_state(State(state): State<AppState>) -> Json<TrackerView> {
    let tracker = state.tracker.lock().await;
    Json(tracker.view_at(today()))
}

pub async fn add_habit(
    State(state): State<AppState>,
    Json(payload): Json<HabitNameRequest>,
) -> Result<Json<TrackerView>, AppError> {
    let mut tracker = state.tracker.lock().await;
    if tracker.add_habit(&payload.name) {
        flush(&state, &tracker).await?;
    }
    Ok(Json(tracker.view_at(today())))
}

pub async fn select_habit(
    State(state): State<AppState>,
    Json(payload): Json<HabitNameRequest>,
) -> Result<Json<TrackerView>, AppError> {
    let mut tracker = state.tracker.lock().await;
    if tracker.select_habit(&payload.name) {
        flush(&state, &tracker).await?;
    }
    Ok(Json(tracker.view_at(today())))
}

pub async fn request_delete(
    State(state): State<AppState>,
    Json(payload): Json<HabitNameRequest>,
) -> Json<TrackerView> {
    let mut tracker = state.tracker.lock().await;
    tracker.request_delete(&payload.name);
    Json(tracker.view_at(today()))
}

pub async fn confirm_delete(State(state): State<AppState>) -> Result<Json<TrackerView>, AppError> {
    let mut tracker = state.tracker.lock().await;
    if tracker.confirm_delete() {
        flush(&state, &tracker).await?;
    }
    Ok(Json(tracker.view_at(today())))
}

pub async fn cancel_delete(State(state): State<AppState>) -> Json<TrackerView> {
    let mut tracker = state.tracker.lock().await;
    tracker.cancel_delete();
    Json(tracker.view_at(today()))
}

pub async fn toggle_date(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, AppError> {
    let date = parse_date_key(&payload.date)
        .ok_or_else(|| AppError::bad_request("date must be YYYY-MM-DD"))?;
    apply_toggle(&state, date).await.map(Json)
}

pub async fn toggle_today(State(state): State<AppState>) -> Result<Json<ToggleResponse>, AppError> {
    let date = today();
    let mut tracker = state.tracker.lock().await;
    let active = tracker.toggle_today(date);
    toggle_response(&state, &tracker, date, active).await.map(Json)
}

async fn apply_toggle(state: &AppState, date: NaiveDate) -> Result<ToggleResponse, AppError> {
    let mut tracker = state.tracker.lock().await;
    let active = tracker.toggle_date(date);
    toggle_response(state, &tracker, date, active).await
}

async fn toggle_response(
    state: &AppState,
    tracker: &HabitTracker<LocalStorage>,
    date: NaiveDate,
    active: Option<bool>,
) -> Result<ToggleResponse, AppError> {
    if active.is_some() {
        flush(state, tracker).await?;
    }

    Ok(ToggleResponse {
        date: date_key(date),
        active,
        stats: tracker.stats_at(today()),
    })
}

async fn flush(state: &AppState, tracker: &HabitTracker<LocalStorage>) -> Result<(), AppError> {
    persist_storage(&state.data_path, tracker.store().backend())
        .await
        .inspect_err(|err| {
            error!(
                habit = tracker.selection().unwrap_or("-"),
                path = %state.data_path.display(),
                "habit change kept in memory but not written: {}",
                err.message
            )
        })
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
