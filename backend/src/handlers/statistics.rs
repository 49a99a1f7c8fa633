//! Profile statistics handlers

use axum::{extract::State, Json};
use chrono::Utc;
use shared::HistoryStatistics;

use crate::AppState;

/// Aggregate statistics over the whole history
pub async fn get_statistics(State(state): State<AppState>) -> Json<HistoryStatistics> {
    Json(state.history.statistics(Utc::now()).await)
}
