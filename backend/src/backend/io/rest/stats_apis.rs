//! # REST API for Statistics and Progress

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;

use crate::backend::AppState;
use shared::ProgressResponse;

/// Create a router for statistics related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/progress", get(get_progress))
}

/// Completion, streaks and the motivational message
pub async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/stats");
    (StatusCode::OK, Json(state.journal_service.stats_response())).into_response()
}

/// Completion percentage of every month
pub async fn get_progress(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/progress");
    let response = ProgressResponse {
        months: state.journal_service.all_progress(),
    };
    (StatusCode::OK, Json(response)).into_response()
}
