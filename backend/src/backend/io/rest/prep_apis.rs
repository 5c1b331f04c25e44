//! # REST API for the Preparation Flow

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;

use crate::backend::domain::prep::prep_flow;
use crate::backend::AppState;

/// Create a router for preparation related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_prep_flow))
}

/// Preparation questions with answers, and the checklist
pub async fn get_prep_flow(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/prep");
    let response = prep_flow(
        state.curriculum_service.prep(),
        &state.journal_service.snapshot(),
        state.photo_service.has_origin_photo(),
        state.journal_service.is_journey_unlocked(),
    );
    (StatusCode::OK, Json(response)).into_response()
}
