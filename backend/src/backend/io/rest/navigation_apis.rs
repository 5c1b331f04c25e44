//! # REST API for Navigation
//!
//! The backend holds which screen, month and entry the user is on. Moving to
//! another month abandons any pending summary request.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;

use crate::backend::io::rest::error_mapping::error_response;
use crate::backend::AppState;
use shared::NavigationAction;

/// Create a router for navigation related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_navigation).post(apply_action))
}

pub async fn get_navigation(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/navigation");
    let current = state.navigation_service.current();
    match state.navigation_service.response(&current).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("get navigation state", e),
    }
}

pub async fn apply_action(
    State(state): State<AppState>,
    Json(action): Json<NavigationAction>,
) -> impl IntoResponse {
    info!("POST /api/navigation - action: {:?}", action);

    let outcome = match state.navigation_service.apply(action).await {
        Ok(outcome) => outcome,
        Err(e) => return error_response("apply navigation action", e),
    };
    if outcome.month_changed {
        state.summary_service.abandon_pending();
    }
    match state.navigation_service.response(&outcome.state).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("get navigation state", e),
    }
}
