//! # REST API for the User Profile

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
use shared::{ProfileResponse, SetProfileRequest};

/// Create a router for profile related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(set_profile).delete(clear_profile))
}

pub async fn get_profile(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/profile");
    match state.profile_service.user_name().await {
        Ok(user_name) => (StatusCode::OK, Json(ProfileResponse { user_name })).into_response(),
        Err(e) => error_response("get profile", e),
    }
}

pub async fn set_profile(
    State(state): State<AppState>,
    Json(request): Json<SetProfileRequest>,
) -> impl IntoResponse {
    info!("PUT /api/profile");
    match state.profile_service.set_user_name(&request.user_name).await {
        Ok(user_name) => {
            let response = ProfileResponse { user_name: Some(user_name) };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("set profile", e),
    }
}

pub async fn clear_profile(State(state): State<AppState>) -> impl IntoResponse {
    info!("DELETE /api/profile");
    match state.profile_service.clear().await {
        Ok(()) => (StatusCode::OK, Json(ProfileResponse { user_name: None })).into_response(),
        Err(e) => error_response("clear profile", e),
    }
}
