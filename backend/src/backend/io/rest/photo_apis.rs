//! # REST API for the Photo Journal

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
use shared::{PhotoListResponse, SavePhotoRequest, SavePhotoResponse};

/// Create a router for photo related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_photos).post(save_photo))
}

/// All photos, newest first
pub async fn list_photos(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/photos");
    let response = PhotoListResponse {
        photos: state.photo_service.list(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub async fn save_photo(
    State(state): State<AppState>,
    Json(request): Json<SavePhotoRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/photos - caption: {:?}, {} bytes of image data",
        request.caption,
        request.image_base64.len()
    );

    match state.photo_service.save_photo(request).await {
        Ok((photo, photo_count)) => {
            let response = SavePhotoResponse { photo, photo_count };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("save photo", e),
    }
}
