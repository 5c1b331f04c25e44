//! # REST API for Erasing Local Data

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use log::info;

use crate::backend::io::rest::error_mapping::error_response;
use crate::backend::AppState;
use shared::{EraseDataRequest, EraseDataResponse};

/// Create a router for data management APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/erase", post(erase_all))
}

/// Erase answers, photos, summaries and the profile. Requires `confirm: true`.
pub async fn erase_all(
    State(state): State<AppState>,
    Json(request): Json<EraseDataRequest>,
) -> impl IntoResponse {
    info!("POST /api/data/erase - confirm: {}", request.confirm);

    match state.data_service.erase_all(request.confirm).await {
        Ok(()) => {
            let response = EraseDataResponse {
                success_message: "Todos os dados foram apagados.".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("erase data", e),
    }
}
