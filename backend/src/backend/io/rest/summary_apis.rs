//! # REST API for Monthly Summaries

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::info;

use crate::backend::io::rest::error_mapping::error_response;
use crate::backend::AppState;
use shared::{SummaryListResponse, SummaryResponse};

/// Create a router for summary related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_summaries))
        .route("/:month_id/generate", post(generate_summary))
}

pub async fn list_summaries(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/summaries");
    let response = SummaryListResponse {
        summaries: state.summary_service.list(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Generate, store and return the summary of one month
pub async fn generate_summary(
    State(state): State<AppState>,
    Path(month_id): Path<u32>,
) -> impl IntoResponse {
    info!("POST /api/summaries/{}/generate", month_id);

    match state.summary_service.generate(month_id).await {
        Ok(summary) => {
            let response = SummaryResponse { month_id, summary };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("generate summary", e),
    }
}
