//! # REST API for Answers
//!
//! Reading the answer snapshot and saving one answer at a time. Every save
//! returns the statistics recomputed from the new snapshot.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use log::info;

use crate::backend::io::rest::error_mapping::error_response;
use crate::backend::AppState;
use shared::{SaveAnswerRequest, SaveAnswerResponse};

/// Create a router for answer related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_answers))
        .route("/:entry_id", put(save_answer))
}

/// The full answer map, keyed by entry id
pub async fn list_answers(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/answers");
    let answers = state.journal_service.snapshot();
    (StatusCode::OK, Json(answers.as_ref().clone())).into_response()
}

pub async fn save_answer(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
    Json(request): Json<SaveAnswerRequest>,
) -> impl IntoResponse {
    info!("PUT /api/answers/{} ({} chars)", entry_id, request.text.chars().count());

    match state
        .journal_service
        .save_answer(&entry_id, request.text, request.date_string)
        .await
    {
        Ok((answer, stats)) => {
            let response = SaveAnswerResponse { entry_id, answer, stats };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("save answer", e),
    }
}
