//! # REST API for the Curriculum
//!
//! Read-only access to the generated year: all months, one month with its
//! progress and summary, or one entry with its answer.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;

use crate::backend::domain::models::JournalError;
use crate::backend::io::rest::error_mapping::error_response;
use crate::backend::io::rest::mappers::CurriculumMapper;
use crate::backend::AppState;
use shared::{CurriculumResponse, EntryResponse, MonthResponse};

/// Create a router for curriculum related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_curriculum))
        .route("/months/:month_id", get(get_month))
        .route("/entries/:entry_id", get(get_entry))
}

/// The whole generated curriculum
pub async fn get_curriculum(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/curriculum");

    let curriculum = state.curriculum_service.curriculum();
    let response = CurriculumResponse {
        target_year: curriculum.target_year,
        total_days: curriculum.total_days,
        months: CurriculumMapper::months_to_dto(&curriculum.months),
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub async fn get_month(
    State(state): State<AppState>,
    Path(month_id): Path<u32>,
) -> impl IntoResponse {
    info!("GET /api/curriculum/months/{}", month_id);

    let month = match state.curriculum_service.month(month_id) {
        Some(month) => month,
        None => return error_response("get month", JournalError::UnknownMonth(month_id).into()),
    };
    match state.journal_service.month_progress(month_id) {
        Ok(progress) => {
            let response = MonthResponse {
                month: CurriculumMapper::month_to_dto(month),
                progress,
                summary: state.summary_service.get(month_id),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("get month progress", e),
    }
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/curriculum/entries/{}", entry_id);

    match state.curriculum_service.entry(&entry_id) {
        Some((_, entry, position)) => {
            let response = EntryResponse {
                month_id: position.month_id,
                position: position.position,
                entry: CurriculumMapper::entry_to_dto(entry),
                answer: state.journal_service.answer(&entry_id),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        None => error_response("get entry", JournalError::UnknownEntry(entry_id).into()),
    }
}
