//! # REST API for Backups and the Printable Journal
//!
//! - `GET /export/json` returns the backup file name and content
//! - `POST /import/json` replaces every answer with a backup's content
//! - `GET /export/pdf` downloads the journal as a PDF

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::info;

use crate::backend::io::rest::error_mapping::error_response;
use crate::backend::AppState;
use shared::{ExportJsonResponse, ImportJsonRequest, ImportJsonResponse};

/// Create a router for export related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/export/json", get(export_json))
        .route("/import/json", post(import_json))
        .route("/export/pdf", get(export_pdf))
}

pub async fn export_json(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/export/json");
    match state.export_service.export_json() {
        Ok((filename, content, answer_count)) => {
            let response = ExportJsonResponse { filename, content, answer_count };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("export answers", e),
    }
}

pub async fn import_json(
    State(state): State<AppState>,
    Json(request): Json<ImportJsonRequest>,
) -> impl IntoResponse {
    info!("POST /api/import/json ({} bytes)", request.content.len());
    match state.export_service.import_json(&request.content).await {
        Ok((imported_count, stats)) => {
            let response = ImportJsonResponse {
                imported_count,
                stats,
                success_message: "Diário restaurado com sucesso!".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("import backup", e),
    }
}

pub async fn export_pdf(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/export/pdf");
    match state.export_service.export_pdf().await {
        Ok((filename, bytes)) => {
            let disposition = format!("attachment; filename=\"{}\"", filename);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => error_response("export PDF", e),
    }
}
