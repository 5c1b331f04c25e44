//! Translation of domain errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;

use crate::backend::domain::models::{JournalError, NavigationError};
use crate::backend::storage::StorageError;

/// Pick the status code for a service error by its typed cause
pub fn status_for(err: &anyhow::Error) -> StatusCode {
    if let Some(e) = err.downcast_ref::<JournalError>() {
        return match e {
            JournalError::UnknownEntry(_) | JournalError::UnknownMonth(_) => StatusCode::NOT_FOUND,
            JournalError::EraseNotConfirmed
            | JournalError::ReviewNotWritable(_)
            | JournalError::EmptyUserName
            | JournalError::InvalidImage(_) => StatusCode::BAD_REQUEST,
            JournalError::RequestInFlight(_) | JournalError::StaleSummary(_) => StatusCode::CONFLICT,
            JournalError::ImportFailed(_) | JournalError::NoContentForSummary(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            JournalError::SummaryFailed(_) => StatusCode::BAD_GATEWAY,
        };
    }
    if let Some(e) = err.downcast_ref::<NavigationError>() {
        return match e {
            NavigationError::UnknownMonth(_) | NavigationError::UnknownEntry(_) => StatusCode::NOT_FOUND,
            NavigationError::EntryOutOfRange { .. } => StatusCode::BAD_REQUEST,
        };
    }
    if let Some(StorageError::CapacityExceeded { .. }) = err.downcast_ref::<StorageError>() {
        return StatusCode::PAYLOAD_TOO_LARGE;
    }
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Log the failure and turn it into a plain-text response
pub fn error_response(action: &str, err: anyhow::Error) -> Response {
    let status = status_for(&err);
    error!("Failed to {}: {}", action, err);
    (status, err.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(anyhow::Error, StatusCode)> = vec![
            (JournalError::UnknownEntry("x".into()).into(), StatusCode::NOT_FOUND),
            (JournalError::EraseNotConfirmed.into(), StatusCode::BAD_REQUEST),
            (JournalError::ReviewNotWritable("mes_1_revisao".into()).into(), StatusCode::BAD_REQUEST),
            (JournalError::RequestInFlight("photo upload").into(), StatusCode::CONFLICT),
            (JournalError::ImportFailed("bad".into()).into(), StatusCode::UNPROCESSABLE_ENTITY),
            (JournalError::NoContentForSummary("Janeiro".into()).into(), StatusCode::UNPROCESSABLE_ENTITY),
            (JournalError::SummaryFailed("down".into()).into(), StatusCode::BAD_GATEWAY),
            (
                NavigationError::EntryOutOfRange { month_id: 1, index: 40, len: 32 }.into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                StorageError::CapacityExceeded { category: "photos", size: 10, limit: 5 }.into(),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (anyhow::anyhow!("disk on fire"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(status_for(&err), expected, "{}", err);
        }
    }
}
