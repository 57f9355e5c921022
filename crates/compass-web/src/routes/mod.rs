//! Route handlers.

pub mod collaborations;
pub mod notifications;
pub mod pathways;
pub mod students;

use axum::http::StatusCode;
use compass_core::CoreError;

/// Map a core error onto an HTTP status and message.
pub(crate) fn error_response(err: CoreError) -> (StatusCode, String) {
    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.is_conflict() {
        StatusCode::CONFLICT
    } else if matches!(err, CoreError::ValidationError(_)) {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, err.to_string())
}
