use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use pirs_core::DomainError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let status = match &err {
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::DuplicateKey(_) => StatusCode::CONFLICT,
        DomainError::InvalidValue(_) => StatusCode::BAD_REQUEST,
        DomainError::InsufficientStock { .. } => StatusCode::CONFLICT,
        DomainError::Inconsistency(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    json_error(status, err.code(), err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// `200` with the value as JSON, or the mapped error.
pub fn respond<T: serde::Serialize>(result: Result<T, DomainError>) -> axum::response::Response {
    respond_with(StatusCode::OK, result)
}

pub fn respond_with<T: serde::Serialize>(
    status: StatusCode,
    result: Result<T, DomainError>,
) -> axum::response::Response {
    match result {
        Ok(v) => (status, axum::Json(v)).into_response(),
        Err(e) => domain_error_to_response(e),
    }
}
