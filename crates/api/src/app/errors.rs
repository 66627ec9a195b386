use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use catalog_core::DomainError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let (status, code) = match &err {
        DomainError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "invalid_argument"),
        DomainError::Conflict(_) => (StatusCode::BAD_REQUEST, "duplicate_name"),
        DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        // Distinct from a server fault: the record changed under the caller.
        DomainError::Fatal(_) => (StatusCode::CONFLICT, "concurrent_modification"),
        DomainError::Unavailable(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error"),
    };
    json_error(status, code, err.message().unwrap_or("not found"))
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
