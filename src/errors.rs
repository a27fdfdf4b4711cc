use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Request-boundary error taxonomy. Every service converts internal faults
/// into one of these before they leave the process; raw errors never escape
/// as unstructured responses.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    DuplicateIdentity(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("identity not found")]
    IdentityNotFound,

    #[error("no route for {0}")]
    RouteNotFound(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("upstream request timed out")]
    UpstreamTimeout,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, code, msg) = match &self {
            AppError::InvalidInput(reason) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "invalid_input",
                reason.clone(),
            ),
            AppError::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                "not_found_error",
                "not_found",
                format!("{} not found", entity),
            ),
            AppError::DuplicateIdentity(reason) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "duplicate_identity",
                reason.clone(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "invalid_credentials",
                "invalid credentials".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "invalid_token",
                "invalid or expired token".to_string(),
            ),
            AppError::IdentityNotFound => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "identity_not_found",
                "user no longer exists".to_string(),
            ),
            AppError::RouteNotFound(path) => (
                StatusCode::NOT_FOUND,
                "not_found_error",
                "route_not_found",
                format!("no service registered for {}", path),
            ),
            AppError::Upstream(e) => (
                StatusCode::BAD_GATEWAY,
                "upstream_error",
                "upstream_unavailable",
                e.clone(),
            ),
            AppError::UpstreamTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "upstream_error",
                "upstream_timeout",
                "upstream request timed out".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal_server_error",
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": msg,
                "type": error_type,
                "code": code,
            }
        }));

        (status, body).into_response()
    }
}
