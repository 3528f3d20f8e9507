//! API error type and helpers.
//!
//! Every failure leaving a handler is an [`ApiError`]: a status code and a
//! JSON body with a stable `code`, a human-readable `message` and, for
//! validation failures, the offending `argument`. Internal errors are logged
//! server-side and reach the client with a generic message only.
use crate::api::types::ErrorResponse;
use crate::auth::AuthError;
use crate::permissions::PermissionDenied;
use crate::search::SearchError;
use crate::store::StoreError;
use crate::validation::ValidationFailure;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                code: code.to_string(),
                message: message.into(),
                argument: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub fn api_not_found(message: &str) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "not_found", message)
}

pub fn api_conflict(code: &str, message: &str) -> ApiError {
    ApiError::new(StatusCode::CONFLICT, code, message)
}

pub fn api_unauthorized(message: &str) -> ApiError {
    ApiError::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

/// The caller is known but not permitted.
pub fn api_forbidden(message: &str) -> ApiError {
    ApiError::new(StatusCode::FORBIDDEN, "forbidden", message)
}

pub fn api_bad_request(code: &str, message: &str) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, code, message)
}

pub fn api_invalid_argument(message: &str, argument: Option<String>) -> ApiError {
    let mut error = ApiError::new(StatusCode::BAD_REQUEST, "invalid_argument", message);
    error.body.argument = argument;
    error
}

/// Logs `err` and returns a generic 500.
pub fn api_internal(message: &str, err: &dyn std::fmt::Display) -> ApiError {
    tracing::error!(error = %err, "{}", message);
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

impl From<PermissionDenied> for ApiError {
    fn from(err: PermissionDenied) -> Self {
        api_forbidden(&format!(
            "You don't have permissions to {} this {}",
            err.action,
            err.kind.as_str().to_lowercase()
        ))
    }
}

impl From<ValidationFailure> for ApiError {
    fn from(err: ValidationFailure) -> Self {
        api_invalid_argument(&err.message, err.argument)
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        api_invalid_argument(&err.to_string(), Some(err.param.to_string()))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => api_not_found(&what),
            StoreError::Conflict(what) => api_conflict("already_exists", &what),
            StoreError::Unexpected(err) => api_internal("storage failure", &err),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => api_bad_request("missing_token", &err.to_string()),
            AuthError::InvalidToken | AuthError::UnknownUser => api_unauthorized(
                "Unauthorized. You are trying to access a protected resource",
            ),
            AuthError::Store(err) => err.into(),
        }
    }
}

/// A body that passed its schema but does not form a valid entity.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        api_invalid_argument(&err.to_string(), None)
    }
}
