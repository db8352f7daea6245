use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use ledger_auth::TokenError;
use ledger_core::DomainError;
use ledger_infra::StoreError;

/// The only message a denied caller ever sees.
pub const ACCESS_DENIED: &str = "access denied";

/// Errors a handler can return. Only `Validation` and `NotImplemented`
/// messages reach the caller verbatim; `Internal` details are logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotImplemented(&'static str),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, msg),
            ApiError::NotImplemented(msg) => json_error(StatusCode::NOT_IMPLEMENTED, msg),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::InvalidId(msg) => ApiError::Validation(format!("invalid id {msg}")),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// Uniform 403 body shared by every authorization failure.
pub fn access_denied() -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, ACCESS_DENIED)
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}
