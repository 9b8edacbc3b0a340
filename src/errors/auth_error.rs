use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Body detail returned for every rejected voice request.
pub const INVALID_TOKEN_DETAIL: &str = "Token inválido.";

/// Result type for authentication checks
pub type AuthResult<T> = Result<T, AuthError>;

/// Shared-secret authentication failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The `x-token` header is absent
    #[error("Missing x-token header")]
    MissingToken,

    /// The header is present but not valid UTF-8
    #[error("Invalid x-token header encoding")]
    InvalidHeader,

    /// The token does not match the configured secret
    #[error("Token mismatch")]
    InvalidToken,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::FORBIDDEN
    }
}

/// Every variant renders the same 403 body so callers cannot tell a missing
/// header from a wrong one.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({ "detail": INVALID_TOKEN_DETAIL })),
        )
            .into_response()
    }
}
