use crate::errors::auth_error::{AuthError, AuthResult};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Header carrying the voice endpoint shared secret
pub const VOICE_TOKEN_HEADER: &str = "x-token";

/// Extract the shared secret from the `x-token` header
fn extract_token(request: &Request) -> AuthResult<&str> {
    request
        .headers()
        .get(VOICE_TOKEN_HEADER)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader)
}

/// Constant-time string comparison for shared secrets
pub fn constant_time_eq(token: &str, expected: &str) -> bool {
    token.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Shared-secret check for `/voz`.
///
/// Runs before the multipart body is read, so rejected uploads are never
/// buffered. Every failure renders the same 403 body.
pub async fn voice_token_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let path = request.uri().path().to_string();

    let token = match extract_token(&request) {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Voice request rejected");
            return Err(e);
        }
    };

    if !constant_time_eq(token, &state.config.voice_api_key) {
        tracing::warn!(path = %path, "Voice request rejected: token mismatch");
        return Err(AuthError::InvalidToken);
    }

    tracing::debug!(path = %path, "Voice token accepted");
    Ok(next.run(request).await)
}
