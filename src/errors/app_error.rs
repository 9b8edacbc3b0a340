use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::core::voice::{VOICE_ERROR_MESSAGE, VoiceError};

pub type AppResult<T> = Result<T, AppError>;

/// Failures surfaced to HTTP clients.
///
/// Clients only ever see a fixed Portuguese sentence; the cause is logged by
/// the handler before conversion.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Voice(#[from] VoiceError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // The voice client expects 200 with an `erro` field
            Self::Voice(_) => StatusCode::OK,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            Self::Voice(_) => json!({ "erro": VOICE_ERROR_MESSAGE }),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
