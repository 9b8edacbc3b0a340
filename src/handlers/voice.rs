use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use tracing::{error, info};
use uuid::Uuid;

use crate::core::voice::{VoiceError, VoiceReply};
use crate::errors::app_error::AppResult;
use crate::state::AppState;

/// Multipart field carrying the recording
pub const UPLOAD_FIELD: &str = "file";

async fn read_upload(mut multipart: Multipart) -> Result<Bytes, VoiceError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| VoiceError::Upload(e.body_text()))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            return field
                .bytes()
                .await
                .map_err(|e| VoiceError::Upload(e.body_text()));
        }
    }
    Err(VoiceError::MissingFile)
}

/// `POST /voz` - answer a recorded question with text and synthesized audio.
///
/// The token has already been checked by middleware. Every pipeline failure
/// yields 200 with `{"erro": ...}`.
pub async fn receive_audio(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<VoiceReply>> {
    let request_id = Uuid::new_v4();

    let result = async {
        let multipart = multipart.map_err(|e| VoiceError::Upload(e.body_text()))?;
        let upload = read_upload(multipart).await?;
        info!(%request_id, bytes = upload.len(), "Voice upload received");
        state
            .voice
            .process(upload, &state.responder, request_id)
            .await
    }
    .await;

    result.map(Json).map_err(|e| {
        error!(%request_id, error = %e, "Voice pipeline failed");
        e.into()
    })
}
