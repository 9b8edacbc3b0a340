use serde::Deserialize;

/// Body of a `response_format=json` transcription.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
}
