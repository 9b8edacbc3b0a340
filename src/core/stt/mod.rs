//! Speech-to-text.
//!
//! Providers transcribe a whole recorded file in one request. There is no
//! streaming and no interim results.

pub mod openai;

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::{OpenAISTT, TranscriptionResponse, WHISPER_LANGUAGE, WHISPER_MODEL};

/// Result type for transcription
pub type STTResult<T> = Result<T, STTError>;

#[derive(Debug, Error)]
pub enum STTError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),
}

/// A speech-to-text backend.
#[async_trait]
pub trait BaseSTT: Send + Sync {
    /// Transcribe the audio file at `path` and return the text.
    async fn transcribe_file(&self, path: &Path) -> STTResult<String>;

    fn provider_name(&self) -> &'static str;
}
