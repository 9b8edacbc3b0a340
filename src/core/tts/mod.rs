//! Text-to-speech.
//!
//! Providers turn a complete reply into a single MP3 buffer. Supported
//! backends:
//!
//! - `"google"` - Google Translate speech endpoint, Portuguese voice (default)
//! - `"openai"` - OpenAI Audio Speech API (`tts-1`)

pub mod google;
pub mod openai;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;

use crate::config::{ServerConfig, TtsProviderKind};

pub use google::{GOOGLE_TTS_LANGUAGE, GoogleTTS};
pub use openai::{AudioOutputFormat, OpenAITTS, OpenAITTSModel, OpenAIVoice};

/// Result type for synthesis
pub type TTSResult<T> = Result<T, TTSError>;

#[derive(Debug, Error)]
pub enum TTSError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid text: {0}")]
    InvalidText(String),
}

/// A text-to-speech backend producing one audio buffer per call.
#[async_trait]
pub trait BaseTTS: Send + Sync {
    async fn synthesize(&self, text: &str) -> TTSResult<Bytes>;

    fn provider_name(&self) -> &'static str;

    /// Extension of the produced audio, without the dot
    fn file_extension(&self) -> &'static str {
        "mp3"
    }
}

pub type BoxedTTS = Box<dyn BaseTTS>;

/// Build the configured TTS backend.
///
/// Missing credentials are reported at synthesis time, not here.
pub fn create_tts_provider(config: &ServerConfig, http_client: Client) -> BoxedTTS {
    match config.tts_provider {
        TtsProviderKind::Google => {
            Box::new(GoogleTTS::new(http_client, config.google_tts_url.clone()))
        }
        TtsProviderKind::OpenAI => Box::new(OpenAITTS::from_config(http_client, config)),
    }
}
