use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use super::messages::TranscriptionResponse;
use super::{WHISPER_LANGUAGE, WHISPER_MODEL};
use crate::config::ServerConfig;
use crate::core::openai::describe_error;
use crate::core::stt::{BaseSTT, STTError, STTResult};

/// Whisper client for whole-file transcription.
#[derive(Clone)]
pub struct OpenAISTT {
    http_client: Client,
    url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for OpenAISTT {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAISTT")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl OpenAISTT {
    pub fn new(http_client: Client, url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
            api_key,
        }
    }

    pub fn from_config(http_client: Client, config: &ServerConfig) -> Self {
        Self::new(
            http_client,
            config.transcriptions_url(),
            config.openai_api_key.clone(),
        )
    }

    fn build_form(audio: Vec<u8>) -> STTResult<Form> {
        let file_part = Part::bytes(audio)
            .file_name("audio.mp3")
            .mime_str("audio/mpeg")
            .map_err(|e| STTError::ConfigurationError(format!("Invalid MIME type: {e}")))?;

        Ok(Form::new()
            .part("file", file_part)
            .text("model", WHISPER_MODEL)
            .text("language", WHISPER_LANGUAGE)
            .text("response_format", "json"))
    }
}

#[async_trait]
impl BaseSTT for OpenAISTT {
    async fn transcribe_file(&self, path: &Path) -> STTResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| STTError::ConfigurationError("OpenAI API key not configured".into()))?;

        let audio = tokio::fs::read(path).await.map_err(|e| {
            STTError::AudioProcessingError(format!("Failed to read {}: {e}", path.display()))
        })?;
        if audio.is_empty() {
            return Err(STTError::AudioProcessingError("Audio file is empty".into()));
        }

        debug!(bytes = audio.len(), "Sending audio to Whisper");
        let form = Self::build_form(audio)?;

        let response = self
            .http_client
            .post(&self.url)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| STTError::NetworkError(format!("Request failed: {e}")))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| STTError::NetworkError(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = describe_error(status, &response_text);
            return Err(if status.as_u16() == 401 {
                STTError::AuthenticationFailed(message)
            } else {
                STTError::ProviderError(message)
            });
        }

        let parsed: TranscriptionResponse = serde_json::from_str(&response_text)
            .map_err(|e| STTError::ProviderError(format!("Failed to parse response: {e}")))?;

        info!(chars = parsed.text.len(), "Transcription complete");
        Ok(parsed.text)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_api_key() {
        let stt = OpenAISTT::new(Client::new(), "http://127.0.0.1:9", None);
        let err = stt
            .transcribe_file(Path::new("/nonexistent.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, STTError::ConfigurationError(_)));
    }

    #[tokio::test]
    async fn test_empty_file_rejected_before_upload() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let stt = OpenAISTT::new(Client::new(), "http://127.0.0.1:9", Some("sk".into()));
        let err = stt.transcribe_file(file.path()).await.unwrap_err();
        assert!(matches!(err, STTError::AudioProcessingError(_)));
    }

    #[tokio::test]
    async fn test_unreachable_provider() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"ID3fake").unwrap();
        let stt = OpenAISTT::new(Client::new(), "http://127.0.0.1:9", Some("sk".into()));
        let err = stt.transcribe_file(file.path()).await.unwrap_err();
        assert!(matches!(err, STTError::NetworkError(_)));
    }
}
