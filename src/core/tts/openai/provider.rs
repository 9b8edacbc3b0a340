use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde_json::json;
use tracing::info;

use super::config::{AudioOutputFormat, OpenAITTSModel, OpenAIVoice};
use crate::config::ServerConfig;
use crate::core::openai::describe_error;
use crate::core::tts::{BaseTTS, TTSError, TTSResult};

/// OpenAI TTS provider using the Audio Speech API.
#[derive(Clone)]
pub struct OpenAITTS {
    http_client: Client,
    url: String,
    api_key: Option<String>,
    model: OpenAITTSModel,
    voice: OpenAIVoice,
    response_format: AudioOutputFormat,
}

impl std::fmt::Debug for OpenAITTS {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAITTS")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("voice", &self.voice)
            .finish_non_exhaustive()
    }
}

impl OpenAITTS {
    pub fn new(
        http_client: Client,
        url: impl Into<String>,
        api_key: Option<String>,
        voice: OpenAIVoice,
    ) -> Self {
        Self {
            http_client,
            url: url.into(),
            api_key,
            model: OpenAITTSModel::default(),
            voice,
            response_format: AudioOutputFormat::default(),
        }
    }

    pub fn from_config(http_client: Client, config: &ServerConfig) -> Self {
        Self::new(
            http_client,
            config.speech_url(),
            config.openai_api_key.clone(),
            OpenAIVoice::from_str_or_default(&config.tts_voice),
        )
        .with_model(OpenAITTSModel::from_str_or_default(&config.tts_model))
    }

    pub fn with_model(mut self, model: OpenAITTSModel) -> Self {
        self.model = model;
        self
    }

    pub fn model(&self) -> OpenAITTSModel {
        self.model
    }

    pub fn voice(&self) -> OpenAIVoice {
        self.voice
    }

    fn request_body(&self, text: &str) -> serde_json::Value {
        json!({
            "model": self.model.as_str(),
            "input": text,
            "voice": self.voice.as_str(),
            "response_format": self.response_format.as_str(),
        })
    }
}

#[async_trait]
impl BaseTTS for OpenAITTS {
    async fn synthesize(&self, text: &str) -> TTSResult<Bytes> {
        if text.trim().is_empty() {
            return Err(TTSError::InvalidText("Nothing to synthesize".into()));
        }
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| TTSError::ConfigurationError("OpenAI API key not configured".into()))?;

        let response = self
            .http_client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&self.request_body(text))
            .send()
            .await
            .map_err(|e| TTSError::NetworkError(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TTSError::ProviderError(describe_error(status, &body)));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| TTSError::NetworkError(format!("Failed to read audio: {e}")))?;

        info!(bytes = audio.len(), voice = %self.voice, "Speech synthesized");
        Ok(audio)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn file_extension(&self) -> &'static str {
        self.response_format.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let tts = OpenAITTS::new(Client::new(), "http://tts", None, OpenAIVoice::Nova);
        assert_eq!(
            tts.request_body("Olá"),
            json!({"model": "tts-1", "input": "Olá", "voice": "nova", "response_format": "mp3"})
        );
    }

    #[test]
    fn test_from_config_voice() {
        let mut config = ServerConfig::default();
        config.tts_voice = "onyx".to_string();
        let tts = OpenAITTS::from_config(Client::new(), &config);
        assert_eq!(tts.voice(), OpenAIVoice::Onyx);
        assert_eq!(tts.model(), OpenAITTSModel::Tts1);

        config.tts_model = "tts-1-hd".to_string();
        let tts = OpenAITTS::from_config(Client::new(), &config);
        assert_eq!(tts.model(), OpenAITTSModel::Tts1Hd);
        assert_eq!(tts.request_body("Olá")["model"], "tts-1-hd");
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let tts = OpenAITTS::new(Client::new(), "http://127.0.0.1:9", None, OpenAIVoice::Alloy);
        assert!(matches!(
            tts.synthesize("Olá").await,
            Err(TTSError::ConfigurationError(_))
        ));
    }
}
