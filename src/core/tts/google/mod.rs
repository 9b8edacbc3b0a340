//! Google Translate speech endpoint.
//!
//! Unauthenticated and limited to roughly 100 characters per request, so
//! longer text is split at word boundaries and the MP3 segments are
//! concatenated in order. MP3 frames are self-delimiting, so the joined
//! buffer plays back as one file.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{BaseTTS, TTSError, TTSResult};

pub const GOOGLE_TTS_LANGUAGE: &str = "pt";

/// Maximum characters per request
const MAX_CHUNK_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct GoogleTTS {
    http_client: Client,
    url: String,
    language: String,
}

impl GoogleTTS {
    pub fn new(http_client: Client, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
            language: GOOGLE_TTS_LANGUAGE.to_string(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn chunk_url(&self, chunk: &str, idx: usize, total: usize) -> TTSResult<Url> {
        let mut url = Url::parse(&self.url)
            .map_err(|e| TTSError::ConfigurationError(format!("Invalid URL {}: {e}", self.url)))?;
        url.query_pairs_mut()
            .append_pair("ie", "UTF-8")
            .append_pair("q", chunk)
            .append_pair("tl", &self.language)
            .append_pair("client", "tw-ob")
            .append_pair("total", &total.to_string())
            .append_pair("idx", &idx.to_string())
            .append_pair("textlen", &chunk.chars().count().to_string());
        Ok(url)
    }
}

/// Split `text` into pieces of at most `max_chars` characters.
///
/// Breaks on whitespace where possible; a single word longer than the limit
/// is cut mid-word.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word_chars: Vec<char> = word.chars().collect();

        while word_chars.len() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word_chars.split_off(max_chars);
            chunks.push(word_chars.into_iter().collect());
            word_chars = rest;
        }

        let word_len = word_chars.len();
        if word_len == 0 {
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word_chars);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[async_trait]
impl BaseTTS for GoogleTTS {
    async fn synthesize(&self, text: &str) -> TTSResult<Bytes> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(TTSError::InvalidText("Nothing to synthesize".into()));
        }

        let total = chunks.len();
        let mut audio = BytesMut::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let url = self.chunk_url(chunk, idx, total)?;
            debug!(idx, total, chars = chunk.chars().count(), "Requesting speech segment");

            let response = self
                .http_client
                .get(url)
                .send()
                .await
                .map_err(|e| TTSError::NetworkError(format!("Request failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(TTSError::ProviderError(format!(
                    "Google TTS error ({status}): {body}"
                )));
            }

            let segment = response
                .bytes()
                .await
                .map_err(|e| TTSError::NetworkError(format!("Failed to read audio: {e}")))?;
            audio.extend_from_slice(&segment);
        }

        if audio.is_empty() {
            return Err(TTSError::ProviderError("Google TTS returned no audio".into()));
        }
        Ok(audio.freeze())
    }

    fn provider_name(&self) -> &'static str {
        "google"
    }
}
