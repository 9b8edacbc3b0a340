use reqwest::Client;
use tracing::{debug, info, warn};

use super::messages::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use super::{LlmError, LlmResult};
use crate::config::ServerConfig;
use crate::core::openai::describe_error;

/// Prompt used to check that the provider answers at all.
const PROBE_PROMPT: &str = "Olá. Responda apenas 'OK'";

/// OpenAI chat completion client with a fixed system instruction.
#[derive(Clone)]
pub struct OpenAIChat {
    http_client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
    system_prompt: String,
}

impl std::fmt::Debug for OpenAIChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIChat")
            .field("url", &self.url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAIChat {
    pub fn new(
        http_client: Client,
        url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            url: url.into(),
            api_key,
            model: model.into(),
            system_prompt: system_prompt.into(),
        }
    }

    pub fn from_config(http_client: Client, config: &ServerConfig) -> Self {
        Self::new(
            http_client,
            config.chat_completions_url(),
            config.openai_api_key.clone(),
            config.llm_model.clone(),
            config.llm_system_prompt.clone(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Complete a single user turn under the configured system instruction.
    ///
    /// Returns the trimmed text of the first choice.
    pub async fn complete(&self, user_message: &str) -> LlmResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(self.system_prompt.clone()),
                ChatMessage::user(user_message),
            ],
        };

        debug!(model = %self.model, chars = user_message.len(), "Sending chat completion");

        let response = self
            .http_client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = describe_error(status, &body);
            return Err(if status.as_u16() == 401 || status.as_u16() == 403 {
                LlmError::AuthenticationFailed(message)
            } else {
                LlmError::Provider(message)
            });
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Parse(e.to_string()))?;

        let text = parsed.first_text().ok_or(LlmError::EmptyResponse)?;
        info!(model = %self.model, chars = text.len(), "Chat completion received");
        Ok(text)
    }

    /// Check that the provider is reachable and answering.
    ///
    /// Returns `Ok(false)` when the provider answered with something other than "OK".
    pub async fn check_connection(&self) -> LlmResult<bool> {
        let reply = self.complete(PROBE_PROMPT).await?;
        let ok = reply.trim().trim_end_matches('.').eq_ignore_ascii_case("ok");
        if !ok {
            warn!(reply = %reply, "Unexpected reply from language model probe");
        }
        Ok(ok)
    }
}
