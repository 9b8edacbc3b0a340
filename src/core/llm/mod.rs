//! OpenAI chat completion client.
//!
//! Every completion is a fresh, stateless request: one system instruction and
//! one user turn. There is no conversation history and no caching, so two
//! identical calls may return different text.
//!
//! - API Endpoint: `POST https://api.openai.com/v1/chat/completions`
//! - Documentation: <https://platform.openai.com/docs/api-reference/chat/create>

mod client;
mod messages;

use thiserror::Error;

pub use client::OpenAIChat;
pub use messages::{ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// Result type for language model operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors raised by the chat completion client
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OpenAI API key not configured")]
    MissingApiKey,

    #[error("Chat completion request failed: {0}")]
    Network(String),

    /// 401/403 from the provider
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("{0}")]
    Provider(String),

    #[error("Failed to parse chat completion: {0}")]
    Parse(String),

    /// The provider answered without any text
    #[error("Chat completion returned no content")]
    EmptyResponse,
}
