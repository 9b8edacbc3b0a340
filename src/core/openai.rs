//! Wire types shared by every OpenAI endpoint (chat, transcription, speech).
//!
//! API Reference: https://platform.openai.com/docs/guides/error-codes

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// OpenAI API error response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAIErrorResponse {
    /// Error details.
    pub error: OpenAIError,
}

/// OpenAI API error details.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAIError {
    /// Human-readable error message.
    pub message: String,

    /// Error type identifier.
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,

    /// Error code (if applicable).
    #[serde(default)]
    pub code: Option<String>,
}

impl std::fmt::Display for OpenAIError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error_type {
            Some(kind) => write!(f, "{} ({})", self.message, kind),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for OpenAIError {}

/// Render a failed response body as a readable message.
///
/// Uses the structured OpenAI error when the body parses as one, otherwise
/// falls back to the status and raw body.
pub fn describe_error(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<OpenAIErrorResponse>(body) {
        Ok(parsed) => format!("OpenAI API error: {}", parsed.error),
        Err(_) => format!("OpenAI API error ({status}): {body}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_structured_error() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error", "code": "invalid_api_key"}}"#;
        let msg = describe_error(StatusCode::UNAUTHORIZED, body);
        assert_eq!(
            msg,
            "OpenAI API error: Incorrect API key provided (invalid_request_error)"
        );
    }

    #[test]
    fn test_describe_unstructured_error() {
        let msg = describe_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(msg.contains("502"));
        assert!(msg.contains("upstream down"));
    }
}
