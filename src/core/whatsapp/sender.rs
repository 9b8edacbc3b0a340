//! Outbound replies through the local WPPConnect server.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use super::GatewayError;
use crate::config::ServerConfig;

/// Messages longer than this are sent with `format: "full"` when enabled.
const LONG_MESSAGE_CHARS: usize = 160;

/// JSON body of `POST /api/send-message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessageRequest<'a> {
    pub phone: &'a str,
    pub message: &'a str,
    #[serde(rename = "waitForAck", skip_serializing_if = "Option::is_none")]
    pub wait_for_ack: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'static str>,
}

/// Status and raw body returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: String,
}

/// Client for the WPPConnect send-message endpoint.
#[derive(Clone)]
pub struct WppConnectClient {
    http_client: Client,
    url: String,
    token: Option<String>,
    wait_for_ack: bool,
    full_format_long_messages: bool,
    send_delay: Duration,
}

impl std::fmt::Debug for WppConnectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WppConnectClient")
            .field("url", &self.url)
            .field("wait_for_ack", &self.wait_for_ack)
            .field("send_delay", &self.send_delay)
            .finish_non_exhaustive()
    }
}

impl WppConnectClient {
    pub fn new(http_client: Client, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
            token: None,
            wait_for_ack: false,
            full_format_long_messages: false,
            send_delay: Duration::ZERO,
        }
    }

    pub fn from_config(http_client: Client, config: &ServerConfig) -> Self {
        Self {
            http_client,
            url: config.gateway_url.clone(),
            token: config.gateway_token.clone(),
            wait_for_ack: config.wait_for_ack,
            full_format_long_messages: config.full_format_long_messages,
            send_delay: Duration::from_millis(config.send_delay_ms),
        }
    }

    pub fn with_wait_for_ack(mut self, wait: bool) -> Self {
        self.wait_for_ack = wait;
        self
    }

    pub fn with_full_format_long_messages(mut self, enabled: bool) -> Self {
        self.full_format_long_messages = enabled;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Build the request body for a message.
    pub fn build_request<'a>(&self, phone: &'a str, message: &'a str) -> SendMessageRequest<'a> {
        let is_long = message.chars().count() > LONG_MESSAGE_CHARS;
        SendMessageRequest {
            phone,
            message,
            wait_for_ack: self.wait_for_ack.then_some(true),
            format: (self.full_format_long_messages && is_long).then_some("full"),
        }
    }

    /// Deliver a text message. Single attempt.
    pub async fn send_text(
        &self,
        phone: &str,
        message: &str,
    ) -> Result<GatewayResponse, GatewayError> {
        if !self.send_delay.is_zero() {
            debug!(delay_ms = self.send_delay.as_millis() as u64, "Delaying send");
            tokio::time::sleep(self.send_delay).await;
        }

        let payload = self.build_request(phone, message);

        let mut request = self.http_client.post(&self.url).json(&payload);
        if let Some(token) = self.token.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(format!("Failed to read response: {e}")))?;

        info!(status, body = %body, phone = %phone, "Gateway send result");

        if !(200..300).contains(&status) {
            return Err(GatewayError::Rejected { status, body });
        }

        Ok(GatewayResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_payload_is_phone_and_message() {
        let client = WppConnectClient::new(Client::new(), "http://localhost:21465/api/send-message");
        let body = serde_json::to_value(client.build_request("5511999999999", "Olá")).unwrap();
        assert_eq!(body, json!({"phone": "5511999999999", "message": "Olá"}));
    }

    #[test]
    fn test_optional_fields() {
        let client = WppConnectClient::new(Client::new(), "http://gw")
            .with_wait_for_ack(true)
            .with_full_format_long_messages(true);

        let short = serde_json::to_value(client.build_request("1", "curta")).unwrap();
        assert_eq!(short, json!({"phone": "1", "message": "curta", "waitForAck": true}));

        let long_text = "a".repeat(LONG_MESSAGE_CHARS + 1);
        let long = serde_json::to_value(client.build_request("1", &long_text)).unwrap();
        assert_eq!(long["format"], "full");
    }

    #[test]
    fn test_long_message_counts_chars_not_bytes() {
        let client =
            WppConnectClient::new(Client::new(), "http://gw").with_full_format_long_messages(true);
        // 160 two-byte chars is 320 bytes but still not "long"
        let text = "é".repeat(LONG_MESSAGE_CHARS);
        assert_eq!(client.build_request("1", &text).format, None);
    }

    #[tokio::test]
    async fn test_send_to_unreachable_gateway() {
        let client = WppConnectClient::new(Client::new(), "http://127.0.0.1:9/api/send-message");
        assert!(matches!(
            client.send_text("1", "oi").await,
            Err(GatewayError::Network(_))
        ));
    }
}
