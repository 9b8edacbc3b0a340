use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::core::whatsapp::{InboundEvent, parse_inbound};
use crate::middleware::auth::constant_time_eq;
use crate::state::AppState;

/// Plain-text body of a failed verification
pub const VERIFY_FAILED_BODY: &str = "Token inválido";

/// Subscription handshake parameters. All three are required.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: String,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: String,
    #[serde(rename = "hub.challenge")]
    pub challenge: String,
}

/// `GET /webhook` - echo the challenge when mode and token match.
pub async fn verify_webhook(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VerifyQuery>,
) -> impl IntoResponse {
    let token_ok = constant_time_eq(&params.verify_token, &state.config.verify_token);

    if params.mode == "subscribe" && token_ok {
        info!("Webhook verified");
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            params.challenge,
        );
    }

    warn!(mode = %params.mode, "Webhook verification failed");
    (
        StatusCode::FORBIDDEN,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        VERIFY_FAILED_BODY.to_string(),
    )
}

/// `POST /webhook` - answer an inbound chat message.
///
/// Always 200 `"OK"`; lookup and delivery failures are only logged.
pub async fn receive_message(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
    info!(payload = %String::from_utf8_lossy(&body), "Inbound webhook");

    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Ignoring non-JSON webhook body");
            return (StatusCode::OK, "OK");
        }
    };

    let message = match parse_inbound(&payload, state.config.ignore_group_messages) {
        InboundEvent::Message(message) => message,
        InboundEvent::Ignored(reason) => {
            debug!(reason = reason.as_str(), "Webhook event ignored");
            return (StatusCode::OK, "OK");
        }
    };

    let reply = state.responder.respond(&message.body).await;

    if let Err(e) = state.sender.send_text(&message.sender, &reply).await {
        error!(sender = %message.sender, error = %e, "Failed to deliver reply");
    }

    (StatusCode::OK, "OK")
}
