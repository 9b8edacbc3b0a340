use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::webhook;
use crate::state::AppState;
use std::sync::Arc;

/// WhatsApp gateway callbacks.
///
/// No auth: the gateway does not sign its requests, and the verify token only
/// guards the subscription handshake.
pub fn create_webhook_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/webhook",
            get(webhook::verify_webhook).post(webhook::receive_message),
        )
        .layer(TraceLayer::new_for_http())
}
