pub mod api;
pub mod voice;
pub mod webhook;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Every route with state attached, without the outer security layers.
///
/// `main` wraps this with CORS, rate limiting and response headers.
pub fn create_router(state: Arc<AppState>) -> Router {
    api::create_api_router()
        .merge(webhook::create_webhook_router())
        .merge(voice::create_voice_router(state.clone()))
        .with_state(state)
}
