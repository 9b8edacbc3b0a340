use axum::{Router, extract::DefaultBodyLimit, middleware, routing::post};
use tower_http::trace::TraceLayer;

use crate::handlers::voice;
use crate::middleware::voice_token_middleware;
use crate::state::AppState;
use std::sync::Arc;

/// Voice upload route, guarded by the `x-token` shared secret.
///
/// Layer order (outer to inner): trace -> token check -> body limit -> handler
pub fn create_voice_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/voz", post(voice::receive_audio))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(middleware::from_fn_with_state(state, voice_token_middleware))
        .layer(TraceLayer::new_for_http())
}
