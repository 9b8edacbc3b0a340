use axum::{Json, response::IntoResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// `GET /` liveness probe. Touches no external service.
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse { status: "OK" })
}
