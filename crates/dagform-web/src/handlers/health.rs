use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub sessions: u64,
    pub sink: &'static str,
}

/// GET /health: live session count and the active sink backend.
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        sessions: state.sessions.len().await,
        sink: state.sink.name(),
    })
}
