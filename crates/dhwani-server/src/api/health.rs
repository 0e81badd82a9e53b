//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use dhwani_core::HandleState;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    engines: Vec<EngineStatus>,
}

#[derive(Serialize)]
pub struct EngineStatus {
    name: &'static str,
    state: HandleState,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let engines = state
        .pipeline
        .engine_states()
        .await
        .into_iter()
        .map(|(name, state)| EngineStatus { name, state })
        .collect();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        engines,
    })
}
