//! API routes and handlers

mod health;
mod process;
mod text;
mod transcribe;
mod tts;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/transcribe", post(transcribe::transcribe_audio))
        .route("/process", post(process::process_audio))
        .route("/tts", post(tts::synthesize_speech))
        .route("/text", post(text::process_text))
        .route("/reset", post(text::reset_conversation));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
