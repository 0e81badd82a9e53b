//! Dhwani Server - HTTP API for the voice assistant pipeline

use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod error;
mod state;

use dhwani_core::{AgentOrchestrator, AssistantPipeline, PipelineConfig};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dhwani_server=debug,dhwani_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Dhwani voice assistant server");

    let config = PipelineConfig::default();
    info!("Target language: {}", config.language);

    let pipeline = Arc::new(AssistantPipeline::new(config));

    // Wire the agent graph's chat handler to the pipeline's conversation
    // session so both surfaces share one history.
    let agents = match pipeline.chat_session().await {
        Ok(session) => AgentOrchestrator::new().with_chat_session(session),
        Err(err) => {
            warn!("Chat session unavailable, agent graph will use canned replies: {err}");
            AgentOrchestrator::new()
        }
    };

    let state = AppState::new(pipeline, Arc::new(agents));
    let app = api::create_router(state);

    let host = std::env::var("DHWANI_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = match std::env::var("DHWANI_PORT") {
        Ok(raw) => match raw.parse::<u16>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Invalid DHWANI_PORT='{}', falling back to 8080", raw);
                8080
            }
        },
        Err(_) => 8080,
    };
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    info!("Server ready. Press Ctrl+C to stop.");
    server.await?;

    Ok(())
}

/// Wait for a shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        },
    }
}
