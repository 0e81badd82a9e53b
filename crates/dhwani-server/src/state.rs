//! Application state.

use std::sync::Arc;

use dhwani_core::{AgentOrchestrator, AssistantPipeline};
use tokio::sync::Semaphore;

/// Shared application state with a request concurrency limiter.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AssistantPipeline>,
    pub agents: Arc<AgentOrchestrator>,
    pub request_semaphore: Arc<Semaphore>,
    /// Request timeout applied around engine calls (seconds).
    pub request_timeout_secs: u64,
}

impl AppState {
    pub fn new(pipeline: Arc<AssistantPipeline>, agents: Arc<AgentOrchestrator>) -> Self {
        let max_concurrent = std::env::var("DHWANI_MAX_CONCURRENT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        let timeout = std::env::var("DHWANI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(300);

        Self {
            pipeline,
            agents,
            request_semaphore: Arc::new(Semaphore::new(max_concurrent)),
            request_timeout_secs: timeout,
        }
    }

    /// Acquire a permit for concurrent request processing.
    pub async fn acquire_permit(&self) -> tokio::sync::SemaphorePermit<'_> {
        self.request_semaphore
            .acquire()
            .await
            .expect("Semaphore should never be closed")
    }
}
