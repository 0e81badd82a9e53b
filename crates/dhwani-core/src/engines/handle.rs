//! Lazily-initialized engine handles with observable lifecycle state.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::error::Result;

/// Lifecycle of a single engine handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleState {
    Unconfigured,
    Loading,
    Ready,
    Failed,
}

/// A lazily-constructed engine slot.
///
/// Each engine is constructed at most once per cell unless the cell is
/// reset; a failed construction leaves the cell in `Failed` and the next
/// `get_or_init` retries.
pub struct EngineCell<T: ?Sized> {
    name: &'static str,
    state: RwLock<HandleState>,
    slot: RwLock<Option<Arc<T>>>,
    init_lock: Mutex<()>,
}

impl<T: ?Sized> EngineCell<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: RwLock::new(HandleState::Unconfigured),
            slot: RwLock::new(None),
            init_lock: Mutex::new(()),
        }
    }

    /// Construct a cell that is already `Ready`. Used for dependency
    /// injection of pre-built engines.
    pub fn preloaded(name: &'static str, engine: Arc<T>) -> Self {
        Self {
            name,
            state: RwLock::new(HandleState::Ready),
            slot: RwLock::new(Some(engine)),
            init_lock: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn state(&self) -> HandleState {
        *self.state.read().await
    }

    /// The engine, if it is already `Ready`.
    pub async fn get(&self) -> Option<Arc<T>> {
        self.slot.read().await.clone()
    }

    /// Return the engine, constructing it on first use.
    pub async fn get_or_init<F, Fut>(&self, init: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<T>>>,
    {
        if let Some(engine) = self.get().await {
            return Ok(engine);
        }

        let _guard = self.init_lock.lock().await;
        // Another caller may have finished while we waited on the lock.
        if let Some(engine) = self.get().await {
            return Ok(engine);
        }

        *self.state.write().await = HandleState::Loading;
        info!("Loading engine '{}'", self.name);

        match init().await {
            Ok(engine) => {
                *self.slot.write().await = Some(engine.clone());
                *self.state.write().await = HandleState::Ready;
                info!("Engine '{}' ready", self.name);
                Ok(engine)
            }
            Err(err) => {
                *self.state.write().await = HandleState::Failed;
                warn!("Engine '{}' failed to load: {}", self.name, err);
                Err(err)
            }
        }
    }

    /// Drop the engine and return the cell to `Unconfigured`.
    pub async fn reset(&self) {
        let _guard = self.init_lock.lock().await;
        *self.slot.write().await = None;
        *self.state.write().await = HandleState::Unconfigured;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn initializes_exactly_once() {
        let cell: EngineCell<String> = EngineCell::new("test");
        assert_eq!(cell.state().await, HandleState::Unconfigured);

        let builds = AtomicUsize::new(0);
        for _ in 0..3 {
            let value = cell
                .get_or_init(|| async {
                    builds.fetch_add(1, Ordering::SeqCst);
                    Ok(Arc::new("engine".to_string()))
                })
                .await
                .unwrap();
            assert_eq!(*value, "engine");
        }

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(cell.state().await, HandleState::Ready);
    }

    #[tokio::test]
    async fn failure_is_observable_and_retryable() {
        let cell: EngineCell<String> = EngineCell::new("test");

        let err = cell
            .get_or_init(|| async { Err(Error::EngineLoadError("boom".to_string())) })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EngineLoadError(_)));
        assert_eq!(cell.state().await, HandleState::Failed);

        let value = cell
            .get_or_init(|| async { Ok(Arc::new("recovered".to_string())) })
            .await
            .unwrap();
        assert_eq!(*value, "recovered");
        assert_eq!(cell.state().await, HandleState::Ready);
    }

    #[tokio::test]
    async fn preloaded_cells_start_ready() {
        let cell = EngineCell::preloaded("test", Arc::new(42usize));
        assert_eq!(cell.state().await, HandleState::Ready);
        assert_eq!(*cell.get().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn reset_returns_to_unconfigured() {
        let cell = EngineCell::preloaded("test", Arc::new(1usize));
        cell.reset().await;
        assert_eq!(cell.state().await, HandleState::Unconfigured);
        assert!(cell.get().await.is_none());
    }
}
