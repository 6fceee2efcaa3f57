// # Memory Alert Store
//
// In-memory implementation of AlertStore.
//
// ## Purpose
//
// Holds the last-alert timestamp for the lifetime of the process only.
// Useful for testing and for embedding the engine in a long-running host
// that keeps its own state.
//
// ## Crash Behavior
//
// - The timestamp is lost on exit
// - The first anomaly after a restart always passes the gate

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::AlertStore;

/// In-memory alert store implementation
///
/// Clones share the same underlying value.
///
/// # Example
///
/// ```rust,no_run
/// use dnswatch_core::state::MemoryAlertStore;
/// use dnswatch_core::traits::AlertStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryAlertStore::new();
///     assert_eq!(store.load_last_sent().await?, None);
///
///     store.store_last_sent(1_729_170_000.0).await?;
///     assert_eq!(store.load_last_sent().await?, Some(1_729_170_000.0));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryAlertStore {
    inner: Arc<RwLock<Option<f64>>>,
}

impl MemoryAlertStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a timestamp
    pub fn with_last_sent(timestamp: f64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(timestamp))),
        }
    }
}

#[async_trait]
impl AlertStore for MemoryAlertStore {
    async fn load_last_sent(&self) -> Result<Option<f64>, Error> {
        Ok(*self.inner.read().await)
    }

    async fn store_last_sent(&self, timestamp: f64) -> Result<(), Error> {
        *self.inner.write().await = Some(timestamp);
        Ok(())
    }
}
