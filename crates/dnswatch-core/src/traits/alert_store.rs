// # Alert Store Trait
//
// Defines the persisted state behind the alert gate.
//
// ## Purpose
//
// The store holds a single record: the Unix time (seconds, fractional) at
// which the last alert was dispatched. It is the only state carried from one
// run to the next.
//
// ## Implementations
//
// - File-based: one decimal line, see [`crate::state::FileAlertStore`]
// - In-memory: [`crate::state::MemoryAlertStore`]
//
// ## Usage
//
// ```rust,ignore
// use dnswatch_core::AlertStore;
//
// let last = store.load_last_sent().await?;
// store.store_last_sent(1_729_170_000.0).await?;
// ```

use async_trait::async_trait;

/// Trait for alert state store implementations
///
/// The store has no policy of its own. Deciding whether an alert may be sent,
/// and what to do when the store fails, belongs to [`crate::AlertGate`].
///
/// # Concurrency
///
/// Runs are assumed never to overlap. Implementations do not lock across
/// processes.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Read the last-alert timestamp
    ///
    /// # Returns
    ///
    /// - `Ok(Some(f64))`: Seconds since the Unix epoch
    /// - `Ok(None)`: No alert was ever recorded
    /// - `Err(Error)`: Storage unreadable or content corrupt
    async fn load_last_sent(&self) -> Result<Option<f64>, crate::Error>;

    /// Overwrite the last-alert timestamp
    async fn store_last_sent(&self, timestamp: f64) -> Result<(), crate::Error>;
}
