//! Alert gate
//!
//! Enforces a minimum cooldown between two alert emails using the timestamp
//! held by an [`AlertStore`].
//!
//! ## Policy
//!
//! | Stored state            | Decision                                 |
//! |-------------------------|------------------------------------------|
//! | none                    | send                                     |
//! | timestamp `t`           | send iff `now - t >= cooldown`           |
//! | unreadable / corrupt    | send (fail open, warning logged)         |
//!
//! Recording a dispatch overwrites the timestamp. A failed write is logged
//! and leaves the previous value in place, so the next alert may pass early.
//!
//! The gate assumes runs never overlap: two concurrent processes may both
//! pass the gate before either records its dispatch.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::traits::AlertStore;

/// Current time as fractional seconds since the Unix epoch
pub fn now_unix() -> f64 {
    let now = chrono::Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0
}

/// Time-gated guard in front of alert dispatch
#[derive(Clone)]
pub struct AlertGate {
    store: Arc<dyn AlertStore>,
    cooldown: Duration,
}

impl AlertGate {
    /// Create a gate over a store with the given cooldown
    pub fn new(store: Arc<dyn AlertStore>, cooldown: Duration) -> Self {
        Self { store, cooldown }
    }

    /// Configured cooldown
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Whether an alert may be sent now
    pub async fn can_send_alert(&self) -> bool {
        self.can_send_alert_at(now_unix()).await
    }

    /// Whether an alert may be sent at `now` (seconds since the Unix epoch)
    pub async fn can_send_alert_at(&self, now: f64) -> bool {
        match self.store.load_last_sent().await {
            Ok(None) => {
                debug!("No previous alert recorded");
                true
            }
            Ok(Some(last_sent)) => {
                let elapsed = now - last_sent;
                let allowed = elapsed >= self.cooldown.as_secs_f64();
                debug!(
                    "Last alert {:.0}s ago, cooldown {}s, allowed: {}",
                    elapsed,
                    self.cooldown.as_secs(),
                    allowed
                );
                allowed
            }
            Err(e) => {
                warn!("Error while checking alert cooldown: {}", e);
                true
            }
        }
    }

    /// Record that an alert was dispatched now
    pub async fn record_alert_sent(&self) {
        self.record_alert_sent_at(now_unix()).await;
    }

    /// Record that an alert was dispatched at `now`
    pub async fn record_alert_sent_at(&self, now: f64) {
        if let Err(e) = self.store.store_last_sent(now).await {
            error!("Error while updating last alert time: {}", e);
        }
    }
}
