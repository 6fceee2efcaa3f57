//! Core monitor engine
//!
//! The MonitorEngine is responsible for one monitoring pass:
//! - Discovering the server's public IP via IpSource
//! - Checking every configured domain via DomainChecker
//! - Deciding on an alert via AlertGate
//! - Dispatching the alert via Notifier
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  IpSource   │─── server IP ───┐
//! └─────────────┘                 │
//!                                 ▼
//!                        ┌────────────────┐
//!                        │ MonitorEngine  │
//!                        └────────────────┘
//!                                 │
//!         ┌───────────────────────┼───────────────────────┐
//!         │                       │                       │
//!         ▼                       ▼                       ▼
//! ┌───────────────┐       ┌──────────────┐        ┌─────────────┐
//! │ DomainChecker │       │  AlertGate   │        │  Notifier   │
//! │ (classify)    │       │  (cooldown)  │        │  (dispatch) │
//! └───────────────┘       └──────────────┘        └─────────────┘
//! ```
//!
//! ## Run Flow
//!
//! 1. Resolve server IP; abort the run if unavailable
//! 2. Check each domain, logging each result
//! 3. Anomalies and gate open: dispatch one aggregate alert, arm the gate
//! 4. Anomalies and gate closed: log that the cooldown is active
//! 5. No anomalies: log it

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::checker::{self, Anomaly, DomainCheck, DomainChecker};
use crate::config::MonitorConfig;
use crate::error::{Error, Result};
use crate::gate::{AlertGate, now_unix};
use crate::traits::{AlertMessage, AlertStore, DomainResolver, IpSource, Notifier};

/// What happened to the alert during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    /// No anomalies, nothing to send
    NotNeeded,
    /// Alert dispatched and gate armed
    Sent,
    /// Anomalies found but cooldown still active
    Suppressed,
    /// Dispatch attempted and failed; gate left untouched
    Failed(String),
}

/// Summary of one monitoring pass
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Public IP used as baseline
    pub server_ip: String,
    /// Per-domain results, in configuration order
    pub checks: Vec<DomainCheck>,
    /// Anomalies, in configuration order
    pub anomalies: Vec<Anomaly>,
    /// Alert decision
    pub alert: AlertOutcome,
}

impl RunReport {
    /// Whether any domain was anomalous
    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }
}

/// Core monitor engine
///
/// One engine performs any number of independent passes; the only state
/// carried between passes lives in the alert store.
pub struct MonitorEngine {
    /// Public IP discovery
    ip_source: Box<dyn IpSource>,

    /// Domain classification
    checker: DomainChecker,

    /// Cooldown guard
    gate: AlertGate,

    /// Alert dispatch
    notifier: Box<dyn Notifier>,

    /// Domains to check
    domains: Vec<String>,
}

impl MonitorEngine {
    /// Create a new monitor engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `resolver`: DNS resolver implementation
    /// - `alert_store`: persisted last-alert timestamp
    /// - `notifier`: alert transport
    /// - `config`: validated before use
    pub fn new(
        ip_source: Box<dyn IpSource>,
        resolver: Arc<dyn DomainResolver>,
        alert_store: Arc<dyn AlertStore>,
        notifier: Box<dyn Notifier>,
        config: MonitorConfig,
    ) -> Result<Self> {
        config.validate()?;

        let gate = AlertGate::new(
            alert_store,
            Duration::from_secs(config.alert.cooldown_secs),
        );

        Ok(Self {
            ip_source,
            checker: DomainChecker::new(resolver),
            gate,
            notifier,
            domains: config.domains,
        })
    }

    /// Domains checked by this engine
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Run one monitoring pass
    ///
    /// # Returns
    ///
    /// - `Ok(RunReport)`: Pass completed (whatever was found)
    /// - `Err(Error::IpSource)`: No baseline IP; nothing was checked
    pub async fn run_once(&self) -> Result<RunReport> {
        self.run_once_at(now_unix()).await
    }

    /// Run one monitoring pass with an explicit clock (seconds since epoch)
    pub async fn run_once_at(&self, now: f64) -> Result<RunReport> {
        let server_ip = match self.ip_source.current().await {
            Ok(ip) => ip,
            Err(e) => {
                error!(
                    "Error while retrieving server IP from {}: {}",
                    self.ip_source.source_name(),
                    e
                );
                error!("Unable to retrieve server IP.");
                return Err(match e {
                    Error::IpSource(_) => e,
                    other => Error::ip_source(other.to_string()),
                });
            }
        };

        info!("Server IP: {}", server_ip);

        let checks = self.checker.check_all(&self.domains, &server_ip).await;
        let anomalies = checker::anomalies(&checks);

        let alert = self.handle_anomalies(&anomalies, now).await;

        Ok(RunReport {
            server_ip,
            checks,
            anomalies,
            alert,
        })
    }

    /// Decide on and dispatch the alert for a run
    async fn handle_anomalies(&self, anomalies: &[Anomaly], now: f64) -> AlertOutcome {
        if anomalies.is_empty() {
            info!("No anomaly detected.");
            return AlertOutcome::NotNeeded;
        }

        if !self.gate.can_send_alert_at(now).await {
            debug!(
                "Alert suppressed, cooldown is {}s",
                self.gate.cooldown().as_secs()
            );
            info!("Anomalies detected, but alert cooldown still active.");
            return AlertOutcome::Suppressed;
        }

        let message = AlertMessage::from_anomalies(anomalies);

        match self.notifier.send_alert(&message).await {
            Ok(()) => {
                let listed: Vec<String> = anomalies.iter().map(|a| a.to_string()).collect();
                info!("Alert sent with anomalies: {:?}", listed);
                self.gate.record_alert_sent_at(now).await;
                AlertOutcome::Sent
            }
            Err(e) => {
                warn!(
                    "Error while sending alert via {}: {}",
                    self.notifier.notifier_name(),
                    e
                );
                AlertOutcome::Failed(e.to_string())
            }
        }
    }
}
