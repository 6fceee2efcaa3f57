// # Notifier Trait
//
// Defines the interface for dispatching an alert.
//
// ## Implementations
//
// - Dry run (log only): [`crate::notifier::DryRunNotifier`]
// - SMTP over implicit TLS: `dnswatch-notify-smtp` crate

use async_trait::async_trait;

use crate::checker::Anomaly;

/// Subject line of every alert
pub const ALERT_SUBJECT: &str = "Alert: anomalies detected on monitored domains";

/// Plain-text alert ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

impl AlertMessage {
    /// Compose the aggregate alert for a run
    ///
    /// One anomaly per body line, in detection order.
    pub fn from_anomalies(anomalies: &[Anomaly]) -> Self {
        let lines: Vec<String> = anomalies.iter().map(|a| a.to_string()).collect();

        Self {
            subject: ALERT_SUBJECT.to_string(),
            body: format!(
                "The following anomalies were detected:\n\n{}",
                lines.join("\n")
            ),
        }
    }
}

/// Trait for notifier implementations
///
/// # Trust Level: Untrusted
///
/// Notifiers talk to external mail infrastructure. They report failure by
/// returning an error; they never touch the alert gate. The engine only
/// records an alert as sent after `send_alert` returned `Ok`.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Dispatch an alert
    async fn send_alert(&self, alert: &AlertMessage) -> Result<(), crate::Error>;

    /// Notifier name for logging
    fn notifier_name(&self) -> &'static str;
}
