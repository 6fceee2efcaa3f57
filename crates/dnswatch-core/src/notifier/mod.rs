// # Dry-Run Notifier
//
// Composes the alert and logs it instead of transmitting it.
//
// This is the default transport. It reports success unconditionally, which
// means the alert gate is armed exactly as if a mail had gone out.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::Error;
use crate::config::MailConfig;
use crate::traits::{AlertMessage, Notifier};

/// Notifier that only logs what it would have sent
#[derive(Debug, Clone)]
pub struct DryRunNotifier {
    sender: String,
    receiver: String,
}

impl DryRunNotifier {
    /// Create a dry-run notifier for the given addressing
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
        }
    }

    /// Create from mail configuration
    pub fn from_config(config: &MailConfig) -> Self {
        Self::new(config.sender.clone(), config.receiver.clone())
    }
}

#[async_trait]
impl Notifier for DryRunNotifier {
    async fn send_alert(&self, alert: &AlertMessage) -> Result<(), Error> {
        info!("Email sent: {} -> {}", self.sender, self.receiver);
        debug!("Subject: {}", alert.subject);
        debug!("Body: {}", alert.body);
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "dry-run"
    }
}
