// # SMTP Notifier
//
// This crate provides the SMTP transport for dnswatch alerts.
//
// ## Behavior
//
// - One plain-text message per alert, from the configured sender to the
//   configured receiver
// - Implicit TLS (SMTPS) to the configured host and port, then
//   AUTH with username/password
// - One connection per alert; no pooling, no retries
//
// ## Security Requirements
//
// - The SMTP password NEVER appears in logs or Debug output
// - Addresses are parsed at construction so bad configuration fails at
//   startup rather than at the first anomaly

use async_trait::async_trait;
use dnswatch_core::config::MailConfig;
use dnswatch_core::traits::{AlertMessage, Notifier};
use dnswatch_core::{Error, Result};
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

/// Default SMTP command timeout
const DEFAULT_SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// SMTP notifier
///
/// The Debug implementation intentionally does NOT expose credentials.
pub struct SmtpNotifier {
    /// From mailbox
    sender: Mailbox,

    /// To mailbox
    receiver: Mailbox,

    /// Host, for logging
    host: String,

    /// Port, for logging
    port: u16,

    /// Configured transport
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("sender", &self.sender.to_string())
            .field("receiver", &self.receiver.to_string())
            .field("host", &self.host)
            .field("port", &self.port)
            .field("credentials", &"<REDACTED>")
            .finish()
    }
}

impl SmtpNotifier {
    /// Create an SMTP notifier from mail configuration
    ///
    /// Fails if either address cannot be parsed or the TLS transport cannot
    /// be set up for `host`.
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        let sender: Mailbox = config.sender.parse().map_err(|e| {
            Error::config(format!("Invalid sender address '{}': {}", config.sender, e))
        })?;

        let receiver: Mailbox = config.receiver.parse().map_err(|e| {
            Error::config(format!(
                "Invalid receiver address '{}': {}",
                config.receiver, e
            ))
        })?;

        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| {
                Error::notifier(format!(
                    "Failed to set up SMTP transport for {}: {}",
                    config.host, e
                ))
            })?
            .port(config.port)
            .credentials(credentials)
            .timeout(Some(DEFAULT_SMTP_TIMEOUT))
            .build();

        Ok(Self {
            sender,
            receiver,
            host: config.host.clone(),
            port: config.port,
            transport,
        })
    }

    /// Build the RFC 5322 message for an alert
    fn build_message(&self, alert: &AlertMessage) -> Result<Message> {
        Message::builder()
            .from(self.sender.clone())
            .to(self.receiver.clone())
            .subject(alert.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(alert.body.clone())
            .map_err(|e| Error::notifier(format!("Failed to build message: {}", e)))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_alert(&self, alert: &AlertMessage) -> Result<()> {
        let message = self.build_message(alert)?;

        tracing::debug!(
            "Sending alert via {}:{} ({} -> {})",
            self.host,
            self.port,
            self.sender,
            self.receiver
        );

        self.transport
            .send(message)
            .await
            .map_err(|e| Error::notifier(format!("SMTP delivery failed: {}", e)))?;

        tracing::info!("Email sent: {} -> {}", self.sender, self.receiver);
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "smtp"
    }
}
