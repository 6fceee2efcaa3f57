//! Configuration types for the dnswatch system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::Deserialize;
use std::fmt;

/// Default public IP echo service
pub const DEFAULT_IP_URL: &str = "https://api64.ipify.org?format=text";

/// Default minimum interval between two alert emails (2h30)
pub const DEFAULT_ALERT_COOLDOWN_SECS: u64 = 9000;

/// Default log file, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "monitoring.log";

/// Default alert state file, relative to the working directory
pub const DEFAULT_STATE_FILE: &str = "last_mail_time.txt";

/// Main monitor configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Domains expected to resolve to the server's public IP
    pub domains: Vec<String>,

    /// Mail settings for alerts
    pub mail: MailConfig,

    /// Alert throttling settings
    #[serde(default)]
    pub alert: AlertConfig,
}

impl MonitorConfig {
    /// Create a new configuration
    pub fn new(domains: Vec<String>, mail: MailConfig) -> Self {
        Self {
            domains,
            mail,
            alert: AlertConfig::default(),
        }
    }

    /// Build the domain list from a comma-separated string
    ///
    /// Entries are trimmed and empty entries are dropped.
    pub fn parse_domain_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.domains.is_empty() {
            return Err(crate::Error::config("No domains configured"));
        }

        for domain in &self.domains {
            validate_domain_name(domain)?;
        }

        self.mail.validate()?;

        Ok(())
    }
}

/// Validate that a string is a plausible DNS hostname
///
/// Basic RFC 1035 checks: total length, label length, characters, hyphens.
/// A single trailing dot (fully qualified form) is accepted.
pub fn validate_domain_name(domain: &str) -> Result<(), crate::Error> {
    let name = domain.strip_suffix('.').unwrap_or(domain);

    if name.is_empty() {
        return Err(crate::Error::config("Domain name cannot be empty"));
    }

    if name.len() > 253 {
        return Err(crate::Error::config(format!(
            "Domain name too long: {} chars (max 253). Got: {}",
            name.len(),
            domain
        )));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "Domain name has empty label: '{}'",
                domain
            )));
        }

        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
            return Err(crate::Error::config(format!(
                "Domain label contains invalid characters. Label: '{}'",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

/// How alerts leave the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MailMode {
    /// Compose and log the alert without transmitting it
    #[default]
    DryRun,
    /// Transmit over SMTP with implicit TLS
    Smtp,
}

impl MailMode {
    /// Parse the mode from its configuration name
    pub fn from_name(name: &str) -> Result<Self, crate::Error> {
        match name.trim().to_lowercase().as_str() {
            "dry-run" | "dryrun" | "dry_run" => Ok(MailMode::DryRun),
            "smtp" => Ok(MailMode::Smtp),
            other => Err(crate::Error::config(format!(
                "Mail mode '{}' is not supported. Supported modes: dry-run, smtp",
                other
            ))),
        }
    }

    /// Configuration name of the mode
    pub fn name(&self) -> &'static str {
        match self {
            MailMode::DryRun => "dry-run",
            MailMode::Smtp => "smtp",
        }
    }
}

/// SMTP endpoint, credentials and addressing for alerts
#[derive(Clone, Deserialize)]
pub struct MailConfig {
    /// From address
    pub sender: String,
    /// To address
    pub receiver: String,
    /// SMTP host
    pub host: String,
    /// SMTP port (implicit TLS)
    pub port: u16,
    /// SMTP username
    pub username: String,
    /// SMTP password
    pub password: String,
    /// Transport mode
    #[serde(default)]
    pub mode: MailMode,
}

impl MailConfig {
    /// Validate the mail configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        for (name, value) in [
            ("sender", &self.sender),
            ("receiver", &self.receiver),
            ("host", &self.host),
            ("username", &self.username),
        ] {
            if value.trim().is_empty() {
                return Err(crate::Error::config(format!("Mail {} cannot be empty", name)));
            }
        }

        for (name, value) in [("sender", &self.sender), ("receiver", &self.receiver)] {
            if !value.contains('@') {
                return Err(crate::Error::config(format!(
                    "Mail {} is not an email address: '{}'",
                    name, value
                )));
            }
        }

        if self.port == 0 {
            return Err(crate::Error::config("Mail port must be > 0"));
        }

        if self.mode == MailMode::Smtp && self.password.is_empty() {
            return Err(crate::Error::config(
                "Mail password is required when mail mode is smtp",
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("sender", &self.sender)
            .field("receiver", &self.receiver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("mode", &self.mode)
            .finish()
    }
}

/// Alert throttling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    /// Minimum interval between alert emails (in seconds)
    ///
    /// Set to 0 to disable throttling.
    #[serde(default = "default_alert_cooldown_secs")]
    pub cooldown_secs: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_alert_cooldown_secs(),
        }
    }
}

fn default_alert_cooldown_secs() -> u64 {
    DEFAULT_ALERT_COOLDOWN_SECS
}
