// # dnswatchd - DNS resolution check
//
// One invocation performs one monitoring pass and exits. Scheduling is left
// to cron or a systemd timer. Invocations must not overlap: neither the log
// file nor the alert state file is locked.
//
// The binary is responsible for:
// 1. Loading `.env.local` and reading configuration from the environment
// 2. Validating configuration before doing any I/O
// 3. Installing the log file subscriber
// 4. Wiring the IP source, resolver, alert store and notifier
// 5. Running the pass and mapping the outcome to an exit code
//
// ## Configuration
//
// ### Monitoring
// - `DOMAINS`: Comma-separated list of domains (required)
// - `DNSWATCH_IP_URL`: IP echo service (default: api64.ipify.org)
// - `DNSWATCH_HTTP_TIMEOUT_SECS`: Request timeout (default: 10)
//
// ### Mail
// - `EMAIL_SENDER`, `EMAIL_RECIEVER` (or `EMAIL_RECEIVER`)
// - `EMAIL_HOST`, `EMAIL_PORT`, `EMAIL_USER`, `EMAIL_PASS`
// - `DNSWATCH_MAIL_MODE`: `dry-run` (default) or `smtp`
//
// ### Files
// - `DNSWATCH_ENV_FILE`: dotenv file to load (default: .env.local)
// - `DNSWATCH_LOG_FILE`: Log file (default: monitoring.log)
// - `DNSWATCH_STATE_FILE`: Alert state file (default: last_mail_time.txt)
//
// ### Alerting
// - `DNSWATCH_ALERT_COOLDOWN_SECS`: Minimum interval between alerts (default: 9000)
// - `DNSWATCH_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export DOMAINS=example.com,www.example.com
// export EMAIL_SENDER=monitor@example.com
// export EMAIL_RECIEVER=ops@example.com
// export EMAIL_HOST=smtp.example.com
// export EMAIL_PORT=465
// export EMAIL_USER=monitor
// export EMAIL_PASS=secret
//
// dnswatchd
// ```

mod logging;

use anyhow::Result;
use dnswatch_core::config::{
    DEFAULT_ALERT_COOLDOWN_SECS, DEFAULT_IP_URL, DEFAULT_LOG_FILE, DEFAULT_STATE_FILE,
};
use dnswatch_core::{
    AlertOutcome, DryRunNotifier, FileAlertStore, MailConfig, MailMode, MonitorConfig,
    MonitorEngine, Notifier, SystemResolver,
};
use dnswatch_ip_http::{DEFAULT_TIMEOUT_SECS, HttpIpSource};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, debug, error, info};

/// Default dotenv file
const DEFAULT_ENV_FILE: &str = ".env.local";

/// Exit codes for different termination scenarios
///
/// - 0: Pass completed (including "server IP unavailable", which is logged)
/// - 1: Configuration error
/// - 2: Runtime setup error (log file, runtime, transport)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchExitCode {
    /// Pass completed
    Completed = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<WatchExitCode> for ExitCode {
    fn from(code: WatchExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    domains: Vec<String>,
    ip_url: String,
    http_timeout_secs: u64,
    mail: MailConfig,
    log_file: PathBuf,
    state_file: PathBuf,
    alert_cooldown_secs: u64,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("{} is required. Set it via: export {}=...", key, key))
        };

        let domains = MonitorConfig::parse_domain_list(&required("DOMAINS")?);

        let port_raw = required("EMAIL_PORT")?;
        let port: u16 = port_raw.trim().parse().map_err(|_| {
            anyhow::anyhow!("EMAIL_PORT must be a port number (1-65535). Got: {}", port_raw)
        })?;

        let receiver = match lookup("EMAIL_RECIEVER").filter(|v| !v.trim().is_empty()) {
            Some(receiver) => receiver,
            None => required("EMAIL_RECEIVER").map_err(|_| {
                anyhow::anyhow!(
                    "EMAIL_RECIEVER is required. Set it via: export EMAIL_RECIEVER=..."
                )
            })?,
        };

        let mode = match lookup("DNSWATCH_MAIL_MODE") {
            Some(name) => MailMode::from_name(&name)?,
            None => MailMode::default(),
        };

        let mail = MailConfig {
            sender: required("EMAIL_SENDER")?.trim().to_string(),
            receiver: receiver.trim().to_string(),
            host: required("EMAIL_HOST")?.trim().to_string(),
            port,
            username: required("EMAIL_USER")?,
            password: lookup("EMAIL_PASS").unwrap_or_default(),
            mode,
        };

        Ok(Self {
            domains,
            ip_url: lookup("DNSWATCH_IP_URL").unwrap_or_else(|| DEFAULT_IP_URL.to_string()),
            http_timeout_secs: parse_u64(&lookup, "DNSWATCH_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            mail,
            log_file: lookup("DNSWATCH_LOG_FILE")
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
                .into(),
            state_file: lookup("DNSWATCH_STATE_FILE")
                .unwrap_or_else(|| DEFAULT_STATE_FILE.to_string())
                .into(),
            alert_cooldown_secs: parse_u64(
                &lookup,
                "DNSWATCH_ALERT_COOLDOWN_SECS",
                DEFAULT_ALERT_COOLDOWN_SECS,
            )?,
            log_level: lookup("DNSWATCH_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.monitor_config().validate()?;

        if !self.ip_url.starts_with("https://") && !self.ip_url.starts_with("http://") {
            anyhow::bail!(
                "DNSWATCH_IP_URL must use HTTP or HTTPS scheme. Got: {}",
                self.ip_url
            );
        }

        if !(1..=300).contains(&self.http_timeout_secs) {
            anyhow::bail!(
                "DNSWATCH_HTTP_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                self.http_timeout_secs
            );
        }

        if self.log_file.as_os_str().is_empty() {
            anyhow::bail!("DNSWATCH_LOG_FILE cannot be empty");
        }

        if self.state_file.as_os_str().is_empty() {
            anyhow::bail!("DNSWATCH_STATE_FILE cannot be empty");
        }

        if cfg!(not(feature = "smtp")) && self.mail.mode == MailMode::Smtp {
            anyhow::bail!(
                "DNSWATCH_MAIL_MODE=smtp requires dnswatchd to be built with the 'smtp' feature"
            );
        }

        self.level()?;

        Ok(())
    }

    /// Parsed log level
    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "DNSWATCH_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }

    /// Core engine configuration
    fn monitor_config(&self) -> MonitorConfig {
        let mut config = MonitorConfig::new(self.domains.clone(), self.mail.clone());
        config.alert.cooldown_secs = self.alert_cooldown_secs;
        config
    }
}

/// Parse an optional numeric variable
fn parse_u64<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer. Got: {}", key, raw)),
        None => Ok(default),
    }
}

/// Load the dotenv file, if any
///
/// Variables already present in the environment take precedence.
fn load_env_file() -> Result<()> {
    let path = env::var("DNSWATCH_ENV_FILE").unwrap_or_else(|_| DEFAULT_ENV_FILE.to_string());

    match dotenvy::from_filename(&path) {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(anyhow::anyhow!("Failed to load {}: {}", path, e)),
    }
}

fn main() -> ExitCode {
    if let Err(e) = load_env_file() {
        eprintln!("Configuration error: {}", e);
        return WatchExitCode::ConfigError.into();
    }

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return WatchExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return WatchExitCode::ConfigError.into();
    }

    let level = config.level().unwrap_or(Level::INFO);
    if let Err(e) = logging::init(&config.log_file, level) {
        eprintln!("{}", e);
        return WatchExitCode::RuntimeError.into();
    }

    info!(
        "Starting dnswatchd: {} domain(s), mail mode {}",
        config.domains.len(),
        config.mail.mode.name()
    );

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return WatchExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_check(config).await {
            error!("Run error: {}", e);
            WatchExitCode::RuntimeError
        } else {
            WatchExitCode::Completed
        }
    });

    result.into()
}

/// Build the configured notifier
fn build_notifier(mail: &MailConfig) -> Result<Box<dyn Notifier>> {
    match mail.mode {
        MailMode::DryRun => Ok(Box::new(DryRunNotifier::from_config(mail))),
        #[cfg(feature = "smtp")]
        MailMode::Smtp => Ok(Box::new(
            dnswatch_notify_smtp::SmtpNotifier::from_config(mail)?,
        )),
        #[cfg(not(feature = "smtp"))]
        MailMode::Smtp => anyhow::bail!("SMTP support not compiled in"),
    }
}

/// Run one monitoring pass
async fn run_check(config: Config) -> Result<()> {
    let ip_source = HttpIpSource::new(
        config.ip_url.clone(),
        Duration::from_secs(config.http_timeout_secs),
    )?;
    let notifier = build_notifier(&config.mail)?;
    let alert_store = Arc::new(FileAlertStore::new(&config.state_file));

    let engine = MonitorEngine::new(
        Box::new(ip_source),
        Arc::new(SystemResolver::new()),
        alert_store.clone(),
        notifier,
        config.monitor_config(),
    )?;

    debug!(
        "Checking {} domain(s), alert state in {}",
        engine.domains().len(),
        alert_store.path().display()
    );

    match engine.run_once().await {
        Ok(report) => {
            let outcome = match &report.alert {
                AlertOutcome::NotNeeded => "none needed",
                AlertOutcome::Sent => "sent",
                AlertOutcome::Suppressed => "suppressed (cooldown)",
                AlertOutcome::Failed(_) => "failed",
            };
            info!(
                "Check finished: {} domain(s), {} anomaly(ies), alert {}",
                report.checks.len(),
                report.anomalies.len(),
                outcome
            );
            Ok(())
        }
        // Already logged by the engine; nothing to compare against
        Err(dnswatch_core::Error::IpSource(_)) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn base_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DOMAINS", "a.example, b.example"),
            ("EMAIL_SENDER", "monitor@example.com"),
            ("EMAIL_RECIEVER", "ops@example.com"),
            ("EMAIL_HOST", "smtp.example.com"),
            ("EMAIL_PORT", "465"),
            ("EMAIL_USER", "monitor"),
            ("EMAIL_PASS", "secret"),
        ]
    }

    fn without(key: &str) -> Vec<(&'static str, &'static str)> {
        base_env().into_iter().filter(|(k, _)| *k != key).collect()
    }

    fn with(key: &'static str, value: &'static str) -> Vec<(&'static str, &'static str)> {
        let mut env = without(key);
        env.push((key, value));
        env
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&base_env())).unwrap();
        config.validate().unwrap();

        assert_eq!(config.domains, vec!["a.example", "b.example"]);
        assert_eq!(config.ip_url, DEFAULT_IP_URL);
        assert_eq!(config.log_file, PathBuf::from("monitoring.log"));
        assert_eq!(config.state_file, PathBuf::from("last_mail_time.txt"));
        assert_eq!(config.alert_cooldown_secs, 9000);
        assert_eq!(config.mail.mode, MailMode::DryRun);
        assert_eq!(config.mail.port, 465);
        assert_eq!(config.level().unwrap(), Level::INFO);
    }

    #[test]
    fn test_missing_required_variable_fails_fast() {
        for key in ["DOMAINS", "EMAIL_SENDER", "EMAIL_HOST", "EMAIL_PORT", "EMAIL_USER"] {
            let err = Config::from_lookup(lookup_from(&without(key))).unwrap_err();
            assert!(err.to_string().contains(key), "{}: {}", key, err);
        }

        let err = Config::from_lookup(lookup_from(&without("EMAIL_RECIEVER"))).unwrap_err();
        assert!(err.to_string().contains("EMAIL_RECIEVER"));
    }

    #[test]
    fn test_receiver_fallback_spelling() {
        let mut env = without("EMAIL_RECIEVER");
        env.push(("EMAIL_RECEIVER", "oncall@example.com"));

        let config = Config::from_lookup(lookup_from(&env)).unwrap();
        assert_eq!(config.mail.receiver, "oncall@example.com");
    }

    #[test]
    fn test_non_numeric_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&with("EMAIL_PORT", "smtps"))).unwrap_err();
        assert!(err.to_string().contains("EMAIL_PORT"));
    }

    #[test]
    fn test_invalid_domain_fails_validation() {
        let config = Config::from_lookup(lookup_from(&with("DOMAINS", "ok.example,bad..example")))
            .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_domain_list_is_missing() {
        assert!(Config::from_lookup(lookup_from(&with("DOMAINS", "  "))).is_err());

        let config = Config::from_lookup(lookup_from(&with("DOMAINS", ",,"))).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let mut env = base_env();
        env.extend([
            ("DNSWATCH_ALERT_COOLDOWN_SECS", "60"),
            ("DNSWATCH_LOG_LEVEL", "debug"),
            ("DNSWATCH_IP_URL", "https://ifconfig.me/ip"),
            ("DNSWATCH_STATE_FILE", "/var/lib/dnswatch/last_mail_time.txt"),
        ]);

        let config = Config::from_lookup(lookup_from(&env)).unwrap();
        config.validate().unwrap();

        assert_eq!(config.monitor_config().alert.cooldown_secs, 60);
        assert_eq!(config.level().unwrap(), Level::DEBUG);
        assert_eq!(config.ip_url, "https://ifconfig.me/ip");
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = Config::from_lookup(lookup_from(&with("DNSWATCH_LOG_LEVEL", "loud"))).unwrap();
        assert!(config.validate().is_err());

        let config =
            Config::from_lookup(lookup_from(&with("DNSWATCH_IP_URL", "ftp://example.com"))).unwrap();
        assert!(config.validate().is_err());

        let config =
            Config::from_lookup(lookup_from(&with("DNSWATCH_HTTP_TIMEOUT_SECS", "0"))).unwrap();
        assert!(config.validate().is_err());

        assert!(Config::from_lookup(lookup_from(&with("DNSWATCH_MAIL_MODE", "fax"))).is_err());
    }

    #[test]
    fn test_dry_run_notifier_is_default() {
        let config = Config::from_lookup(lookup_from(&base_env())).unwrap();
        let notifier = build_notifier(&config.mail).unwrap();
        assert_eq!(notifier.notifier_name(), "dry-run");
    }

    #[cfg(feature = "smtp")]
    #[test]
    fn test_smtp_mode_builds_smtp_notifier() {
        let config = Config::from_lookup(lookup_from(&with("DNSWATCH_MAIL_MODE", "smtp"))).unwrap();
        config.validate().unwrap();

        let notifier = build_notifier(&config.mail).unwrap();
        assert_eq!(notifier.notifier_name(), "smtp");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(WatchExitCode::Completed as u8, 0);
        assert_eq!(WatchExitCode::ConfigError as u8, 1);
        assert_eq!(WatchExitCode::RuntimeError as u8, 2);
    }
}
