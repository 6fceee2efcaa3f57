//! Test doubles and common utilities for contract tests
//!
//! This module provides minimal test doubles that record how the engine
//! uses its collaborators.

#![allow(dead_code)]

use dnswatch_core::config::{MailConfig, MailMode, MonitorConfig};
use dnswatch_core::error::{Error, Result};
use dnswatch_core::traits::{AlertMessage, DomainResolver, IpSource, Notifier};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An IpSource returning a fixed answer
pub struct FixedIpSource {
    answer: std::result::Result<String, String>,
    call_count: Arc<AtomicUsize>,
}

impl FixedIpSource {
    /// Source that reports `ip`
    pub fn ok(ip: &str) -> Self {
        Self {
            answer: Ok(ip.to_string()),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Source that fails with a network error
    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Create a new FixedIpSource that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            answer: other.answer.clone(),
            call_count: Arc::clone(&other.call_count),
        }
    }
}

#[async_trait::async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.answer.clone().map_err(Error::ip_source)
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

/// A DomainResolver answering from a table; unknown names fail
#[derive(Default)]
pub struct TableResolver {
    table: HashMap<String, IpAddr>,
    lookups: std::sync::Mutex<Vec<String>>,
}

impl TableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an answer
    pub fn with(mut self, name: &str, ip: [u8; 4]) -> Self {
        self.table.insert(name.to_string(), IpAddr::from(ip));
        self
    }

    /// Names looked up so far, in order
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DomainResolver for TableResolver {
    async fn resolve(&self, name: &str) -> Result<IpAddr> {
        self.lookups.lock().unwrap().push(name.to_string());
        self.table
            .get(name)
            .copied()
            .ok_or_else(|| Error::resolution(format!("failed to lookup address information for {}", name)))
    }
}

/// A Notifier that records every alert
pub struct RecordingNotifier {
    sent: Arc<std::sync::Mutex<Vec<AlertMessage>>>,
    attempts: Arc<AtomicUsize>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(std::sync::Mutex::new(Vec::new())),
            attempts: Arc::new(AtomicUsize::new(0)),
            fail: false,
        }
    }

    /// Notifier whose transport always fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Number of send attempts, successful or not
    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Alerts delivered
    pub fn sent(&self) -> Vec<AlertMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Create a new RecordingNotifier that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            sent: Arc::clone(&other.sent),
            attempts: Arc::clone(&other.attempts),
            fail: other.fail,
        }
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send_alert(&self, alert: &AlertMessage) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::notifier("connection refused"));
        }
        self.sent.lock().unwrap().push(alert.clone());
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "recording"
    }
}

/// Helper to create a minimal MonitorConfig for testing
pub fn minimal_config(domains: &[&str]) -> MonitorConfig {
    MonitorConfig::new(
        domains.iter().map(|d| d.to_string()).collect(),
        MailConfig {
            sender: "monitor@example.com".to_string(),
            receiver: "ops@example.com".to_string(),
            host: "smtp.example.com".to_string(),
            port: 465,
            username: "monitor".to_string(),
            password: "test-password".to_string(),
            mode: MailMode::DryRun,
        },
    )
}

/// Fixed clock for deterministic runs
pub const T0: f64 = 1_729_170_000.0;
