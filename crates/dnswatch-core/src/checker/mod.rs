//! Domain checker
//!
//! Resolves each configured domain and classifies it against the server's
//! public IP.
//!
//! ## Comparison Policy
//!
//! A domain is anomalous when its lookup fails or when the first resolved
//! address, rendered as text, differs from the server IP string. There is no
//! normalization between IPv4 and IPv6 forms and no subnet matching.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::traits::DomainResolver;

/// Outcome of checking one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    /// Domain resolves to the server IP
    Matched {
        ip: IpAddr,
    },

    /// Domain resolves somewhere else
    Mismatched {
        expected: String,
        actual: IpAddr,
    },

    /// Lookup failed
    ResolutionFailed {
        error: String,
    },
}

impl CheckResult {
    /// Whether this result must be reported
    pub fn is_anomaly(&self) -> bool {
        !matches!(self, CheckResult::Matched { .. })
    }
}

/// A domain paired with its check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCheck {
    pub domain: String,
    pub result: CheckResult,
}

impl DomainCheck {
    /// The anomaly for this check, if any
    pub fn anomaly(&self) -> Option<Anomaly> {
        let kind = match &self.result {
            CheckResult::Matched { .. } => return None,
            CheckResult::Mismatched { expected, actual } => AnomalyKind::Mismatch {
                server_ip: expected.clone(),
                domain_ip: *actual,
            },
            CheckResult::ResolutionFailed { error } => AnomalyKind::ResolutionFailed {
                error: error.clone(),
            },
        };

        Some(Anomaly {
            domain: self.domain.clone(),
            kind,
        })
    }
}

/// What went wrong for an anomalous domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnomalyKind {
    Mismatch { server_ip: String, domain_ip: IpAddr },
    ResolutionFailed { error: String },
}

/// Human-readable anomaly record, one line of the alert body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anomaly {
    pub domain: String,
    pub kind: AnomalyKind,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AnomalyKind::Mismatch {
                server_ip,
                domain_ip,
            } => write!(
                f,
                "{}: server IP ({}) != domain IP ({})",
                self.domain, server_ip, domain_ip
            ),
            AnomalyKind::ResolutionFailed { error } => {
                write!(f, "{}: {}", self.domain, error)
            }
        }
    }
}

/// Collect the anomalies of a checking pass, in check order
pub fn anomalies(checks: &[DomainCheck]) -> Vec<Anomaly> {
    checks.iter().filter_map(DomainCheck::anomaly).collect()
}

/// Resolves domains and classifies them against the server IP
#[derive(Clone)]
pub struct DomainChecker {
    resolver: Arc<dyn DomainResolver>,
}

impl DomainChecker {
    /// Create a checker over a resolver
    pub fn new(resolver: Arc<dyn DomainResolver>) -> Self {
        Self { resolver }
    }

    /// Check a single domain
    pub async fn check(&self, domain: &str, server_ip: &str) -> CheckResult {
        match self.resolver.resolve(domain).await {
            Ok(ip) if ip.to_string() == server_ip => CheckResult::Matched { ip },
            Ok(ip) => CheckResult::Mismatched {
                expected: server_ip.to_string(),
                actual: ip,
            },
            Err(e) => CheckResult::ResolutionFailed {
                error: e.to_string(),
            },
        }
    }

    /// Check every domain sequentially, logging each result
    ///
    /// A failed lookup never prevents the remaining domains from being checked.
    pub async fn check_all(&self, domains: &[String], server_ip: &str) -> Vec<DomainCheck> {
        let mut checks = Vec::with_capacity(domains.len());

        for domain in domains {
            let result = self.check(domain, server_ip).await;

            match &result {
                CheckResult::Matched { ip } => {
                    info!("{} - OK (IP: {})", domain, ip);
                }
                CheckResult::Mismatched { expected, actual } => {
                    warn!(
                        "{} - IP differs (server: {}, domain: {})",
                        domain, expected, actual
                    );
                }
                CheckResult::ResolutionFailed { error } => {
                    warn!("{} - {}", domain, error);
                }
            }

            checks.push(DomainCheck {
                domain: domain.clone(),
                result,
            });
        }

        checks
    }
}
