// # dnswatch-core
//
// Core library for the dnswatch domain resolution monitor.
//
// ## Architecture Overview
//
// This library provides the core functionality for a single monitoring pass:
// - **IpSource**: Trait for discovering the server's public IP
// - **DomainResolver**: Trait for forward DNS lookups
// - **AlertStore**: Trait for the persisted last-alert timestamp
// - **Notifier**: Trait for alert dispatch
// - **AlertGate**: Cooldown between alerts, failing open on store errors
// - **MonitorEngine**: Orchestrates IP discovery → checks → alert
//
// ## Design Principles
//
// 1. **Explicit results**: every step returns a `Result`; the engine decides
//    whether to continue or abort
// 2. **Single pass**: no loop, no scheduler; the host invokes a run
// 3. **Narrow state**: one timestamp is the only state between runs
// 4. **Library-First**: the daemon is a thin wrapper over this crate

pub mod checker;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod notifier;
pub mod resolver;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use checker::{Anomaly, AnomalyKind, CheckResult, DomainCheck, DomainChecker};
pub use config::{AlertConfig, MailConfig, MailMode, MonitorConfig};
pub use engine::{AlertOutcome, MonitorEngine, RunReport};
pub use error::{Error, Result};
pub use gate::AlertGate;
pub use notifier::DryRunNotifier;
pub use resolver::SystemResolver;
pub use state::{FileAlertStore, MemoryAlertStore};
pub use traits::{AlertMessage, AlertStore, DomainResolver, IpSource, Notifier};
