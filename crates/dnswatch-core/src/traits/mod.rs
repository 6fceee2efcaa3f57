//! Core traits for the dnswatch system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpSource`]: Discover the server's public IP
//! - [`DomainResolver`]: Forward DNS lookups
//! - [`AlertStore`]: Persisted last-alert timestamp
//! - [`Notifier`]: Alert dispatch

pub mod alert_store;
pub mod ip_source;
pub mod notifier;
pub mod resolver;

pub use alert_store::AlertStore;
pub use ip_source::IpSource;
pub use notifier::{AlertMessage, Notifier};
pub use resolver::DomainResolver;
