//! Error types for the dnswatch system
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for dnswatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the dnswatch system
#[derive(Error, Debug)]
pub enum Error {
    /// Public IP discovery errors
    #[error("IP source error: {0}")]
    IpSource(String),

    /// DNS resolution errors
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// Alert state store errors
    #[error("State store error: {0}")]
    StateStore(String),

    /// Alert notification errors
    #[error("Notifier error: {0}")]
    Notifier(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(String),
}

impl Error {
    /// Create an IP source error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Create a resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// Create a notifier error
    pub fn notifier(msg: impl Into<String>) -> Self {
        Self::Notifier(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }
}
