// # HTTP IP Source
//
// This crate provides an HTTP-based public IP source for dnswatch.
//
// ## Architecture
//
// One GET to an IP echo service (default: api64.ipify.org in text mode)
// per call. The response body, trimmed, is the server's public IP. No
// caching and no retries: each run asks once.

use dnswatch_core::config::DEFAULT_IP_URL;
use dnswatch_core::traits::IpSource;
use dnswatch_core::{Error, Result};

use std::net::IpAddr;
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP-based IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL returning the caller's IP as plain text
    /// - `timeout`: Whole-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dnswatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create a source for the default echo service
    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_IP_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// URL queried by this source
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch current IP from HTTP service
    async fn fetch_ip(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_source(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::ip_source(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ip_source(format!("Failed to read response: {}", e)))?;

        let ip_text = body.trim();

        // Reject captive portals and error pages served with a 2xx
        if ip_text.parse::<IpAddr>().is_err() {
            return Err(Error::ip_source(format!(
                "Invalid IP address: {}",
                ip_text
            )));
        }

        tracing::debug!("Fetched server IP {} from {}", ip_text, self.url);
        Ok(ip_text.to_string())
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<String> {
        self.fetch_ip().await
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
