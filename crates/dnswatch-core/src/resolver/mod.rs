// # System Resolver
//
// Forward lookups through the platform resolver (getaddrinfo on Unix).
//
// No timeout override: a hanging resolver stalls the run. Search domains,
// /etc/hosts and nsswitch order apply exactly as for any other process.

use async_trait::async_trait;
use std::net::IpAddr;

use crate::Error;
use crate::traits::DomainResolver;

/// Resolver backed by the operating system
///
/// The first address returned wins, whatever its family. On a dual-stack
/// host the platform may order an AAAA record first, in which case an
/// IPv6 address is compared against the server IP and a domain whose A
/// record matches can still be reported as a mismatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl SystemResolver {
    /// Create a new system resolver
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DomainResolver for SystemResolver {
    async fn resolve(&self, name: &str) -> Result<IpAddr, Error> {
        let mut addrs = tokio::net::lookup_host((name, 0))
            .await
            .map_err(|e| Error::resolution(format!("{}", e)))?;

        addrs
            .next()
            .map(|addr| addr.ip())
            .ok_or_else(|| Error::resolution(format!("no address found for {}", name)))
    }
}
