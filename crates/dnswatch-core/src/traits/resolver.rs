// # Domain Resolver Trait
//
// Defines the interface for forward DNS lookups.
//
// ## Implementations
//
// - Platform resolver: [`crate::resolver::SystemResolver`]
// - Test doubles with canned answers

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for forward DNS resolution
///
/// Only the first address of an answer is reported; multiple A/AAAA records
/// are not compared individually.
#[async_trait]
pub trait DomainResolver: Send + Sync {
    /// Resolve a hostname to its first address
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The first address returned by the resolver
    /// - `Err(Error::Resolution)`: Lookup failed or returned no address
    async fn resolve(&self, name: &str) -> Result<IpAddr, crate::Error>;
}
