// # IP Source Trait
//
// Defines the interface for discovering the server's own public IP address.
//
// ## Implementations
//
// - HTTP echo service: `dnswatch-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use dnswatch_core::IpSource;
//
// #[tokio::main]
// async fn main() -> dnswatch_core::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let server_ip = source.current().await?;
//     println!("Server IP: {}", server_ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for IP source implementations
///
/// The returned address is the baseline every domain is compared against.
/// It is kept in its textual form: comparisons are plain string equality,
/// so the source must not rewrite what the service reported beyond trimming.
///
/// # Trust Level: Semi-Trusted
///
/// ## Allowed Capabilities
/// - ✅ Perform outbound network I/O to an IP echo service
///
/// ## Forbidden Capabilities
/// - ❌ Implement retry logic (a run either has a baseline or it does not)
/// - ❌ Log on behalf of the engine (return the error instead)
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The IP address as reported, trimmed of whitespace
    /// - `Err(Error)`: If unable to determine the current IP
    async fn current(&self) -> Result<String, crate::Error>;

    /// Short name used in log lines
    fn source_name(&self) -> &'static str {
        "ip-source"
    }
}
