// # DNS Provider Trait
//
// Defines the interface for reading and writing the authoritative A record
// via a provider API.
//
// ## Implementations
//
// - Cloudflare: `ddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// let record = provider.find_record("home.example.com").await?;
// if record.content != "203.0.113.7" {
//     provider
//         .set_record(&record.record_id, "home.example.com", "203.0.113.7".parse()?)
//         .await?;
// }
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Record type managed by this service
pub const RECORD_TYPE_A: &str = "A";

/// An A record as currently published by the provider
///
/// Fetched live on every reconciliation and never persisted locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRecord {
    /// Provider-assigned opaque identifier
    pub record_id: String,
    /// Hostname
    pub name: String,
    /// Record type, always "A"
    pub record_type: String,
    /// Currently published IP
    pub content: String,
}

impl UpstreamRecord {
    /// Whether the published content already equals `ip`
    ///
    /// Content that does not parse as IPv4 never matches.
    pub fn points_to(&self, ip: Ipv4Addr) -> bool {
        self.content
            .trim()
            .parse::<Ipv4Addr>()
            .is_ok_and(|current| current == ip)
    }
}

/// Trait for DNS provider implementations
///
/// # Trust Level: Untrusted
///
/// Providers only talk to their own API endpoint. They do not retry, do not
/// cache, do not touch the domain store and do not decide whether an update
/// is needed; the reconciler owns all of that.
///
/// # Errors
///
/// - Listing succeeded but nothing matched: [`crate::Error::NotFound`]
/// - Any failed call: [`crate::Error::Provider`] with the upstream status (if
///   a response arrived) and the response body or transport error
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Find the first A record whose name equals `domain`
    ///
    /// Implementations must walk every page of the zone listing rather than
    /// assume the first page is complete.
    async fn find_record(&self, domain: &str) -> Result<UpstreamRecord, crate::Error>;

    /// Point record `record_id` at `new_ip`
    ///
    /// Issues exactly one mutating call. Any response other than 200 is an
    /// error.
    async fn set_record(
        &self,
        record_id: &str,
        domain: &str,
        new_ip: Ipv4Addr,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
