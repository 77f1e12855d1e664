// # Cloudflare DNS Provider
//
// DNS provider client for the Cloudflare API v4.
//
// ## Behaviour
//
// - `find_record` walks the zone listing page by page until the A record is
//   found, a page comes back empty, `result_info.total_pages` is reached or
//   the page cap is hit
// - `set_record` issues exactly one PUT; anything but 200 is an error
// - No retries, no caching, no background tasks
//
// ## Trust Level: Untrusted (DNS Provider)
//
// The provider only talks to the configured API base. It never touches the
// domain store and never decides whether an update is needed.
//
// ## Security
//
// The API token is sent as a bearer credential and never logged. The `Debug`
// implementation redacts it.

mod types;

use async_trait::async_trait;
use ddns_core::config::CloudflareConfig;
use ddns_core::traits::{DnsProvider, RECORD_TYPE_A, UpstreamRecord};
use ddns_core::{Error, Result};
use reqwest::StatusCode;
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::{debug, info};

use types::{CloudflareDnsRecord, ListRecordsResponse, UpdateRecordRequest};

/// Provider name used in errors and logs
const PROVIDER_NAME: &str = "cloudflare";

/// Upper bound on listing pages walked per lookup
pub const MAX_PAGES: u32 = 100;

/// Comment stamped on every record this service writes
const RECORD_COMMENT: &str = "ddns-client";

/// Cloudflare DNS provider
///
/// # Trust Level: Untrusted
///
/// Stateless and single-shot. Retry policy belongs to whoever reports the IP.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// Zone holding every managed record
    zone_id: String,

    /// API base URL without trailing slash
    api_base: String,

    /// Records requested per listing page
    per_page: u32,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("api_base", &self.api_base)
            .field("per_page", &self.per_page)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: CloudflareConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token: config.api_token,
            zone_id: config.zone_id,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            per_page: config.per_page,
            client,
        })
    }

    fn records_url(&self) -> String {
        format!("{}/zones/{}/dns_records", self.api_base, self.zone_id)
    }

    fn record_url(&self, record_id: &str) -> String {
        format!("{}/{}", self.records_url(), record_id)
    }

    /// Fetch one page of the zone listing
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?page=N&per_page=M
    /// Authorization: Bearer <token>
    /// ```
    async fn list_page(&self, page: u32) -> Result<ListRecordsResponse> {
        let response = self
            .client
            .get(self.records_url())
            .query(&[("page", page), ("per_page", self.per_page)])
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(transport_error)?;

        if !status.is_success() {
            return Err(Error::provider(PROVIDER_NAME, Some(status.as_u16()), body));
        }

        let listing: ListRecordsResponse = serde_json::from_str(&body).map_err(|e| {
            Error::provider(
                PROVIDER_NAME,
                Some(status.as_u16()),
                format!("Invalid response format: {}", e),
            )
        })?;

        if listing.success == Some(false) {
            let message = listing
                .errors
                .as_deref()
                .and_then(|errors| errors.first())
                .map(|e| format!("{} (code {})", e.message, e.code))
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(Error::provider(PROVIDER_NAME, Some(status.as_u16()), message));
        }

        Ok(listing)
    }
}

/// First A record in `records` named `domain`
fn find_a_record<'a>(records: &'a [CloudflareDnsRecord], domain: &str) -> Option<&'a CloudflareDnsRecord> {
    records
        .iter()
        .find(|r| r.record_type == RECORD_TYPE_A && r.name.eq_ignore_ascii_case(domain))
}

fn transport_error(e: reqwest::Error) -> Error {
    let message = if e.is_timeout() {
        format!("Request timed out: {}", e)
    } else {
        format!("HTTP request failed: {}", e)
    };
    Error::provider(PROVIDER_NAME, None, message)
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    async fn find_record(&self, domain: &str) -> Result<UpstreamRecord> {
        let mut scanned = 0usize;
        let mut page = 1u32;

        loop {
            let listing = self.list_page(page).await?;
            let records = listing.result.unwrap_or_default();
            debug!(
                "Listed page {} of zone {} ({} records)",
                page,
                self.zone_id,
                records.len()
            );

            if let Some(record) = find_a_record(&records, domain) {
                debug!("Found record {} for {}", record.id, domain);
                return Ok(UpstreamRecord {
                    record_id: record.id.clone(),
                    name: record.name.clone(),
                    record_type: record.record_type.clone(),
                    content: record.content.clone(),
                });
            }

            scanned += records.len();
            let last_page = match &listing.result_info {
                Some(info) => page >= info.total_pages,
                None => records.len() < self.per_page as usize,
            };
            if records.is_empty() || last_page || page >= MAX_PAGES {
                break;
            }
            page += 1;
        }

        Err(Error::not_found(format!(
            "No A record named {} in zone {} ({} records scanned across {} pages)",
            domain, self.zone_id, scanned, page
        )))
    }

    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// {
    ///   "content": "1.2.3.4",
    ///   "name": "home.example.com",
    ///   "proxied": false,
    ///   "type": "A",
    ///   "comment": "ddns-client"
    /// }
    /// ```
    async fn set_record(&self, record_id: &str, domain: &str, new_ip: Ipv4Addr) -> Result<()> {
        let payload = UpdateRecordRequest {
            content: new_ip.to_string(),
            name: domain,
            proxied: false,
            record_type: RECORD_TYPE_A,
            comment: RECORD_COMMENT,
        };

        let response = self
            .client
            .put(self.record_url(record_id))
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(Error::provider(PROVIDER_NAME, Some(status.as_u16()), body));
        }

        info!("Cloudflare record {} set to {}", record_id, new_ip);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
