//! Configuration types for the DDNS update service
//!
//! These structs are built once at startup and handed to constructors by
//! value. Nothing in the service reads credentials from ambient globals.

use serde::{Deserialize, Serialize};

/// Cloudflare API v4 base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Immutable configuration for the Cloudflare provider client
#[derive(Clone, Serialize, Deserialize)]
pub struct CloudflareConfig {
    /// Cloudflare API token with Zone:DNS:Edit permission
    pub api_token: String,

    /// Zone that holds every managed A record
    pub zone_id: String,

    /// API base URL (overridable for testing against a local server)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Records requested per page when listing the zone
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

// The API token must never reach a log line.
impl std::fmt::Debug for CloudflareConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareConfig")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("per_page", &self.per_page)
            .finish()
    }
}

impl CloudflareConfig {
    /// Create a configuration with default endpoint, timeouts and page size
    pub fn new(api_token: impl Into<String>, zone_id: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            zone_id: zone_id.into(),
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            per_page: default_per_page(),
        }
    }

    /// Override the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Override the request and connect timeouts
    pub fn with_timeouts(mut self, timeout_secs: u64, connect_timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self.connect_timeout_secs = connect_timeout_secs;
        self
    }

    /// Override the listing page size
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_token.trim().is_empty() {
            return Err(crate::Error::config("Cloudflare API token cannot be empty"));
        }
        if self.zone_id.trim().is_empty() {
            return Err(crate::Error::config("Cloudflare zone ID cannot be empty"));
        }
        if !self.api_base.starts_with("https://") && !self.api_base.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "Cloudflare API base must be an http(s) URL. Got: {}",
                self.api_base
            )));
        }
        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(crate::Error::config("HTTP timeouts must be > 0"));
        }
        if !(5..=5000).contains(&self.per_page) {
            return Err(crate::Error::config(format!(
                "Cloudflare page size must be between 5 and 5000. Got: {}",
                self.per_page
            )));
        }
        Ok(())
    }
}

/// Service-level behaviour switches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Return provider status/body verbatim in `UpstreamFailure` responses
    ///
    /// When false the HTTP body carries a generic message and the detail is
    /// only logged.
    #[serde(default)]
    pub expose_provider_errors: bool,
}

fn default_api_base() -> String {
    CLOUDFLARE_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_per_page() -> u32 {
    100
}
