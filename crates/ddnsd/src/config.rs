//! Daemon configuration
//!
//! All configuration is read from environment variables:
//!
//! ### Store
//! - `DATABASE_URI`: sqlx SQLite URL (e.g. `sqlite:///var/lib/ddns/ddns.db`)
//!
//! ### DNS Provider
//! - `CLOUDFLARE_API_KEY`: API token with Zone:DNS:Edit permission
//! - `CLOUDFLARE_ZONE_ID`: Zone holding the managed records
//! - `DDNS_CLOUDFLARE_API_BASE`: API base URL (default: Cloudflare v4)
//! - `DDNS_CLOUDFLARE_PER_PAGE`: Records per listing page (default: 100)
//! - `DDNS_HTTP_TIMEOUT_SECS`: Request timeout (default: 30)
//! - `DDNS_HTTP_CONNECT_TIMEOUT_SECS`: Connect timeout (default: 10)
//!
//! ### HTTP Surface
//! - `DDNS_BIND_ADDR`: Listen address (default: 0.0.0.0:5000)
//! - `DDNS_ADMIN_USERNAME` / `DDNS_ADMIN_PASSWORD`: Basic-auth credentials
//!   for the administrative routes
//! - `DDNS_EXPOSE_PROVIDER_ERRORS`: Return provider diagnostics to clients
//!   (default: false)
//!
//! ### Logging
//! - `DDNS_LOG_LEVEL`: trace, debug, info, warn or error (default: info)

use anyhow::{Context, Result};
use ddns_core::config::CLOUDFLARE_API_BASE;
use ddns_core::{CloudflareConfig, ServiceConfig};
use std::env;
use std::net::SocketAddr;
use tracing::Level;

use crate::api::AdminCredentials;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const MIN_ADMIN_PASSWORD_LEN: usize = 8;

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_uri: String,
    pub cloudflare_api_key: String,
    pub cloudflare_zone_id: String,
    pub cloudflare_api_base: String,
    pub cloudflare_per_page: u32,
    pub http_timeout_secs: u64,
    pub http_connect_timeout_secs: u64,
    pub bind_addr: String,
    pub admin_username: String,
    pub admin_password: String,
    pub expose_provider_errors: bool,
    pub log_level: String,
}

// Secrets stay out of Debug output
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_uri", &self.database_uri)
            .field("cloudflare_api_key", &"<REDACTED>")
            .field("cloudflare_zone_id", &self.cloudflare_zone_id)
            .field("cloudflare_api_base", &self.cloudflare_api_base)
            .field("cloudflare_per_page", &self.cloudflare_per_page)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("http_connect_timeout_secs", &self.http_connect_timeout_secs)
            .field("bind_addr", &self.bind_addr)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"<REDACTED>")
            .field("expose_provider_errors", &self.expose_provider_errors)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} is required. Set it via: export {}=...", key, key))
        };

        Ok(Self {
            database_uri: required("DATABASE_URI")?,
            cloudflare_api_key: required("CLOUDFLARE_API_KEY")?,
            cloudflare_zone_id: required("CLOUDFLARE_ZONE_ID")?,
            cloudflare_api_base: lookup("DDNS_CLOUDFLARE_API_BASE")
                .unwrap_or_else(|| CLOUDFLARE_API_BASE.to_string()),
            cloudflare_per_page: parse_or(&lookup, "DDNS_CLOUDFLARE_PER_PAGE", 100)?,
            http_timeout_secs: parse_or(&lookup, "DDNS_HTTP_TIMEOUT_SECS", 30)?,
            http_connect_timeout_secs: parse_or(&lookup, "DDNS_HTTP_CONNECT_TIMEOUT_SECS", 10)?,
            bind_addr: lookup("DDNS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            admin_username: required("DDNS_ADMIN_USERNAME")?,
            admin_password: required("DDNS_ADMIN_PASSWORD")?,
            expose_provider_errors: parse_bool(&lookup, "DDNS_EXPOSE_PROVIDER_ERRORS")?,
            log_level: lookup("DDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.database_uri.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URI must be a SQLite URL (sqlite://path/to/ddns.db). Got: {}",
                self.database_uri
            );
        }

        self.bind_socket_addr()?;

        if self.admin_password.len() < MIN_ADMIN_PASSWORD_LEN {
            anyhow::bail!(
                "DDNS_ADMIN_PASSWORD must be at least {} characters",
                MIN_ADMIN_PASSWORD_LEN
            );
        }

        if self.admin_username.contains(':') {
            anyhow::bail!("DDNS_ADMIN_USERNAME cannot contain ':'");
        }

        if !(1..=300).contains(&self.http_timeout_secs) {
            anyhow::bail!(
                "DDNS_HTTP_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                self.http_timeout_secs
            );
        }

        if !(1..=300).contains(&self.http_connect_timeout_secs) {
            anyhow::bail!(
                "DDNS_HTTP_CONNECT_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                self.http_connect_timeout_secs
            );
        }

        self.cloudflare_config()
            .validate()
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        self.tracing_level()?;

        Ok(())
    }

    /// Parsed listen address
    pub fn bind_socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("DDNS_BIND_ADDR is not a socket address: {}", self.bind_addr))
    }

    /// Tracing level for `DDNS_LOG_LEVEL`
    pub fn tracing_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }

    pub fn cloudflare_config(&self) -> CloudflareConfig {
        CloudflareConfig::new(&self.cloudflare_api_key, &self.cloudflare_zone_id)
            .with_api_base(&self.cloudflare_api_base)
            .with_timeouts(self.http_timeout_secs, self.http_connect_timeout_secs)
            .with_per_page(self.cloudflare_per_page)
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            expose_provider_errors: self.expose_provider_errors,
        }
    }

    pub fn admin_credentials(&self) -> AdminCredentials {
        AdminCredentials::new(&self.admin_username, &self.admin_password)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} is not a valid number ({}): {}", key, e, raw)),
        None => Ok(default),
    }
}

fn parse_bool<F>(lookup: &F, key: &str) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => anyhow::bail!("{} must be true or false. Got: {}", key, v),
        },
    }
}
