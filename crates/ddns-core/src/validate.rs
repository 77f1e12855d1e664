//! Input normalization for domains and reported IPs

use crate::error::{Error, Result};
use std::net::Ipv4Addr;

/// Maximum hostname length (RFC 1035)
const MAX_DOMAIN_LEN: usize = 253;

/// Maximum label length (RFC 1035)
const MAX_LABEL_LEN: usize = 63;

/// Normalize and validate a hostname
///
/// Trims whitespace, drops a single trailing dot and lowercases. Labels must
/// be 1-63 ASCII alphanumerics or hyphens and may not start or end with a
/// hyphen.
pub fn normalize_domain(domain: &str) -> Result<String> {
    let trimmed = domain.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);

    if trimmed.is_empty() {
        return Err(Error::invalid_input("Domain is missing"));
    }

    if trimmed.len() > MAX_DOMAIN_LEN {
        return Err(Error::invalid_input(format!(
            "Domain name too long: {} chars (max {})",
            trimmed.len(),
            MAX_DOMAIN_LEN
        )));
    }

    for label in trimmed.split('.') {
        if label.is_empty() {
            return Err(Error::invalid_input(format!(
                "Domain name has empty label: '{}'",
                trimmed
            )));
        }

        if label.len() > MAX_LABEL_LEN {
            return Err(Error::invalid_input(format!(
                "Domain label too long: {} chars (max {})",
                label.len(),
                MAX_LABEL_LEN
            )));
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(Error::invalid_input(format!(
                "Domain label contains invalid characters: '{}'",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::invalid_input(format!(
                "Domain label cannot start or end with hyphen: '{}'",
                label
            )));
        }
    }

    Ok(trimmed.to_ascii_lowercase())
}

/// Parse a reported IP; only dotted-quad IPv4 is accepted
pub fn parse_ipv4(ip: &str) -> Result<Ipv4Addr> {
    let ip = ip.trim();
    if ip.is_empty() {
        return Err(Error::invalid_input("IP is missing"));
    }
    ip.parse::<Ipv4Addr>()
        .map_err(|_| Error::invalid_input(format!("Not an IPv4 address: '{}'", ip)))
}
