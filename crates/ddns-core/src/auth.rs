//! Token authenticator for the update path

use crate::error::{Error, Result};
use crate::registry::DomainRegistry;
use tracing::debug;

/// Checks a presented token against the registry
///
/// An unknown domain and a wrong token both come back as `Ok(false)`, so a
/// caller without a valid token learns nothing about which domains exist.
#[derive(Clone)]
pub struct TokenAuthenticator {
    registry: DomainRegistry,
}

impl TokenAuthenticator {
    pub fn new(registry: DomainRegistry) -> Self {
        Self { registry }
    }

    /// Returns true iff `domain` is registered and `presented_token` matches
    ///
    /// Store failures are returned as errors; they are not an answer.
    pub async fn authenticate(&self, domain: &str, presented_token: &str) -> Result<bool> {
        match self.registry.lookup_token(domain).await {
            Ok(stored) => Ok(constant_time_eq(stored.as_bytes(), presented_token.as_bytes())),
            Err(Error::NotFound(_)) => {
                debug!("Token check for unregistered domain");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

/// Constant-time byte comparison to prevent timing attacks.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
