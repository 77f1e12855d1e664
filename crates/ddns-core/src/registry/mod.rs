//! Domain registry
//!
//! The registry owns the domain → token → last-confirmed-IP state. It issues
//! tokens at registration and records the outcome of successful
//! reconciliations. Persistence is delegated to a [`DomainStore`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ddns_core::registry::DomainRegistry;
//! use ddns_core::state::MemoryDomainStore;
//!
//! let registry = DomainRegistry::new(Arc::new(MemoryDomainStore::new()));
//!
//! // Token is returned exactly once
//! let token = registry.register("home.example.com").await?;
//! ```

use crate::error::{Error, Result};
use crate::traits::{DomainRecord, DomainStore, DomainSummary};
use crate::validate::normalize_domain;
use chrono::{DateTime, Utc};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, info};

/// Registry of domains allowed to report their IP
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct DomainRegistry {
    store: Arc<dyn DomainStore>,
}

impl DomainRegistry {
    /// Create a registry over a domain store
    pub fn new(store: Arc<dyn DomainStore>) -> Self {
        Self { store }
    }

    /// Register a domain and return its freshly generated token
    ///
    /// The token is a random UUID v4. It is returned here and never again.
    ///
    /// # Returns
    ///
    /// - `Ok(token)`: Registered
    /// - `Err(Error::InvalidInput)`: Empty or malformed domain
    /// - `Err(Error::Conflict)`: Domain already registered
    /// - `Err(Error::Store)`: Storage error
    pub async fn register(&self, domain: &str) -> Result<String> {
        let domain = normalize_domain(domain)?;
        let token = generate_token();

        self.store
            .insert_domain(&DomainRecord::new(domain.clone(), token.clone()))
            .await?;

        info!("Registered domain {}", domain);
        Ok(token)
    }

    /// Look up the stored token for a domain
    ///
    /// Domains that are malformed are reported as `NotFound`, same as
    /// domains that were never registered.
    pub async fn lookup_token(&self, domain: &str) -> Result<String> {
        let domain = normalize_domain(domain)
            .map_err(|_| Error::not_found(format!("Domain not registered: {}", domain.trim())))?;

        self.store
            .get_domain(&domain)
            .await?
            .map(|record| record.token)
            .ok_or_else(|| Error::not_found(format!("Domain not registered: {}", domain)))
    }

    /// Record a confirmed upstream success
    ///
    /// Writes `last_ip` and `updated_at` together or not at all.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Persisted
    /// - `Err(Error::NotFound)`: Domain not registered (or malformed)
    /// - `Err(Error::Store)`: Storage error; previous values remain
    pub async fn record_success(
        &self,
        domain: &str,
        ip: Ipv4Addr,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        let domain = normalize_domain(domain)
            .map_err(|_| Error::not_found(format!("Domain not registered: {}", domain.trim())))?;
        self.store
            .set_last_ip(&domain, &ip.to_string(), timestamp)
            .await?;

        debug!("Recorded {} -> {} at {}", domain, ip, timestamp.to_rfc3339());
        Ok(())
    }

    /// List every registered domain without its token
    pub async fn list(&self) -> Result<Vec<DomainSummary>> {
        let records = self.store.list_domains().await?;
        Ok(records.iter().map(DomainRecord::summary).collect())
    }

    /// Fetch the full record for a domain, if registered
    pub async fn get(&self, domain: &str) -> Result<Option<DomainRecord>> {
        match normalize_domain(domain) {
            Ok(domain) => self.store.get_domain(&domain).await,
            Err(_) => Ok(None),
        }
    }
}

/// Generate an unguessable update token
fn generate_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryDomainStore;

    fn registry() -> DomainRegistry {
        DomainRegistry::new(Arc::new(MemoryDomainStore::new()))
    }

    #[tokio::test]
    async fn test_record_success_malformed_domain_is_not_found() {
        let registry = registry();
        let ip: Ipv4Addr = "1.2.3.4".parse().unwrap();

        for domain in ["not a host", "", "-bad-.example.com"] {
            let err = registry.record_success(domain, ip, Utc::now()).await.unwrap_err();
            assert!(matches!(err, Error::NotFound(_)), "{}: {:?}", domain, err);
        }
    }

    #[tokio::test]
    async fn test_register_returns_uuid_token() {
        let registry = registry();

        let token = registry.register("a.example.com").await.unwrap();
        assert!(uuid::Uuid::parse_str(&token).is_ok());

        let stored = registry.lookup_token("a.example.com").await.unwrap();
        assert_eq!(stored, token);
    }

    #[tokio::test]
    async fn test_register_twice_is_conflict() {
        let registry = registry();

        registry.register("a.example.com").await.unwrap();
        let err = registry.register("A.Example.com.").await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_empty_domain() {
        let registry = registry();
        let err = registry.register("").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_tokens_are_distinct() {
        let registry = registry();
        let t1 = registry.register("a.example.com").await.unwrap();
        let t2 = registry.register("b.example.com").await.unwrap();
        assert_ne!(t1, t2);
    }

    #[tokio::test]
    async fn test_lookup_unknown_domain_is_not_found() {
        let registry = registry();
        assert!(matches!(
            registry.lookup_token("missing.example.com").await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            registry.lookup_token("not a domain").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_record_success_updates_both_fields() {
        let registry = registry();
        registry.register("a.example.com").await.unwrap();

        let now = Utc::now();
        registry
            .record_success("a.example.com", Ipv4Addr::new(1, 2, 3, 4), now)
            .await
            .unwrap();

        let record = registry.get("a.example.com").await.unwrap().unwrap();
        assert_eq!(record.last_ip.as_deref(), Some("1.2.3.4"));
        assert_eq!(record.updated_at, Some(now));
    }

    #[tokio::test]
    async fn test_record_success_unknown_domain() {
        let registry = registry();
        let err = registry
            .record_success("missing.example.com", Ipv4Addr::new(1, 2, 3, 4), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_omits_tokens() {
        let registry = registry();
        let token = registry.register("a.example.com").await.unwrap();

        let summaries = registry.list().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].domain, "a.example.com");

        let json = serde_json::to_string(&summaries).unwrap();
        assert!(!json.contains(&token));
    }
}
