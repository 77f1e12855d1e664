// # Domain Store Trait
//
// Defines the persistence interface behind the domain registry.
//
// ## Purpose
//
// The store holds one row per registered domain: its update token and the
// last IP that was confirmed at the provider. It is read on every update
// attempt and written only after a confirmed upstream success.
//
// ## Implementations
//
// - In-memory: `ddns_core::state::MemoryDomainStore`
// - SQLite: `ddns-store-sqlite` crate

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Persisted state for one registered domain
#[derive(Clone, PartialEq, Eq)]
pub struct DomainRecord {
    /// Normalized hostname (primary key)
    pub domain: String,
    /// Update token, immutable after registration
    pub token: String,
    /// Last IP confirmed at the provider
    pub last_ip: Option<String>,
    /// When `last_ip` was last confirmed
    pub updated_at: Option<DateTime<Utc>>,
}

impl DomainRecord {
    /// A freshly registered domain with no reconciliation history
    pub fn new(domain: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            token: token.into(),
            last_ip: None,
            updated_at: None,
        }
    }

    /// Token-free projection of this record
    pub fn summary(&self) -> DomainSummary {
        DomainSummary {
            domain: self.domain.clone(),
            last_ip: self.last_ip.clone(),
            updated_at: self.updated_at,
        }
    }
}

impl std::fmt::Debug for DomainRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainRecord")
            .field("domain", &self.domain)
            .field("token", &"<REDACTED>")
            .field("last_ip", &self.last_ip)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Public view of a registered domain, safe to return to administrators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainSummary {
    pub domain: String,
    pub last_ip: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Trait for domain store implementations
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks. Each
/// call owns its own connection or transaction scope; implementations keep
/// no cache in front of the backing store.
///
/// # Trust Level: Trusted (Core Component)
///
/// Stores perform I/O for persistence only. Token checks and the decision to
/// write belong to the registry and the reconciler.
#[async_trait]
pub trait DomainStore: Send + Sync {
    /// Insert a new domain
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Inserted
    /// - `Err(Error::Conflict)`: The domain already exists
    /// - `Err(Error::Store)`: Storage error; nothing was written
    async fn insert_domain(&self, record: &DomainRecord) -> Result<(), crate::Error>;

    /// Fetch a domain's full record
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))`: Found
    /// - `Ok(None)`: Not registered
    /// - `Err(Error::Store)`: Storage error
    async fn get_domain(&self, domain: &str) -> Result<Option<DomainRecord>, crate::Error>;

    /// Set `last_ip` and `updated_at` together
    ///
    /// Must be all-or-nothing: on any error the previous values remain.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Both columns updated
    /// - `Err(Error::NotFound)`: The domain is not registered
    /// - `Err(Error::Store)`: Storage error
    async fn set_last_ip(
        &self,
        domain: &str,
        ip: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), crate::Error>;

    /// List every registered domain, ordered by name
    async fn list_domains(&self) -> Result<Vec<DomainRecord>, crate::Error>;
}
