// # Memory Domain Store
//
// In-memory implementation of DomainStore.
//
// ## Purpose
//
// A fast store that does not persist across restarts. Used by the contract
// tests and for throwaway deployments.
//
// ## Crash Behavior
//
// - All registrations are lost on restart; every token becomes invalid
// - There is nothing to recover

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::domain_store::{DomainRecord, DomainStore};

/// In-memory domain store
///
/// Records live in a `BTreeMap` behind a `RwLock`, so listing comes back
/// ordered by domain. Clones share the same map.
///
/// # Example
///
/// ```rust,no_run
/// use ddns_core::state::MemoryDomainStore;
/// use ddns_core::traits::{DomainRecord, DomainStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryDomainStore::new();
///     store.insert_domain(&DomainRecord::new("a.example.com", "token")).await?;
///
///     let record = store.get_domain("a.example.com").await?;
///     assert!(record.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDomainStore {
    inner: Arc<RwLock<BTreeMap<String, DomainRecord>>>,
}

impl MemoryDomainStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of registered domains
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl DomainStore for MemoryDomainStore {
    async fn insert_domain(&self, record: &DomainRecord) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        if guard.contains_key(&record.domain) {
            return Err(Error::conflict(format!(
                "Domain already exists: {}",
                record.domain
            )));
        }
        guard.insert(record.domain.clone(), record.clone());
        Ok(())
    }

    async fn get_domain(&self, domain: &str) -> Result<Option<DomainRecord>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(domain).cloned())
    }

    async fn set_last_ip(
        &self,
        domain: &str,
        ip: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        let record = guard
            .get_mut(domain)
            .ok_or_else(|| Error::not_found(format!("Domain not registered: {}", domain)))?;
        record.last_ip = Some(ip.to_string());
        record.updated_at = Some(updated_at);
        Ok(())
    }

    async fn list_domains(&self) -> Result<Vec<DomainRecord>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.values().cloned().collect())
    }
}
