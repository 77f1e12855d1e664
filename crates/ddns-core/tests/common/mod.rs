//! Test doubles and common utilities for reconciliation contract tests
//!
//! The fake provider keeps an in-memory zone and counts every call, so tests
//! can assert exactly which upstream requests a reconciliation issued.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, DomainRecord, DomainStore, UpstreamRecord, RECORD_TYPE_A};
use ddns_core::{DomainRegistry, MemoryDomainStore, Reconciler};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// A fake DnsProvider backed by an in-memory zone
#[derive(Clone, Default)]
pub struct FakeDnsProvider {
    /// A records keyed by name
    zone: Arc<Mutex<HashMap<String, UpstreamRecord>>>,
    /// Call counter for find_record()
    find_call_count: Arc<AtomicUsize>,
    /// Call counter for set_record()
    set_call_count: Arc<AtomicUsize>,
    /// Status/body returned by find_record() when set
    list_failure: Arc<Mutex<Option<(u16, String)>>>,
    /// Status/body returned by set_record() when set
    set_failure: Arc<Mutex<Option<(u16, String)>>>,
}

impl FakeDnsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish (or replace) an A record
    pub fn put_record(&self, name: &str, content: &str) {
        let record = UpstreamRecord {
            record_id: format!("rec-{}", name),
            name: name.to_string(),
            record_type: RECORD_TYPE_A.to_string(),
            content: content.to_string(),
        };
        self.zone.lock().unwrap().insert(name.to_string(), record);
    }

    /// Currently published content for `name`
    pub fn content_of(&self, name: &str) -> Option<String> {
        self.zone
            .lock()
            .unwrap()
            .get(name)
            .map(|record| record.content.clone())
    }

    /// Make the zone listing fail with the given status and body
    pub fn fail_listing(&self, status: u16, body: &str) {
        *self.list_failure.lock().unwrap() = Some((status, body.to_string()));
    }

    /// Make record updates fail with the given status and body
    pub fn fail_updates(&self, status: u16, body: &str) {
        *self.set_failure.lock().unwrap() = Some((status, body.to_string()));
    }

    /// Get the number of times find_record() was called
    pub fn find_call_count(&self) -> usize {
        self.find_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times set_record() was called
    pub fn set_call_count(&self) -> usize {
        self.set_call_count.load(Ordering::SeqCst)
    }

    /// Total upstream calls of any kind
    pub fn total_call_count(&self) -> usize {
        self.find_call_count() + self.set_call_count()
    }
}

#[async_trait]
impl DnsProvider for FakeDnsProvider {
    async fn find_record(&self, domain: &str) -> Result<UpstreamRecord> {
        self.find_call_count.fetch_add(1, Ordering::SeqCst);

        if let Some((status, body)) = self.list_failure.lock().unwrap().clone() {
            return Err(Error::provider("fake", Some(status), body));
        }

        self.zone
            .lock()
            .unwrap()
            .get(domain)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("No A record for {} at fake", domain)))
    }

    async fn set_record(&self, record_id: &str, domain: &str, new_ip: Ipv4Addr) -> Result<()> {
        self.set_call_count.fetch_add(1, Ordering::SeqCst);

        if let Some((status, body)) = self.set_failure.lock().unwrap().clone() {
            return Err(Error::provider("fake", Some(status), body));
        }

        let mut zone = self.zone.lock().unwrap();
        let record = zone
            .get_mut(domain)
            .filter(|record| record.record_id == record_id)
            .ok_or_else(|| Error::provider("fake", Some(404), "unknown record id"))?;
        record.content = new_ip.to_string();
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// A DomainStore wrapper whose writes can be made to fail
#[derive(Clone, Default)]
pub struct FlakyDomainStore {
    inner: MemoryDomainStore,
    fail_writes: Arc<AtomicBool>,
}

impl FlakyDomainStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every set_last_ip() call fail
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl DomainStore for FlakyDomainStore {
    async fn insert_domain(&self, record: &DomainRecord) -> Result<()> {
        self.inner.insert_domain(record).await
    }

    async fn get_domain(&self, domain: &str) -> Result<Option<DomainRecord>> {
        self.inner.get_domain(domain).await
    }

    async fn set_last_ip(&self, domain: &str, ip: &str, updated_at: DateTime<Utc>) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::store("injected write failure"));
        }
        self.inner.set_last_ip(domain, ip, updated_at).await
    }

    async fn list_domains(&self) -> Result<Vec<DomainRecord>> {
        self.inner.list_domains().await
    }
}

/// A reconciler over a fresh memory store and the given fake provider
pub fn reconciler_with(provider: &FakeDnsProvider) -> Reconciler {
    let registry = DomainRegistry::new(Arc::new(MemoryDomainStore::new()));
    Reconciler::new(registry, Arc::new(provider.clone()))
}

/// Snapshot of the registry state for one domain
pub async fn snapshot(
    reconciler: &Reconciler,
    domain: &str,
) -> (Option<String>, Option<DateTime<Utc>>) {
    let record = reconciler
        .registry()
        .get(domain)
        .await
        .expect("store read succeeds")
        .expect("domain is registered");
    (record.last_ip, record.updated_at)
}
