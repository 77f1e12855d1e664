// # ddns-core
//
// Core library for the DDNS update service.
//
// ## Architecture Overview
//
// Devices report their public IP for a registered domain; the service
// reconciles that IP with the provider's authoritative A record.
//
// - **DomainStore**: Trait for persisting domains, tokens and last confirmed IPs
// - **DomainRegistry**: Issues tokens and records reconciliation outcomes
// - **TokenAuthenticator**: Checks an update token against the registry
// - **DnsProvider**: Trait for reading and writing the A record upstream
// - **Reconciler**: authenticate → fetch → diff → conditionally write → persist
//
// ## Design Principles
//
// 1. **Authorization first**: no upstream call happens before the token check
// 2. **Upstream is the source of truth**: the published record is fetched live
// 3. **Write only on confirmation**: local state changes only after upstream success
// 4. **Idempotency**: an already-correct record is never rewritten
// 5. **Library-First**: the HTTP daemon is a thin layer over this crate

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod registry;
pub mod state;
pub mod traits;
pub mod validate;

// Re-export core types for convenience
pub use auth::TokenAuthenticator;
pub use config::{CloudflareConfig, ServiceConfig};
pub use engine::{ReconcileOutcome, Reconciler};
pub use error::{Error, Result};
pub use registry::DomainRegistry;
pub use state::MemoryDomainStore;
pub use traits::{DnsProvider, DomainRecord, DomainStore, DomainSummary, UpstreamRecord};
