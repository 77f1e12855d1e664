//! Core traits for the DDNS update service
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`DnsProvider`]: Read and write the authoritative A record
//! - [`DomainStore`]: Persist domains, tokens and last confirmed IPs

pub mod dns_provider;
pub mod domain_store;

pub use dns_provider::{DnsProvider, UpstreamRecord, RECORD_TYPE_A};
pub use domain_store::{DomainRecord, DomainStore, DomainSummary};
