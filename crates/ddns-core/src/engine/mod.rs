//! Reconciler
//!
//! The reconciler is responsible for:
//! - Validating the request
//! - Checking the caller's token before any upstream call
//! - Fetching the published A record
//! - Updating it only when it differs from the reported IP
//! - Persisting the confirmed IP after upstream success
//!
//! ## Architecture
//!
//! ```text
//!                    ┌──────────────┐
//!    reconcile() ───▶│  Reconciler  │
//!                    └──────────────┘
//!                           │
//!         ┌─────────────────┼──────────────────┐
//!         │                 │                  │
//!         ▼                 ▼                  ▼
//! ┌───────────────┐  ┌─────────────┐  ┌────────────────┐
//! │ Token         │  │ DnsProvider │  │ DomainRegistry │
//! │ Authenticator │  │ (find/set)  │  │ (persist)      │
//! └───────────────┘  └─────────────┘  └────────────────┘
//! ```
//!
//! ## Per-call state machine
//!
//! `Start → AuthChecked → RecordFetched → {AlreadyCorrect | Mutated} →
//! Persisted | Failed`
//!
//! Nothing carries over between calls and nothing is retried here; the
//! reporting device retries on its own schedule.

use crate::auth::TokenAuthenticator;
use crate::error::{Error, Result};
use crate::registry::DomainRegistry;
use crate::traits::DnsProvider;
use crate::validate::{normalize_domain, parse_ipv4};
use chrono::Utc;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Successful terminal states of a reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The provider record was changed to the reported IP
    Updated {
        domain: String,
        previous_ip: String,
        new_ip: Ipv4Addr,
    },

    /// The provider record already held the reported IP; no write was issued
    AlreadyCorrect { domain: String, ip: Ipv4Addr },
}

impl ReconcileOutcome {
    /// Message returned to the reporting client
    pub fn message(&self) -> &'static str {
        match self {
            ReconcileOutcome::Updated { .. } => "DNS record updated successfully.",
            ReconcileOutcome::AlreadyCorrect { .. } => "DNS record is already updated.",
        }
    }

    /// The IP now published and recorded
    pub fn ip(&self) -> Ipv4Addr {
        match self {
            ReconcileOutcome::Updated { new_ip, .. } => *new_ip,
            ReconcileOutcome::AlreadyCorrect { ip, .. } => *ip,
        }
    }
}

/// Orchestrates one authenticated IP report against the provider
///
/// ## Threading
///
/// `Reconciler` is cheap to clone and safe to share across request tasks.
/// Calls for different domains never interfere. Calls for the same domain
/// are not serialized.
#[derive(Clone)]
pub struct Reconciler {
    registry: DomainRegistry,
    authenticator: TokenAuthenticator,
    provider: Arc<dyn DnsProvider>,
}

impl Reconciler {
    /// Create a reconciler
    ///
    /// The token authenticator is built over the same registry that records
    /// outcomes.
    pub fn new(registry: DomainRegistry, provider: Arc<dyn DnsProvider>) -> Self {
        let authenticator = TokenAuthenticator::new(registry.clone());
        Self {
            registry,
            authenticator,
            provider,
        }
    }

    /// The registry this reconciler persists into
    pub fn registry(&self) -> &DomainRegistry {
        &self.registry
    }

    /// Reconcile a reported IP for `domain`
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileOutcome)`: The record now holds `new_ip` and it was recorded
    /// - `Err(Error::InvalidInput)`: Missing or malformed parameter
    /// - `Err(Error::Unauthorized)`: Unknown domain or wrong token
    /// - `Err(Error::UpstreamFailure)`: Listing or update failed, or no A record
    /// - `Err(Error::Store)`: Local store failed
    #[tracing::instrument(name = "reconcile", skip_all, fields(domain = %domain))]
    pub async fn reconcile(
        &self,
        domain: &str,
        new_ip: &str,
        presented_token: &str,
    ) -> Result<ReconcileOutcome> {
        // Start
        if domain.trim().is_empty() || new_ip.trim().is_empty() || presented_token.is_empty() {
            return Err(Error::invalid_input("domain, ip and token are required"));
        }
        let domain = normalize_domain(domain)?;
        let new_ip = parse_ipv4(new_ip)?;

        // AuthChecked: must precede any upstream call
        if !self.authenticator.authenticate(&domain, presented_token).await? {
            debug!("Token rejected");
            return Err(Error::Unauthorized);
        }

        // RecordFetched
        let record = self
            .provider
            .find_record(&domain)
            .await
            .map_err(|e| {
                warn!("{} lookup failed: {}", self.provider.provider_name(), e);
                e.into_upstream()
            })?;

        // AlreadyCorrect
        if record.points_to(new_ip) {
            debug!("Record {} already points to {}", record.record_id, new_ip);
            self.registry
                .record_success(&domain, new_ip, Utc::now())
                .await?;
            return Ok(ReconcileOutcome::AlreadyCorrect { domain, ip: new_ip });
        }

        // Mutated
        self.provider
            .set_record(&record.record_id, &domain, new_ip)
            .await
            .map_err(|e| {
                warn!("{} update failed: {}", self.provider.provider_name(), e);
                e.into_upstream()
            })?;

        // Persisted
        self.registry
            .record_success(&domain, new_ip, Utc::now())
            .await?;

        info!("Updated {} -> {} (was: {})", domain, new_ip, record.content);
        Ok(ReconcileOutcome::Updated {
            domain,
            previous_ip: record.content,
            new_ip,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_messages() {
        let updated = ReconcileOutcome::Updated {
            domain: "a.example.com".to_string(),
            previous_ip: "9.9.9.9".to_string(),
            new_ip: Ipv4Addr::new(1, 2, 3, 4),
        };
        let unchanged = ReconcileOutcome::AlreadyCorrect {
            domain: "a.example.com".to_string(),
            ip: Ipv4Addr::new(1, 2, 3, 4),
        };

        assert_eq!(updated.message(), "DNS record updated successfully.");
        assert_eq!(unchanged.message(), "DNS record is already updated.");
        assert_eq!(updated.ip(), unchanged.ip());
    }
}
