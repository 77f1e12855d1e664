//! Architectural Contract Test: Register, Report, Converge
//!
//! Walks one domain through its whole lifecycle against the fake provider.

mod common;

use common::*;
use ddns_core::{Error, ReconcileOutcome};

#[tokio::test]
async fn register_then_report_converges() {
    let provider = FakeDnsProvider::new();
    provider.put_record("home.example.com", "1.1.1.1");
    let reconciler = reconciler_with(&provider);

    let token = reconciler
        .registry()
        .register("home.example.com")
        .await
        .expect("registration succeeds");
    assert!(!token.is_empty());

    // A second registration is refused and the token is not reissued
    let err = reconciler
        .registry()
        .register("home.example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    // Wrong token: 403, no upstream traffic
    let err = reconciler
        .reconcile("home.example.com", "5.6.7.8", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized));
    assert_eq!(provider.total_call_count(), 0);

    // Right token, new IP: one lookup, one write
    let outcome = reconciler
        .reconcile("home.example.com", "5.6.7.8", &token)
        .await
        .expect("reconcile succeeds");
    assert_eq!(
        outcome,
        ReconcileOutcome::Updated {
            domain: "home.example.com".to_string(),
            previous_ip: "1.1.1.1".to_string(),
            new_ip: "5.6.7.8".parse().unwrap(),
        }
    );
    assert_eq!(outcome.message(), "DNS record updated successfully.");
    assert_eq!(provider.find_call_count(), 1);
    assert_eq!(provider.set_call_count(), 1);
    assert_eq!(provider.content_of("home.example.com").as_deref(), Some("5.6.7.8"));

    // Same IP again: lookup only
    let outcome = reconciler
        .reconcile("home.example.com", "5.6.7.8", &token)
        .await
        .expect("reconcile succeeds");
    assert_eq!(outcome.message(), "DNS record is already updated.");
    assert_eq!(provider.find_call_count(), 2);
    assert_eq!(provider.set_call_count(), 1);

    let summaries = reconciler.registry().list().await.expect("list succeeds");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].last_ip.as_deref(), Some("5.6.7.8"));
    assert!(summaries[0].updated_at.is_some());
}

#[tokio::test]
async fn domain_names_are_normalized_on_report() {
    let provider = FakeDnsProvider::new();
    provider.put_record("home.example.com", "1.1.1.1");
    let reconciler = reconciler_with(&provider);
    let token = reconciler
        .registry()
        .register("home.example.com")
        .await
        .expect("registration succeeds");

    let outcome = reconciler
        .reconcile("Home.Example.COM.", "5.6.7.8", &token)
        .await
        .expect("reconcile succeeds");

    assert!(matches!(outcome, ReconcileOutcome::Updated { .. }));
    let (last_ip, _) = snapshot(&reconciler, "home.example.com").await;
    assert_eq!(last_ip.as_deref(), Some("5.6.7.8"));
}

#[tokio::test]
async fn domains_are_independent() {
    let provider = FakeDnsProvider::new();
    provider.put_record("a.example.com", "1.1.1.1");
    provider.put_record("b.example.com", "2.2.2.2");
    let reconciler = reconciler_with(&provider);
    let token_a = reconciler.registry().register("a.example.com").await.unwrap();
    let token_b = reconciler.registry().register("b.example.com").await.unwrap();

    // Token of one domain is useless for another
    assert!(matches!(
        reconciler.reconcile("b.example.com", "9.9.9.9", &token_a).await,
        Err(Error::Unauthorized)
    ));

    let (a, b) = tokio::join!(
        reconciler.reconcile("a.example.com", "10.0.0.1", &token_a),
        reconciler.reconcile("b.example.com", "10.0.0.2", &token_b),
    );
    a.expect("a succeeds");
    b.expect("b succeeds");

    assert_eq!(provider.content_of("a.example.com").as_deref(), Some("10.0.0.1"));
    assert_eq!(provider.content_of("b.example.com").as_deref(), Some("10.0.0.2"));
    assert_eq!(provider.set_call_count(), 2);
}

#[tokio::test]
async fn record_appearing_upstream_is_picked_up() {
    let provider = FakeDnsProvider::new();
    let reconciler = reconciler_with(&provider);
    let token = reconciler
        .registry()
        .register("home.example.com")
        .await
        .expect("registration succeeds");

    // No record upstream yet
    let err = reconciler
        .reconcile("home.example.com", "1.2.3.4", &token)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UpstreamFailure { .. }));
    assert_eq!(snapshot(&reconciler, "home.example.com").await, (None, None));

    // Record published with a stale address
    provider.put_record("home.example.com", "9.9.9.9");
    let outcome = reconciler
        .reconcile("home.example.com", "1.2.3.4", &token)
        .await
        .expect("reconcile succeeds");
    assert!(matches!(outcome, ReconcileOutcome::Updated { .. }));
    let (last_ip, _) = snapshot(&reconciler, "home.example.com").await;
    assert_eq!(last_ip.as_deref(), Some("1.2.3.4"));

    // Same report again: no further write
    let outcome = reconciler
        .reconcile("home.example.com", "1.2.3.4", &token)
        .await
        .expect("reconcile succeeds");
    assert!(matches!(outcome, ReconcileOutcome::AlreadyCorrect { .. }));
    assert_eq!(provider.set_call_count(), 1);
}
