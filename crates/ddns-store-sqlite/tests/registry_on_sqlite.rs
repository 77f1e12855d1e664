//! The domain registry running on the SQLite store

use ddns_core::{DomainRegistry, Error, TokenAuthenticator};
use ddns_store_sqlite::SqliteDomainStore;
use std::net::Ipv4Addr;
use std::sync::Arc;

async fn registry() -> DomainRegistry {
    let store = SqliteDomainStore::connect("sqlite::memory:")
        .await
        .expect("in-memory database opens");
    DomainRegistry::new(Arc::new(store))
}

#[tokio::test]
async fn register_authenticate_and_record() {
    let registry = registry().await;

    let token = registry
        .register("Home.Example.com")
        .await
        .expect("registration succeeds");

    let auth = TokenAuthenticator::new(registry.clone());
    assert!(auth.authenticate("home.example.com", &token).await.unwrap());
    assert!(!auth.authenticate("home.example.com", "wrong").await.unwrap());

    registry
        .record_success("home.example.com", Ipv4Addr::new(203, 0, 113, 7), chrono::Utc::now())
        .await
        .expect("record succeeds");

    let summaries = registry.list().await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].domain, "home.example.com");
    assert_eq!(summaries[0].last_ip.as_deref(), Some("203.0.113.7"));
}

#[tokio::test]
async fn duplicate_registration_keeps_first_token() {
    let registry = registry().await;

    let token = registry.register("home.example.com").await.unwrap();
    let err = registry.register("home.example.com.").await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(err.http_status(), 400);

    assert_eq!(registry.lookup_token("home.example.com").await.unwrap(), token);
}

#[tokio::test]
async fn file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("ddns.db").display());

    let token = {
        let store = SqliteDomainStore::connect(&url).await.unwrap();
        let token = DomainRegistry::new(Arc::new(store.clone()))
            .register("home.example.com")
            .await
            .unwrap();
        store.close().await;
        token
    };

    let store = SqliteDomainStore::connect(&url).await.unwrap();
    let registry = DomainRegistry::new(Arc::new(store.clone()));
    assert_eq!(registry.lookup_token("home.example.com").await.unwrap(), token);
    store.close().await;
}
