//! HTTP surface
//!
//! Thin dispatch onto the registry and the reconciler. Every response is JSON
//! with a `status` of `"OK"` or `"BAD"`.
//!
//! | route            | auth          |
//! |------------------|---------------|
//! | `/add_domain`    | admin (basic) |
//! | `/update`        | domain token  |
//! | `/list`          | admin (basic) |
//! | `/delete_domain` | admin (basic) |
//! | `/health`        | none          |

use anyhow::Result;
use axum::Router;
use axum::routing::get;
use ddns_core::{DomainRegistry, Reconciler, ServiceConfig};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod error;
pub mod handlers;

pub use auth::{AdminAuth, AdminCredentials};
pub use error::ApiError;

pub struct AppState {
    pub registry: DomainRegistry,
    pub reconciler: Reconciler,
    pub admin: AdminCredentials,
    pub service: ServiceConfig,
}

impl AppState {
    /// Shared state over a reconciler and the registry it persists into
    pub fn new(reconciler: Reconciler, admin: AdminCredentials, service: ServiceConfig) -> Self {
        Self {
            registry: reconciler.registry().clone(),
            reconciler,
            admin,
            service,
        }
    }
}

pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/add_domain", get(handlers::add_domain))
        .route("/update", get(handlers::update))
        .route("/list", get(handlers::list))
        .route("/delete_domain", get(handlers::delete_domain))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the router on `listener` until `shutdown` resolves
///
/// In-flight requests are allowed to finish after `shutdown` fires.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("DDNS API listening on http://{}", addr);

    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
