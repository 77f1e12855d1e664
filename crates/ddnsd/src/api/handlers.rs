use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

use super::AppState;
use super::auth::AdminAuth;
use super::error::ApiError;

type ApiResult = Result<Json<Value>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct AddDomainParams {
    pub domain: Option<String>,
}

// Token deliberately not Debug-printable
#[derive(Deserialize)]
pub struct UpdateParams {
    pub domain: Option<String>,
    pub ip: Option<String>,
    pub token: Option<String>,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

/// GET /add_domain?domain=<d>
pub async fn add_domain(
    _admin: AdminAuth,
    State(state): State<Arc<AppState>>,
    query: Result<Query<AddDomainParams>, QueryRejection>,
) -> ApiResult {
    let Query(params) = query?;
    let domain = params.domain.unwrap_or_default();
    if domain.trim().is_empty() {
        return Err(ApiError::from_core(
            ddns_core::Error::invalid_input("Domain is missing"),
            &state.service,
        ));
    }

    let token = state
        .registry
        .register(&domain)
        .await
        .map_err(|e| ApiError::from_core(e, &state.service))?;

    Ok(Json(json!({ "status": "OK", "token": token })))
}

/// GET /update?domain=<d>&ip=<ip>&token=<t>
pub async fn update(
    State(state): State<Arc<AppState>>,
    query: Result<Query<UpdateParams>, QueryRejection>,
) -> ApiResult {
    let Query(params) = query?;
    let outcome = state
        .reconciler
        .reconcile(
            params.domain.as_deref().unwrap_or_default(),
            params.ip.as_deref().unwrap_or_default(),
            params.token.as_deref().unwrap_or_default(),
        )
        .await
        .map_err(|e| ApiError::from_core(e, &state.service))?;

    Ok(Json(json!({ "status": "OK", "message": outcome.message() })))
}

/// GET /list
pub async fn list(_admin: AdminAuth, State(state): State<Arc<AppState>>) -> ApiResult {
    let domains = state
        .registry
        .list()
        .await
        .map_err(|e| ApiError::from_core(e, &state.service))?;

    Ok(Json(json!({ "status": "OK", "domains": domains })))
}

/// GET /delete_domain
///
/// Acknowledges the request without deleting anything.
pub async fn delete_domain(_admin: AdminAuth) -> Json<Value> {
    info!("delete_domain called; domain deletion is not supported");
    Json(json!({
        "status": "OK",
        "message": "Domain deletion is not supported; nothing was deleted."
    }))
}
