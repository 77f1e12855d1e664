use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ddns_core::auth::constant_time_eq;
use std::sync::Arc;
use tracing::debug;

use super::AppState;
use super::error::ApiError;

/// Administrator credentials for the management routes
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check a presented pair without short-circuiting on the username
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let user_ok = constant_time_eq(self.username.as_bytes(), username.as_bytes());
        let pass_ok = constant_time_eq(self.password.as_bytes(), password.as_bytes());
        user_ok & pass_ok
    }
}

/// Axum extractor that requires valid HTTP basic-auth admin credentials.
/// Add this as a handler parameter to protect a route.
pub struct AdminAuth;

impl FromRequestParts<Arc<AppState>> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let (username, password) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_basic)
            .ok_or(ApiError::AuthRequired)?;

        if !state.admin.matches(&username, &password) {
            debug!("Rejected admin credentials");
            return Err(ApiError::AuthRequired);
        }

        Ok(AdminAuth)
    }
}

/// Decode an `Authorization: Basic <base64(user:pass)>` header value
///
/// The scheme name is matched case-insensitively (RFC 7617).
fn parse_basic(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
