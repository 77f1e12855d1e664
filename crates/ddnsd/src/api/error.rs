//! JSON error responses for the HTTP surface

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use ddns_core::{Error, ServiceConfig};
use serde_json::json;
use tracing::{error, warn};

/// Message returned for upstream failures when diagnostics are hidden
const UPSTREAM_FAILURE_MESSAGE: &str = "DNS provider request failed.";

/// An error on its way to the client
#[derive(Debug)]
pub enum ApiError {
    /// Missing or wrong admin credentials (401 + challenge)
    AuthRequired,

    /// Any other failure, already reduced to what the client may see
    Failed { status: StatusCode, message: String },
}

impl ApiError {
    /// Map a core error to a client-facing error
    ///
    /// Provider diagnostics are only passed through when
    /// `expose_provider_errors` is set; otherwise they are logged and
    /// replaced by a generic message. Store and configuration details are
    /// never returned.
    pub fn from_core(err: Error, service: &ServiceConfig) -> Self {
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = match &err {
            Error::InvalidInput(msg) | Error::Conflict(msg) => msg.clone(),
            Error::Unauthorized | Error::NotFound(_) => "DDNS authentication failed.".to_string(),
            Error::UpstreamFailure { .. } | Error::Provider { .. } => {
                if service.expose_provider_errors {
                    err.to_string()
                } else {
                    warn!("{}", err);
                    UPSTREAM_FAILURE_MESSAGE.to_string()
                }
            }
            Error::Store(_) | Error::Config(_) => {
                error!("{}", err);
                "Internal server error".to_string()
            }
        };

        ApiError::Failed { status, message }
    }
}

// Malformed query strings get the same JSON body as every other failure
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Failed {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::AuthRequired => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, r#"Basic realm="ddns""#)],
                Json(json!({ "status": "BAD", "message": "Authentication required" })),
            )
                .into_response(),
            ApiError::Failed { status, message } => {
                (status, Json(json!({ "status": "BAD", "message": message }))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_of(err: ApiError) -> (StatusCode, String) {
        match err {
            ApiError::Failed { status, message } => (status, message),
            ApiError::AuthRequired => panic!("unexpected AuthRequired"),
        }
    }

    #[test]
    fn test_status_mapping() {
        let service = ServiceConfig::default();
        let cases = [
            (Error::invalid_input("Domain is missing"), StatusCode::BAD_REQUEST),
            (Error::conflict("dup"), StatusCode::BAD_REQUEST),
            (Error::Unauthorized, StatusCode::FORBIDDEN),
            (Error::not_found("x"), StatusCode::FORBIDDEN),
            (Error::store("disk"), StatusCode::INTERNAL_SERVER_ERROR),
            (Error::config("bad"), StatusCode::INTERNAL_SERVER_ERROR),
            (
                Error::provider("cloudflare", Some(500), "boom").into_upstream(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(message_of(ApiError::from_core(err, &service)).0, expected);
        }
    }

    #[test]
    fn test_provider_detail_hidden_by_default() {
        let err = Error::provider("cloudflare", Some(502), "secret upstream body").into_upstream();
        let (_, message) = message_of(ApiError::from_core(err, &ServiceConfig::default()));
        assert_eq!(message, UPSTREAM_FAILURE_MESSAGE);
    }

    #[test]
    fn test_provider_detail_exposed_when_enabled() {
        let service = ServiceConfig {
            expose_provider_errors: true,
        };
        let err = Error::provider("cloudflare", Some(502), "bad gateway").into_upstream();
        let (_, message) = message_of(ApiError::from_core(err, &service));
        assert!(message.contains("502"));
        assert!(message.contains("bad gateway"));
    }

    #[test]
    fn test_store_detail_never_exposed() {
        let service = ServiceConfig {
            expose_provider_errors: true,
        };
        let (_, message) = message_of(ApiError::from_core(Error::store("disk I/O"), &service));
        assert!(!message.contains("disk"));
    }
}
