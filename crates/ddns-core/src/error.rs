//! Error types for the DDNS update service
//!
//! One taxonomy is shared by the registry, the token check, the provider
//! client and the reconciler. The HTTP surface maps each variant to a status
//! code; see [`Error::http_status`].

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS update service
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed request parameters (always caller-fixable)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Token mismatch or unknown domain on the update path
    #[error("Unauthorized")]
    Unauthorized,

    /// Domain is already registered
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Registry lookup miss, or no matching record at the provider
    #[error("Not found: {0}")]
    NotFound(String),

    /// A provider call failed
    ///
    /// `status` is the upstream HTTP status when a response was received,
    /// `None` for transport failures and timeouts.
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Upstream HTTP status, if any
        status: Option<u16>,
        /// Upstream body or transport error text
        message: String,
    },

    /// The reconciler could not confirm or apply the upstream record
    #[error("{}", upstream_display(.status, .detail))]
    UpstreamFailure {
        /// Upstream HTTP status, if any
        status: Option<u16>,
        /// Provider diagnostic text
        detail: String,
    },

    /// Domain store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

fn upstream_display(status: &Option<u16>, detail: &str) -> String {
    match status {
        Some(code) => format!("Upstream failure (status {}): {}", code, detail),
        None => format!("Upstream failure: {}", detail),
    }
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider error carrying the upstream status and body
    pub fn provider(provider: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Convert a provider-side failure into the reconciler's `UpstreamFailure`
    ///
    /// Errors that did not come from the provider are returned unchanged.
    pub fn into_upstream(self) -> Self {
        match self {
            Self::Provider { status, message, .. } => Self::UpstreamFailure {
                status,
                detail: message,
            },
            Self::NotFound(detail) => Self::UpstreamFailure {
                status: None,
                detail,
            },
            other => other,
        }
    }

    /// HTTP status code this error is surfaced as
    ///
    /// `NotFound` is surfaced as 403 so an unauthenticated caller cannot tell
    /// a missing domain from a wrong token.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput(_) | Self::Conflict(_) => 400,
            Self::Unauthorized | Self::NotFound(_) => 403,
            Self::Provider { .. } | Self::UpstreamFailure { .. } | Self::Store(_) | Self::Config(_) => {
                500
            }
        }
    }
}
