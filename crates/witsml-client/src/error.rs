//! Error types for WITSML client operations

use thiserror::Error;
use witsml_core::ConfigError;

/// Result type alias for WITSML client operations
pub type Result<T> = std::result::Result<T, WitsmlClientError>;

/// Errors that can occur while building a client or exchanging messages
#[derive(Error, Debug)]
pub enum WitsmlClientError {
    /// Unsupported scheme/certificate combination or invalid options.
    /// Raised at construction time, before any network activity.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The remote store answered HTTP 500
    #[error("WITSML remote request failed on the server")]
    RemoteServerCrashed,

    /// The remote store answered HTTP 401 or 403
    #[error("Not able to authenticate to WITSML server with given credentials (HTTP {status})")]
    AuthenticationRejected { status: u16 },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request could not be assembled
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] http::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Client certificate material was rejected by the TLS backend
    #[error("Invalid client certificate: {0}")]
    InvalidCertificate(String),

    /// Response body exceeded the binding's maximum message size
    #[error("Response of {size} bytes exceeds the maximum message size of {limit} bytes")]
    MessageTooLarge { size: u64, limit: u64 },

    /// Timeout
    #[error("Request timed out")]
    Timeout,

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WitsmlClientError {
    /// Credentials or certificate were rejected; re-prompting makes sense, retrying does not
    pub fn is_authentication_rejected(&self) -> bool {
        matches!(self, Self::AuthenticationRejected { .. })
    }

    /// The remote store crashed while handling the request
    pub fn is_remote_server_crash(&self) -> bool {
        matches!(self, Self::RemoteServerCrashed)
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
