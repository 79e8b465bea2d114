//! Configuration errors raised before any network activity

use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while building connection options or resolving a binding
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No binding exists for this scheme / certificate combination
    #[error("No binding supported for scheme '{scheme}' (client certificate: {has_certificate})")]
    UnsupportedBinding {
        /// URI scheme of the configured hostname
        scheme: String,
        /// Whether a client certificate was supplied
        has_certificate: bool,
    },

    /// Hostname could not be parsed as a URI
    #[error("Invalid hostname '{hostname}': {source}")]
    InvalidHostname {
        hostname: String,
        #[source]
        source: url::ParseError,
    },

    /// Server profile has neither an inline password nor a usable environment variable
    #[error("No password configured for server '{0}'")]
    MissingPassword(String),

    /// Reading a configuration or certificate file failed
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Certificate material could not be read
    #[error("Invalid client certificate: {0}")]
    InvalidCertificate(String),

    /// Configuration file could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Create an IO error tagged with the path being read
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
