//! witsml-core - Connection primitives for WITSML Store clients
//!
//! This crate holds the pure, I/O-free half of the client layer: the options a
//! caller supplies for one server connection, the binding derived from them,
//! the HTTP Basic header value and the classification of completed HTTP
//! exchanges. The network half lives in `witsml-client`.

pub mod auth;
pub mod binding;
pub mod config;
pub mod error;
pub mod options;
pub mod outcome;

pub use auth::AuthHeaderValue;
pub use binding::{
    BindingConfiguration, BindingSelector, CredentialType, MessageEncoding, SecurityMode,
    SelectionPolicy, UNBOUNDED_MESSAGE_SIZE,
};
pub use config::{CertificateConfig, ServerConfig, ServersFile};
pub use error::{ConfigError, ConfigResult};
pub use options::{ClientCertificate, ConnectionOptions, Credentials, DEFAULT_REQUEST_TIMEOUT};
pub use outcome::ExchangeOutcome;

/// Product identifier stamped on every outbound request
pub const CLIENT_IDENTIFIER: &str = "witsml-explorer";
