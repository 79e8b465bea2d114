//! Binding selection
//!
//! A binding is the resolved combination of transport security, message
//! encoding and credential handling used to open a channel to a WITSML Store
//! endpoint. It is derived from [`ConnectionOptions`] and never mutated.
//!
//! Two selection functions exist:
//!
//! - [`BindingSelector::resolve`] looks at the hostname scheme and the
//!   presence of a client certificate, and rejects combinations it has no
//!   binding for (a certificate on a plain `http` endpoint, unknown schemes).
//!   This is the default policy.
//! - [`BindingSelector::select_by_certificate`] only looks at the
//!   certificate and always produces a TLS binding.
//!
//! Both leave the send timeout unset on the client certificate binding.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::options::ConnectionOptions;

/// Largest message size a binding accepts, effectively unbounded
pub const UNBOUNDED_MESSAGE_SIZE: u64 = u64::MAX;

/// Transport security mode of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityMode {
    /// Plain HTTP, credentials in the Authorization header only
    TransportCredentialOnly,
    /// TLS transport, Basic credentials
    Transport,
    /// TLS transport requiring a client certificate, Basic authentication scheme
    TransportWithClientCertificate,
}

impl SecurityMode {
    pub fn requires_tls(&self) -> bool {
        !matches!(self, Self::TransportCredentialOnly)
    }

    pub fn requires_client_certificate(&self) -> bool {
        matches!(self, Self::TransportWithClientCertificate)
    }
}

/// Message encoding used on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageEncoding {
    /// SOAP 1.1 envelopes as `text/xml`
    Soap11Text,
}

impl MessageEncoding {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Soap11Text => "text/xml; charset=utf-8",
        }
    }
}

/// How the client authenticates at the HTTP layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialType {
    Basic,
}

/// Which selection function a client factory applies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// [`BindingSelector::resolve`]
    #[default]
    SchemeAware,
    /// [`BindingSelector::select_by_certificate`]
    CertificatePresence,
}

/// Resolved, immutable channel configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfiguration {
    pub security_mode: SecurityMode,
    pub message_encoding: MessageEncoding,
    pub credential_type: CredentialType,
    pub max_received_message_size: u64,
    /// `None` means no send timeout is applied by the transport
    pub send_timeout: Option<Duration>,
}

impl BindingConfiguration {
    /// Plain HTTP binding with Basic credentials
    pub fn basic_http(request_timeout: Duration) -> Self {
        Self {
            security_mode: SecurityMode::TransportCredentialOnly,
            message_encoding: MessageEncoding::Soap11Text,
            credential_type: CredentialType::Basic,
            max_received_message_size: UNBOUNDED_MESSAGE_SIZE,
            send_timeout: Some(request_timeout),
        }
    }

    /// TLS binding with Basic credentials
    pub fn basic_https(request_timeout: Duration) -> Self {
        Self {
            security_mode: SecurityMode::Transport,
            ..Self::basic_http(request_timeout)
        }
    }

    /// TLS binding requiring a client certificate alongside Basic authentication.
    ///
    /// Takes no timeout: the request timeout is not carried into this binding.
    pub fn certificate_and_basic() -> Self {
        Self {
            security_mode: SecurityMode::TransportWithClientCertificate,
            message_encoding: MessageEncoding::Soap11Text,
            credential_type: CredentialType::Basic,
            max_received_message_size: UNBOUNDED_MESSAGE_SIZE,
            send_timeout: None,
        }
    }
}

/// Derives a [`BindingConfiguration`] from [`ConnectionOptions`]
pub struct BindingSelector;

impl BindingSelector {
    /// Select with the given policy
    pub fn select(
        policy: SelectionPolicy,
        options: &ConnectionOptions,
    ) -> ConfigResult<BindingConfiguration> {
        match policy {
            SelectionPolicy::SchemeAware => Self::resolve(options),
            SelectionPolicy::CertificatePresence => Ok(Self::select_by_certificate(options)),
        }
    }

    /// Scheme-aware resolution.
    ///
    /// | scheme  | certificate | binding                          |
    /// |---------|-------------|----------------------------------|
    /// | `http`  | no          | [`BindingConfiguration::basic_http`] |
    /// | `https` | no          | [`BindingConfiguration::basic_https`] |
    /// | `https` | yes         | [`BindingConfiguration::certificate_and_basic`] |
    ///
    /// Any other combination fails with [`ConfigError::UnsupportedBinding`].
    pub fn resolve(options: &ConnectionOptions) -> ConfigResult<BindingConfiguration> {
        Self::resolve_parts(
            options.scheme(),
            options.client_certificate().is_some(),
            options.request_timeout(),
        )
    }

    /// [`BindingSelector::resolve`] over the individual inputs, for callers
    /// that have not loaded certificate material yet
    pub fn resolve_parts(
        scheme: &str,
        has_certificate: bool,
        request_timeout: Duration,
    ) -> ConfigResult<BindingConfiguration> {
        match (scheme, has_certificate) {
            ("http", false) => Ok(BindingConfiguration::basic_http(request_timeout)),
            ("https", false) => Ok(BindingConfiguration::basic_https(request_timeout)),
            ("https", true) => Ok(BindingConfiguration::certificate_and_basic()),
            (scheme, has_certificate) => Err(ConfigError::UnsupportedBinding {
                scheme: scheme.to_string(),
                has_certificate,
            }),
        }
    }

    /// Two-branch selection that ignores the scheme entirely
    pub fn select_by_certificate(options: &ConnectionOptions) -> BindingConfiguration {
        match options.client_certificate() {
            None => BindingConfiguration::basic_https(options.request_timeout()),
            Some(_) => BindingConfiguration::certificate_and_basic(),
        }
    }
}
