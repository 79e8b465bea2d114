//! Connection options for one logical WITSML server connection

use std::fmt;
use std::time::Duration;

use openssl::pkcs12::Pkcs12;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Request timeout used when none is configured
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Username/password pair sent with every request
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    /// Create a credential pair. No validation is performed; empty values are
    /// passed through as-is.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// True when both username and password are empty
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password.expose_secret().is_empty()
    }
}

/// Client certificate material presented during the TLS handshake
#[derive(Clone)]
pub enum ClientCertificate {
    /// PEM encoded certificate with an optional PKCS#8 PEM private key
    Pem {
        certificate: Vec<u8>,
        private_key: Option<Vec<u8>>,
    },
    /// DER encoded PKCS#12 archive
    Pkcs12 { der: Vec<u8>, password: SecretString },
}

impl ClientCertificate {
    pub fn from_pem(certificate: impl Into<Vec<u8>>, private_key: Option<Vec<u8>>) -> Self {
        Self::Pem {
            certificate: certificate.into(),
            private_key,
        }
    }

    pub fn from_pkcs12(der: impl Into<Vec<u8>>, password: impl Into<String>) -> Self {
        Self::Pkcs12 {
            der: der.into(),
            password: SecretString::new(password.into()),
        }
    }

    /// Whether private key material is available.
    ///
    /// An unreadable PKCS#12 archive counts as keyless.
    pub fn has_private_key(&self) -> bool {
        self.private_key_present().unwrap_or(false)
    }

    /// Look for a private key, opening a PKCS#12 archive with its password.
    ///
    /// Fails only when the archive itself cannot be read.
    pub fn private_key_present(&self) -> ConfigResult<bool> {
        match self {
            Self::Pem { private_key, .. } => {
                Ok(private_key.as_ref().is_some_and(|k| !k.is_empty()))
            }
            Self::Pkcs12 { der, password } => {
                let parsed = Pkcs12::from_der(der)
                    .and_then(|archive| archive.parse2(password.expose_secret()))
                    .map_err(|e| ConfigError::InvalidCertificate(e.to_string()))?;
                Ok(parsed.pkey.is_some())
            }
        }
    }

    /// Short name of the encoding, for logs
    pub fn format(&self) -> &'static str {
        match self {
            Self::Pem { .. } => "pem",
            Self::Pkcs12 { .. } => "pkcs12",
        }
    }
}

impl fmt::Debug for ClientCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pem {
                certificate,
                private_key,
            } => f
                .debug_struct("Pem")
                .field("certificate_len", &certificate.len())
                .field("has_private_key", &private_key.is_some())
                .finish(),
            Self::Pkcs12 { der, .. } => f
                .debug_struct("Pkcs12")
                .field("der_len", &der.len())
                .finish_non_exhaustive(),
        }
    }
}

/// Everything needed to open a channel to one WITSML server.
///
/// Built once per logical server connection and never mutated afterwards; the
/// `with_*` methods consume and return the value. Credentials and the client
/// certificate are independent: a server may require both.
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    hostname: Url,
    credentials: Credentials,
    client_certificate: Option<ClientCertificate>,
    request_timeout: Duration,
}

impl ConnectionOptions {
    /// Create options for `hostname`, which must parse as an absolute URI.
    pub fn new(hostname: &str, credentials: Credentials) -> ConfigResult<Self> {
        let parsed = Url::parse(hostname).map_err(|source| ConfigError::InvalidHostname {
            hostname: hostname.to_string(),
            source,
        })?;

        Ok(Self::from_url(parsed, credentials))
    }

    pub fn from_url(hostname: Url, credentials: Credentials) -> Self {
        Self {
            hostname,
            credentials,
            client_certificate: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_client_certificate(mut self, certificate: ClientCertificate) -> Self {
        self.client_certificate = Some(certificate);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn hostname(&self) -> &Url {
        &self.hostname
    }

    pub fn scheme(&self) -> &str {
        self.hostname.scheme()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn client_certificate(&self) -> Option<&ClientCertificate> {
        self.client_certificate.as_ref()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}
