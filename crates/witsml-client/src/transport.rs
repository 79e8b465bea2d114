//! HTTP transport seam
//!
//! Everything the client sends goes through an [`HttpTransport`]. The
//! production implementation is [`ReqwestTransport`]; the interceptor wraps
//! any transport, and tests substitute in-process stubs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Identity};
use secrecy::ExposeSecret;
use witsml_core::{BindingConfiguration, ClientCertificate};

use crate::error::{Result, WitsmlClientError};

pub type HttpRequest = http::Request<Bytes>;
pub type HttpResponse = http::Response<Bytes>;

/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends one HTTP request and waits for the complete response
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).send(request).await
    }
}

/// [`HttpTransport`] over a `reqwest::Client` configured from a binding
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    max_received_message_size: u64,
    connect_timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Build a transport for `binding`.
    ///
    /// TLS bindings refuse plain `http` URLs. Send and connect timeouts are
    /// applied only when the binding carries a send timeout. `identity` is
    /// presented during the TLS handshake when given.
    pub fn new(binding: &BindingConfiguration, identity: Option<Identity>) -> Result<Self> {
        let mut builder = Client::builder();
        let connect_timeout = binding.send_timeout.map(|_| DEFAULT_CONNECT_TIMEOUT);

        // A binding without a send timeout gets no connect limit either
        if let Some(timeout) = binding.send_timeout {
            builder = builder
                .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
                .timeout(timeout);
        }
        if binding.security_mode.requires_tls() {
            builder = builder.https_only(true);
        }
        if let Some(identity) = identity {
            builder = builder.identity(identity);
        }

        Ok(Self {
            client: builder.build()?,
            max_received_message_size: binding.max_received_message_size,
            connect_timeout,
        })
    }

    /// Connect-phase limit, present only alongside a send timeout
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    fn check_size(&self, size: u64) -> Result<()> {
        if size > self.max_received_message_size {
            return Err(WitsmlClientError::MessageTooLarge {
                size,
                limit: self.max_received_message_size,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let request = reqwest::Request::try_from(request)?;
        let response = self
            .client
            .execute(request)
            .await
            .map_err(map_reqwest_error)?;

        if let Some(length) = response.content_length() {
            self.check_size(length)?;
        }

        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        self.check_size(body.len() as u64)?;

        let mut converted = http::Response::new(body);
        *converted.status_mut() = status;
        *converted.version_mut() = version;
        *converted.headers_mut() = headers;
        Ok(converted)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> WitsmlClientError {
    if err.is_timeout() {
        WitsmlClientError::Timeout
    } else {
        WitsmlClientError::HttpError(err)
    }
}

/// TLS identity for a client certificate.
///
/// Returns `None` when the certificate carries no private key, PEM or PKCS#12:
/// the handshake then proceeds without a client identity and the server decides.
pub fn tls_identity(certificate: &ClientCertificate) -> Result<Option<Identity>> {
    if !certificate
        .private_key_present()
        .map_err(|e| WitsmlClientError::InvalidCertificate(e.to_string()))?
    {
        return Ok(None);
    }

    let identity = match certificate {
        ClientCertificate::Pem {
            certificate,
            private_key: Some(key),
        } => Identity::from_pkcs8_pem(certificate, key),
        ClientCertificate::Pem { .. } => return Ok(None),
        ClientCertificate::Pkcs12 { der, password } => {
            Identity::from_pkcs12_der(der, password.expose_secret())
        }
    };

    identity
        .map(Some)
        .map_err(|e| WitsmlClientError::InvalidCertificate(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CERT_PEM: &[u8] = include_bytes!("../tests/fixtures/client.crt");
    const KEY_PEM: &[u8] = include_bytes!("../tests/fixtures/client.key");
    const PKCS12_WITH_KEY: &[u8] = include_bytes!("../tests/fixtures/client.p12");
    const PKCS12_WITHOUT_KEY: &[u8] = include_bytes!("../tests/fixtures/client-nokey.p12");
    const FIXTURE_PASSWORD: &str = "witsml";

    #[test]
    fn builds_for_each_binding() {
        let timeout = Duration::from_secs(5);
        assert!(ReqwestTransport::new(&BindingConfiguration::basic_http(timeout), None).is_ok());
        assert!(ReqwestTransport::new(&BindingConfiguration::basic_https(timeout), None).is_ok());
        assert!(ReqwestTransport::new(&BindingConfiguration::certificate_and_basic(), None).is_ok());
    }

    #[test]
    fn certificate_binding_has_no_timeouts() {
        let transport =
            ReqwestTransport::new(&BindingConfiguration::certificate_and_basic(), None).unwrap();
        assert_eq!(transport.connect_timeout(), None);

        let transport =
            ReqwestTransport::new(&BindingConfiguration::basic_https(Duration::from_secs(5)), None)
                .unwrap();
        assert_eq!(transport.connect_timeout(), Some(DEFAULT_CONNECT_TIMEOUT));
    }

    #[test]
    fn size_limit_enforced() {
        let mut binding = BindingConfiguration::basic_http(Duration::from_secs(1));
        binding.max_received_message_size = 10;
        let transport = ReqwestTransport::new(&binding, None).unwrap();

        assert!(transport.check_size(10).is_ok());
        assert!(matches!(
            transport.check_size(11),
            Err(WitsmlClientError::MessageTooLarge { size: 11, limit: 10 })
        ));
    }

    #[test]
    fn pem_without_key_has_no_identity() {
        let cert = ClientCertificate::from_pem(b"not a real certificate".to_vec(), None);
        assert!(tls_identity(&cert).unwrap().is_none());
    }

    #[test]
    fn pkcs12_identity_depends_on_key() {
        let keyed = ClientCertificate::from_pkcs12(PKCS12_WITH_KEY.to_vec(), FIXTURE_PASSWORD);
        assert!(tls_identity(&keyed).unwrap().is_some());

        let keyless = ClientCertificate::from_pkcs12(PKCS12_WITHOUT_KEY.to_vec(), FIXTURE_PASSWORD);
        assert!(!keyless.has_private_key());
        assert!(tls_identity(&keyless).unwrap().is_none());
    }

    #[test]
    fn pem_with_key_has_identity() {
        let cert = ClientCertificate::from_pem(CERT_PEM.to_vec(), Some(KEY_PEM.to_vec()));
        assert!(tls_identity(&cert).unwrap().is_some());
    }

    #[test]
    fn garbage_pkcs12_is_rejected() {
        let cert = ClientCertificate::from_pkcs12(vec![0u8; 16], "pw");
        assert!(matches!(
            tls_identity(&cert),
            Err(WitsmlClientError::InvalidCertificate(_))
        ));
    }
}
