//! Client construction
//!
//! [`ProtocolClientFactory`] turns [`ConnectionOptions`] into a ready
//! [`StoreClient`]:
//!
//! 1. resolve the binding (unsupported combinations fail here, before any
//!    client object exists),
//! 2. build the transport for the binding, with the client certificate as TLS
//!    identity when it carries a private key,
//! 3. record username and password in the credential store, certificate or not,
//! 4. report the certificate, a missing private key as a warning rather than
//!    an error,
//! 5. install the request interceptor with the Basic header.
//!
//! Construction never touches the network.

use std::sync::Arc;

use witsml_core::{
    AuthHeaderValue, BindingConfiguration, BindingSelector, ConnectionOptions, SelectionPolicy,
};

use crate::client::StoreClient;
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::Result;
use crate::interceptor::{HeaderPolicy, RequestInterceptor};
use crate::transport::{tls_identity, HttpTransport, ReqwestTransport};
use crate::types::ClientCredentials;

/// Builds [`StoreClient`]s. Each call produces an independent client.
#[derive(Clone)]
pub struct ProtocolClientFactory {
    selection_policy: SelectionPolicy,
    header_policy: HeaderPolicy,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl Default for ProtocolClientFactory {
    fn default() -> Self {
        Self {
            selection_policy: SelectionPolicy::default(),
            header_policy: HeaderPolicy::default(),
            diagnostics: Arc::new(TracingSink),
        }
    }
}

impl ProtocolClientFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.selection_policy = policy;
        self
    }

    pub fn with_header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.header_policy = policy;
        self
    }

    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        self.selection_policy
    }

    /// Resolve the binding `options` would get, without building anything
    pub fn binding_for(&self, options: &ConnectionOptions) -> Result<BindingConfiguration> {
        Ok(BindingSelector::select(self.selection_policy, options)?)
    }

    /// Build a client over the reqwest transport
    pub fn build(&self, options: &ConnectionOptions) -> Result<StoreClient> {
        let binding = self.binding_for(options)?;
        let identity = options
            .client_certificate()
            .map(tls_identity)
            .transpose()?
            .flatten();
        let transport = ReqwestTransport::new(&binding, identity)?;
        let credentials = self.credential_store(options);

        self.assemble(options, binding, credentials, transport)
    }

    /// Build a client over a caller-supplied transport.
    ///
    /// The interceptor still wraps `transport`; only the wire below it changes.
    /// Certificate material is recorded but not loaded, the transport owns TLS.
    pub fn build_with_transport<T>(
        &self,
        options: &ConnectionOptions,
        transport: T,
    ) -> Result<StoreClient>
    where
        T: HttpTransport + 'static,
    {
        let binding = self.binding_for(options)?;
        let credentials = self.credential_store(options);

        self.assemble(options, binding, credentials, transport)
    }

    /// Record credentials and report on the certificate. Runs once the
    /// transport exists, so diagnostics only describe clients that get built.
    fn credential_store(&self, options: &ConnectionOptions) -> ClientCredentials {
        if let Some(certificate) = options.client_certificate() {
            let endpoint = options.hostname().to_string();
            self.diagnostics
                .emit(Diagnostic::ClientCertificateConfigured {
                    endpoint: endpoint.clone(),
                    format: certificate.format(),
                });
            if !certificate.has_private_key() {
                self.diagnostics
                    .emit(Diagnostic::CertificateMissingPrivateKey { endpoint });
            }
        }

        ClientCredentials {
            user_name: options.credentials().clone(),
            client_certificate: options.client_certificate().cloned(),
        }
    }

    fn assemble<T>(
        &self,
        options: &ConnectionOptions,
        binding: BindingConfiguration,
        credentials: ClientCredentials,
        transport: T,
    ) -> Result<StoreClient>
    where
        T: HttpTransport + 'static,
    {
        let auth_header = AuthHeaderValue::basic(
            credentials.user_name.username(),
            credentials.user_name.password(),
        );
        let interceptor =
            RequestInterceptor::new(transport, auth_header)?.with_policy(self.header_policy);

        tracing::debug!(
            endpoint = %options.hostname(),
            security_mode = ?binding.security_mode,
            "Constructed WITSML store client"
        );

        Ok(StoreClient::new(
            Arc::new(interceptor),
            options.hostname().clone(),
            binding,
            credentials,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WitsmlClientError;
    use crate::testing::{RecordingSink, StubTransport};
    use std::time::Duration;
    use witsml_core::{ClientCertificate, ConfigError, Credentials, SecurityMode};

    const CERT_PEM: &[u8] = include_bytes!("../tests/fixtures/client.crt");
    const KEY_PEM: &[u8] = include_bytes!("../tests/fixtures/client.key");
    const PKCS12_WITH_KEY: &[u8] = include_bytes!("../tests/fixtures/client.p12");
    const PKCS12_WITHOUT_KEY: &[u8] = include_bytes!("../tests/fixtures/client-nokey.p12");
    const FIXTURE_PASSWORD: &str = "witsml";

    fn options(hostname: &str) -> ConnectionOptions {
        ConnectionOptions::new(hostname, Credentials::new("driller", "s3cret"))
            .unwrap()
            .with_request_timeout(Duration::from_secs(3))
    }

    fn factory_with_sink() -> (ProtocolClientFactory, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let factory = ProtocolClientFactory::new().with_diagnostics(sink.clone());
        (factory, sink)
    }

    #[test]
    fn builds_https_client_without_network() {
        let client = ProtocolClientFactory::new()
            .build(&options("https://witsml.example.com/store"))
            .unwrap();

        assert_eq!(client.endpoint().as_str(), "https://witsml.example.com/store");
        assert_eq!(client.binding().security_mode, SecurityMode::Transport);
        assert_eq!(client.binding().send_timeout, Some(Duration::from_secs(3)));
        assert_eq!(client.credentials().user_name.username(), "driller");
    }

    #[test]
    fn http_with_certificate_fails_before_client_exists() {
        let opts = options("http://witsml.example.com/store")
            .with_client_certificate(ClientCertificate::from_pem(CERT_PEM.to_vec(), None));
        let (factory, sink) = factory_with_sink();

        let err = factory.build(&opts).unwrap_err();

        assert!(matches!(
            err,
            WitsmlClientError::Configuration(ConfigError::UnsupportedBinding { .. })
        ));
        // Nothing reached the credential store step
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn certificate_presence_policy_accepts_http_with_certificate() {
        let opts = options("http://witsml.example.com/store")
            .with_client_certificate(ClientCertificate::from_pem(CERT_PEM.to_vec(), None));
        let client = ProtocolClientFactory::new()
            .with_selection_policy(SelectionPolicy::CertificatePresence)
            .with_diagnostics(Arc::new(RecordingSink::new()))
            .build(&opts)
            .unwrap();

        assert_eq!(
            client.binding().security_mode,
            SecurityMode::TransportWithClientCertificate
        );
    }

    #[test]
    fn certificate_without_key_warns_but_succeeds() {
        let opts = options("https://witsml.example.com/store")
            .with_client_certificate(ClientCertificate::from_pem(CERT_PEM.to_vec(), None));
        let (factory, sink) = factory_with_sink();

        let client = factory.build(&opts).unwrap();

        assert_eq!(client.binding(), &BindingConfiguration::certificate_and_basic());
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().any(|d| matches!(
            d,
            Diagnostic::CertificateMissingPrivateKey { endpoint } if endpoint.contains("witsml.example.com")
        )));
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn pem_certificate_with_key_builds_without_warning() {
        let certificate = ClientCertificate::from_pem(CERT_PEM.to_vec(), Some(KEY_PEM.to_vec()));
        assert!(tls_identity(&certificate).unwrap().is_some());

        let opts = options("https://witsml.example.com/store").with_client_certificate(certificate);
        let (factory, sink) = factory_with_sink();

        let client = factory.build(&opts).unwrap();

        assert!(client.credentials().client_certificate.is_some());
        // Credentials stay configured alongside the certificate
        assert_eq!(client.credentials().user_name.password(), "s3cret");
        assert!(sink.warnings().is_empty());
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn pkcs12_with_key_builds_without_warning() {
        let certificate =
            ClientCertificate::from_pkcs12(PKCS12_WITH_KEY.to_vec(), FIXTURE_PASSWORD);
        assert!(tls_identity(&certificate).unwrap().is_some());

        let opts = options("https://witsml.example.com/store").with_client_certificate(certificate);
        let (factory, sink) = factory_with_sink();

        let client = factory.build(&opts).unwrap();

        assert_eq!(
            client.binding().security_mode,
            SecurityMode::TransportWithClientCertificate
        );
        assert!(sink.warnings().is_empty());
        assert!(matches!(
            sink.diagnostics().as_slice(),
            [Diagnostic::ClientCertificateConfigured { format: "pkcs12", .. }]
        ));
    }

    #[test]
    fn pkcs12_without_key_warns_but_succeeds() {
        let opts = options("https://witsml.example.com/store").with_client_certificate(
            ClientCertificate::from_pkcs12(PKCS12_WITHOUT_KEY.to_vec(), FIXTURE_PASSWORD),
        );
        let (factory, sink) = factory_with_sink();

        let client = factory.build(&opts).unwrap();

        assert_eq!(client.binding(), &BindingConfiguration::certificate_and_basic());
        assert_eq!(sink.diagnostics().len(), 2);
        assert!(matches!(
            sink.warnings().as_slice(),
            [Diagnostic::CertificateMissingPrivateKey { .. }]
        ));
    }

    #[test]
    fn unreadable_certificate_fails_without_diagnostics() {
        let opts = options("https://witsml.example.com/store")
            .with_client_certificate(ClientCertificate::from_pkcs12(vec![0u8; 16], "pw"));
        let (factory, sink) = factory_with_sink();

        let err = factory.build(&opts).unwrap_err();

        assert!(matches!(err, WitsmlClientError::InvalidCertificate(_)));
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn invalid_hostname_is_configuration_error() {
        let err = ConnectionOptions::new("not a url", Credentials::new("u", "p")).unwrap_err();
        let err: WitsmlClientError = err.into();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn stub_transport_sees_auth_header() {
        let stub = Arc::new(StubTransport::new());
        let client = ProtocolClientFactory::new()
            .build_with_transport(&options("https://witsml.example.com/store"), stub.clone())
            .unwrap();

        client.get_version().await.unwrap();

        let expected = AuthHeaderValue::basic("driller", "s3cret").unwrap();
        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].headers()[http::header::AUTHORIZATION],
            expected.as_str()
        );
    }

    #[tokio::test]
    async fn empty_credentials_send_no_auth_header() {
        let stub = Arc::new(StubTransport::new());
        let opts = ConnectionOptions::new("https://h/store", Credentials::new("", "")).unwrap();
        let client = ProtocolClientFactory::new()
            .build_with_transport(&opts, stub.clone())
            .unwrap();

        client.get_version().await.unwrap();

        assert!(stub.requests()[0]
            .headers()
            .get(http::header::AUTHORIZATION)
            .is_none());
    }

    #[test]
    fn independent_clients_per_build() {
        let factory = ProtocolClientFactory::new();
        let a = factory.build(&options("https://a.example.com")).unwrap();
        let b = factory.build(&options("https://a.example.com")).unwrap();
        assert_ne!(a.session_id(), b.session_id());
    }
}
