//! WITSML Store client
//!
//! A [`StoreClient`] is a pass-through SOAP channel bound to one endpoint.
//! It is produced by [`ProtocolClientFactory`](crate::ProtocolClientFactory)
//! and owns the interceptor chain every exchange goes through.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::Method;
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;
use witsml_core::BindingConfiguration;

use crate::error::Result;
use crate::soap::{self, StoreOperation};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::types::{ClientCredentials, SoapResponse};

/// SOAP channel to one WITSML Store endpoint.
///
/// Cheap to clone; clones share the transport. Safe to use from several tasks
/// at once.
#[derive(Clone)]
pub struct StoreClient {
    transport: Arc<dyn HttpTransport>,
    endpoint: Url,
    binding: BindingConfiguration,
    credentials: ClientCredentials,
    session_id: Uuid,
}

impl StoreClient {
    pub(crate) fn new(
        transport: Arc<dyn HttpTransport>,
        endpoint: Url,
        binding: BindingConfiguration,
        credentials: ClientCredentials,
    ) -> Self {
        Self {
            transport,
            endpoint,
            binding,
            credentials,
            session_id: Uuid::new_v4(),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn binding(&self) -> &BindingConfiguration {
        &self.binding
    }

    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    /// Identifier of this client instance, attached to its log spans
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    // =========================================================================
    // Store operations
    // =========================================================================

    /// Invoke a Store operation with a caller-supplied operation element.
    ///
    /// `body` is placed verbatim inside `soap:Body`. The response envelope is
    /// returned unparsed; SOAP faults in a non-500 response are not errors here.
    #[instrument(skip(self, body), fields(session = %self.session_id, endpoint = %self.endpoint))]
    pub async fn call(&self, operation: StoreOperation, body: &str) -> Result<SoapResponse> {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri(self.endpoint.as_str())
            .header(CONTENT_TYPE, self.binding.message_encoding.content_type())
            .header("SOAPAction", operation.soap_action())
            .body(Bytes::from(soap::envelope(body)))?;

        let started = Instant::now();
        let response = self.transport.send(request).await?;
        debug!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "{} completed",
            operation
        );

        Ok(response.into())
    }

    /// `WMLS_GetVersion`
    pub async fn get_version(&self) -> Result<SoapResponse> {
        self.call(StoreOperation::GetVersion, &soap::get_version_body())
            .await
    }

    /// `WMLS_GetCap` with the given `OptionsIn` string (e.g. `dataVersion=1.4.1.1`)
    pub async fn get_cap(&self, options_in: &str) -> Result<SoapResponse> {
        self.call(StoreOperation::GetCap, &soap::get_cap_body(options_in))
            .await
    }

    /// Send an arbitrary HTTP request through the interceptor chain.
    ///
    /// Used for exchanges outside the Store envelope (WSDL retrieval and the
    /// like); they receive the same headers and failure classification.
    #[instrument(skip(self, request), fields(session = %self.session_id, uri = %request.uri()))]
    pub async fn send_raw(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.transport.send(request).await
    }
}

impl fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("binding", &self.binding)
            .field("credentials", &self.credentials)
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}
