//! Response and credential types returned by the client

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use witsml_core::{ClientCertificate, Credentials};

use crate::transport::HttpResponse;

/// Raw response to a Store operation. The envelope is not parsed.
#[derive(Debug, Clone)]
pub struct SoapResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl SoapResponse {
    /// Body as text (lossy UTF-8)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl From<HttpResponse> for SoapResponse {
    fn from(response: HttpResponse) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }
}

/// Credential store of a constructed client
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    /// Always populated, even when a certificate is present
    pub user_name: Credentials,
    pub client_certificate: Option<ClientCertificate>,
}
