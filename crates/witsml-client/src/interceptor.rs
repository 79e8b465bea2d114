//! Request interceptor
//!
//! Sits below the SOAP envelope and sees every HTTP exchange the client makes.
//! On the way out it stamps the client identifier and the Basic authorization
//! header; on the way back it turns HTTP 500 and 401/403 into typed errors.
//! Nothing is retried here.

use async_trait::async_trait;
use http::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, USER_AGENT};
use tracing::warn;
use witsml_core::{AuthHeaderValue, ExchangeOutcome, CLIENT_IDENTIFIER};

use crate::error::{Result, WitsmlClientError};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// How stamped headers interact with values already on the request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderPolicy {
    /// Replace any existing value
    #[default]
    LastWriteWins,
    /// Leave a value set by the caller untouched
    KeepExisting,
}

/// [`HttpTransport`] wrapper that stamps headers and classifies responses
pub struct RequestInterceptor<T> {
    inner: T,
    auth_header: Option<HeaderValue>,
    policy: HeaderPolicy,
}

impl<T: HttpTransport> RequestInterceptor<T> {
    /// Wrap `inner`. No Authorization header is stamped when `auth_header` is `None`.
    pub fn new(inner: T, auth_header: Option<AuthHeaderValue>) -> Result<Self> {
        let auth_header = auth_header
            .map(|value| {
                let mut value = HeaderValue::from_str(value.as_str()).map_err(http::Error::from)?;
                value.set_sensitive(true);
                Ok::<_, WitsmlClientError>(value)
            })
            .transpose()?;

        Ok(Self {
            inner,
            auth_header,
            policy: HeaderPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: HeaderPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> HeaderPolicy {
        self.policy
    }

    fn stamp(&self, headers: &mut HeaderMap) {
        self.set(headers, USER_AGENT, HeaderValue::from_static(CLIENT_IDENTIFIER));
        if let Some(auth) = &self.auth_header {
            self.set(headers, AUTHORIZATION, auth.clone());
        }
    }

    fn set(&self, headers: &mut HeaderMap, name: HeaderName, value: HeaderValue) {
        match self.policy {
            HeaderPolicy::LastWriteWins => {
                headers.insert(name, value);
            }
            HeaderPolicy::KeepExisting => {
                headers.entry(name).or_insert(value);
            }
        }
    }
}

/// Map a completed exchange to the caller-visible result
pub fn classify(response: HttpResponse) -> Result<HttpResponse> {
    let status = response.status().as_u16();

    match ExchangeOutcome::from_status(status) {
        ExchangeOutcome::ServerFault => {
            warn!(status, "WITSML remote request failed on the server");
            Err(WitsmlClientError::RemoteServerCrashed)
        }
        ExchangeOutcome::AuthFailure => {
            warn!(status, "WITSML server rejected the supplied credentials");
            Err(WitsmlClientError::AuthenticationRejected { status })
        }
        ExchangeOutcome::Success => Ok(response),
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for RequestInterceptor<T> {
    async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse> {
        self.stamp(request.headers_mut());
        // Inner errors, including timeouts, pass through untouched
        let response = self.inner.send(request).await?;
        classify(response)
    }
}
