//! Test utilities for witsml-client
//!
//! Provides an axum-backed stub WITSML Store, an in-process stub transport and
//! a diagnostic sink that records what client construction reported.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Router;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Method, StatusCode, Uri};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use witsml_core::{ConnectionOptions, Credentials};

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Result, WitsmlClientError};
use crate::factory::ProtocolClientFactory;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::StoreClient;

/// Username the default test client authenticates with
pub const TEST_USERNAME: &str = "witsml-user";
/// Password the default test client authenticates with
pub const TEST_PASSWORD: &str = "witsml-pass";

/// Canned `WMLS_GetVersion` response envelope
pub const GET_VERSION_RESPONSE: &str = concat!(
    r#"<?xml version="1.0" encoding="utf-8"?>"#,
    r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body>"#,
    r#"<WMLS_GetVersionResponse xmlns="http://www.witsml.org/message/120">"#,
    r#"<Result>1.4.1.1</Result></WMLS_GetVersionResponse>"#,
    r#"</soap:Body></soap:Envelope>"#
);

/// A request as seen by a stub
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Debug)]
struct Script {
    queued: VecDeque<StatusCode>,
    fallback: StatusCode,
    body: String,
}

impl Script {
    fn next_status(&mut self) -> StatusCode {
        self.queued.pop_front().unwrap_or(self.fallback)
    }
}

// =============================================================================
// Stub store server
// =============================================================================

/// Scripted WITSML Store served over HTTP by [`TestServer`].
///
/// Answers every path and method, recording each request. Responds with the
/// queued statuses in order, then with the fallback status (200 by default).
#[derive(Clone)]
pub struct StubStore {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    script: Arc<Mutex<Script>>,
}

impl Default for StubStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StubStore {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            script: Arc::new(Mutex::new(Script {
                queued: VecDeque::new(),
                fallback: StatusCode::OK,
                body: GET_VERSION_RESPONSE.to_string(),
            })),
        }
    }

    /// Respond with `status` from now on
    pub fn respond_with(&self, status: StatusCode) {
        self.script.lock().fallback = status;
    }

    /// Respond with `status` once, ahead of the fallback
    pub fn enqueue(&self, status: StatusCode) {
        self.script.lock().queued.push_back(status);
    }

    pub fn set_body(&self, body: impl Into<String>) {
        self.script.lock().body = body.into();
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn router(&self) -> Router {
        Router::new().fallback(handle_store).with_state(self.clone())
    }
}

async fn handle_store(
    State(store): State<StubStore>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    store.requests.lock().push(RecordedRequest {
        method,
        uri,
        headers,
        body,
    });

    let (status, body) = {
        let mut script = store.script.lock();
        (script.next_status(), script.body.clone())
    };

    (status, [(CONTENT_TYPE, "text/xml; charset=utf-8")], body).into_response()
}

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: StubStore,
    pub client: StoreClient,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Start a stub store and a client authenticating with the test credentials
    ///
    /// # Example
    ///
    /// ```ignore
    /// use witsml_client::testing::TestServer;
    ///
    /// let server = TestServer::start().await?;
    /// let response = server.client.get_version().await?;
    /// assert_eq!(server.store.requests().len(), 1);
    /// ```
    pub async fn start() -> Result<Self> {
        Self::start_with_credentials(
            Credentials::new(TEST_USERNAME, TEST_PASSWORD),
            Duration::from_secs(5),
        )
        .await
    }

    /// Start with custom credentials and request timeout
    pub async fn start_with_credentials(credentials: Credentials, timeout: Duration) -> Result<Self> {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let store = StubStore::new();
        let router = store.router();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        let options = ConnectionOptions::new(&endpoint_for(addr), credentials)?
            .with_request_timeout(timeout);
        let client = ProtocolClientFactory::new().build(&options)?;

        Ok(Self {
            addr,
            store,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Store endpoint URL of the test server
    pub fn endpoint(&self) -> String {
        endpoint_for(self.addr)
    }

    /// Get a reference to the client
    pub fn client(&self) -> &StoreClient {
        &self.client
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

fn endpoint_for(addr: SocketAddr) -> String {
    format!("http://{}/store", addr)
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal if not already done
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        // Abort the task if still running
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

// =============================================================================
// In-process transport
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum StubMode {
    Respond,
    Timeout,
    Hang,
}

/// [`HttpTransport`] that never touches the network.
///
/// Records every request it receives and answers with a scripted status.
pub struct StubTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    script: Mutex<Script>,
    mode: StubMode,
}

impl Default for StubTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl StubTransport {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            script: Mutex::new(Script {
                queued: VecDeque::new(),
                fallback: StatusCode::OK,
                body: GET_VERSION_RESPONSE.to_string(),
            }),
            mode: StubMode::Respond,
        }
    }

    pub fn respond_with(self, status: StatusCode) -> Self {
        self.script.lock().fallback = status;
        self
    }

    pub fn enqueue(self, status: StatusCode) -> Self {
        self.script.lock().queued.push_back(status);
        self
    }

    pub fn with_body(self, body: impl Into<String>) -> Self {
        self.script.lock().body = body.into();
        self
    }

    /// Fail every request with [`WitsmlClientError::Timeout`]
    pub fn fail_with_timeout(mut self) -> Self {
        self.mode = StubMode::Timeout;
        self
    }

    /// Never complete a request
    pub fn hang(mut self) -> Self {
        self.mode = StubMode::Hang;
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let (parts, body) = request.into_parts();
        self.requests.lock().push(RecordedRequest {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        });

        match self.mode {
            StubMode::Respond => {}
            StubMode::Timeout => return Err(WitsmlClientError::Timeout),
            StubMode::Hang => std::future::pending::<()>().await,
        }

        let (status, body) = {
            let mut script = self.script.lock();
            (script.next_status(), script.body.clone())
        };

        let mut response = http::Response::new(Bytes::from(body));
        *response.status_mut() = status;
        Ok(response)
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

/// [`DiagnosticSink`] that keeps everything it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .iter()
            .filter(|d| d.is_warning())
            .cloned()
            .collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_format() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        assert_eq!(endpoint_for(addr), "http://127.0.0.1:8080/store");
    }

    #[tokio::test]
    async fn stub_transport_follows_script() {
        let stub = StubTransport::new()
            .enqueue(StatusCode::INTERNAL_SERVER_ERROR)
            .respond_with(StatusCode::ACCEPTED);

        let request = || {
            http::Request::builder()
                .uri("http://h/")
                .body(Bytes::new())
                .unwrap()
        };

        assert_eq!(
            stub.send(request()).await.unwrap().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(stub.send(request()).await.unwrap().status(), StatusCode::ACCEPTED);
        assert_eq!(stub.requests().len(), 2);
    }
}
