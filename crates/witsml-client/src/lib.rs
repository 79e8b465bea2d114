//! WITSML Store Client Library
//!
//! Opens an authenticated SOAP-over-HTTP(S) channel to a WITSML Store server
//! and reports transport-level failures as typed errors.
//!
//! # Example
//!
//! ```rust,no_run
//! use witsml_client::{ProtocolClientFactory, StoreOperation};
//! use witsml_core::{ConnectionOptions, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let options = ConnectionOptions::new(
//!         "https://witsml.example.com/store/WMLS.asmx",
//!         Credentials::new("driller", "s3cret"),
//!     )?;
//!     let client = ProtocolClientFactory::new().build(&options)?;
//!
//!     let version = client.get_version().await?;
//!     println!("{}", version.text());
//!
//!     // Any other Store operation is a pass-through
//!     let query = r#"<WMLS_GetFromStore xmlns="http://www.witsml.org/message/120">...</WMLS_GetFromStore>"#;
//!     let wells = client.call(StoreOperation::GetFromStore, query).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Failures
//!
//! Every exchange passes through the [`RequestInterceptor`]. HTTP 500 becomes
//! [`WitsmlClientError::RemoteServerCrashed`] and 401/403 become
//! [`WitsmlClientError::AuthenticationRejected`]. Nothing is retried.
//!
//! # Testing
//!
//! The `testing` module provides a stub store server and transport:
//!
//! ```rust,ignore
//! use witsml_client::testing::TestServer;
//!
//! let server = TestServer::start().await?;
//! server.client.get_version().await?;
//! assert_eq!(server.store.requests().len(), 1);
//! ```

mod client;
pub mod diagnostics;
mod error;
mod factory;
pub mod interceptor;
pub mod soap;
pub mod testing;
pub mod transport;
mod types;

pub use client::StoreClient;
pub use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
pub use error::{Result, WitsmlClientError};
pub use factory::ProtocolClientFactory;
pub use interceptor::{HeaderPolicy, RequestInterceptor};
pub use soap::StoreOperation;
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::*;

// Re-export core types for convenience
pub use witsml_core::{
    AuthHeaderValue, BindingConfiguration, ClientCertificate, ConnectionOptions, Credentials,
    SelectionPolicy,
};
