//! Construction-time diagnostics
//!
//! Client construction reports non-fatal findings through a [`DiagnosticSink`]
//! handed to the factory instead of logging globally.

use tracing::{info, warn};

/// A non-fatal finding made while building a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A client certificate was attached to the credential store
    ClientCertificateConfigured {
        endpoint: String,
        format: &'static str,
    },
    /// The client certificate has no private key; the server will most likely
    /// reject the handshake or the first call
    CertificateMissingPrivateKey { endpoint: String },
}

impl Diagnostic {
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::CertificateMissingPrivateKey { .. })
    }
}

/// Receives diagnostics from client construction
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::ClientCertificateConfigured { endpoint, format } => {
                info!(%endpoint, format, "Configured client to use client certificate");
            }
            Diagnostic::CertificateMissingPrivateKey { endpoint } => {
                warn!(%endpoint, "Configured client certificate does not contain a private key");
            }
        }
    }
}
