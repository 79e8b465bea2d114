//! Classification of completed HTTP exchanges

use serde::{Deserialize, Serialize};

/// What a completed exchange means for downstream logic.
///
/// Only the status code is consulted; SOAP fault bodies are not inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeOutcome {
    /// Response passes through to the caller unchanged
    Success,
    /// The remote store failed internally (HTTP 500)
    ServerFault,
    /// Credentials or certificate were rejected (HTTP 401 / 403)
    AuthFailure,
}

impl ExchangeOutcome {
    pub fn from_status(status: u16) -> Self {
        match status {
            500 => Self::ServerFault,
            401 | 403 => Self::AuthFailure,
            _ => Self::Success,
        }
    }
}
