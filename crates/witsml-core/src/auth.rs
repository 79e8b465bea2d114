//! HTTP Basic authentication header values

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// An `Authorization` header value of the form `Basic <base64>`.
///
/// Recomputed on every client construction and never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeaderValue(String);

impl AuthHeaderValue {
    /// Build the header for `username:password`.
    ///
    /// The pair is encoded as ASCII, with every non-ASCII character replaced by
    /// `?`. Empty values are not rejected. Returns `None` only when both
    /// username and password are empty, so no empty header is ever attached.
    pub fn basic(username: &str, password: &str) -> Option<Self> {
        if username.is_empty() && password.is_empty() {
            return None;
        }

        let bytes: Vec<u8> = format!("{username}:{password}")
            .chars()
            .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
            .collect();

        Some(Self(format!("Basic {}", STANDARD.encode(bytes))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthHeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthHeaderValue(Basic <redacted>)")
    }
}
