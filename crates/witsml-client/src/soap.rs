//! SOAP 1.1 plumbing for the WITSML Store service
//!
//! Only the envelope and action headers live here. Message bodies are opaque:
//! callers hand in the operation element and get the raw response back.

use std::fmt;

use quick_xml::escape::escape;

/// SOAP 1.1 envelope namespace
pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
/// WITSML Store message namespace (API 1.2.0, data schema 1.4.1.x)
pub const STORE_MESSAGE_NS: &str = "http://www.witsml.org/message/120";
/// Prefix of every Store `SOAPAction`
pub const STORE_ACTION_PREFIX: &str = "http://www.witsml.org/action/120/Store.";

/// Operations exposed by the WITSML Store service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    GetVersion,
    GetCap,
    GetFromStore,
    AddToStore,
    UpdateInStore,
    DeleteFromStore,
    GetBaseMsg,
}

impl StoreOperation {
    pub const ALL: [StoreOperation; 7] = [
        Self::GetVersion,
        Self::GetCap,
        Self::GetFromStore,
        Self::AddToStore,
        Self::UpdateInStore,
        Self::DeleteFromStore,
        Self::GetBaseMsg,
    ];

    /// Operation name as it appears in the WSDL
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetVersion => "WMLS_GetVersion",
            Self::GetCap => "WMLS_GetCap",
            Self::GetFromStore => "WMLS_GetFromStore",
            Self::AddToStore => "WMLS_AddToStore",
            Self::UpdateInStore => "WMLS_UpdateInStore",
            Self::DeleteFromStore => "WMLS_DeleteFromStore",
            Self::GetBaseMsg => "WMLS_GetBaseMsg",
        }
    }

    /// Quoted `SOAPAction` header value
    pub fn soap_action(&self) -> String {
        format!("\"{}{}\"", STORE_ACTION_PREFIX, self.name())
    }

    /// Look up by WSDL name, with or without the `WMLS_` prefix (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        let wanted = name.strip_prefix("WMLS_").unwrap_or(name);
        Self::ALL.into_iter().find(|op| {
            op.name()
                .trim_start_matches("WMLS_")
                .eq_ignore_ascii_case(wanted)
        })
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wrap an operation element in a SOAP 1.1 envelope
pub fn envelope(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><soap:Envelope xmlns:soap="{SOAP_ENVELOPE_NS}"><soap:Body>{body}</soap:Body></soap:Envelope>"#
    )
}

/// `WMLS_GetVersion` request element
pub fn get_version_body() -> String {
    format!(r#"<WMLS_GetVersion xmlns="{STORE_MESSAGE_NS}"/>"#)
}

/// `WMLS_GetCap` request element with an escaped `OptionsIn` string
pub fn get_cap_body(options_in: &str) -> String {
    format!(
        r#"<WMLS_GetCap xmlns="{STORE_MESSAGE_NS}"><OptionsIn>{}</OptionsIn></WMLS_GetCap>"#,
        escape(options_in)
    )
}
