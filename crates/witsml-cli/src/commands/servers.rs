//! Servers command - list configured profiles and the binding each resolves to

use anyhow::{Context, Result};
use url::Url;
use witsml_core::{BindingSelector, CertificateConfig, ServerConfig, ServersFile};

use crate::output::{OutputContext, ServerRow};

/// List server profiles from `servers_file`
pub fn servers(servers_file: &ServersFile, ctx: &OutputContext) -> Result<()> {
    let rows: Vec<ServerRow> = servers_file.servers.iter().map(server_row).collect();
    ctx.print(&rows);
    Ok(())
}

/// Resolve the row without reading certificate files or passwords
fn server_row(server: &ServerConfig) -> ServerRow {
    let has_certificate = server.client_certificate.is_some();

    let binding = Url::parse(&server.hostname)
        .context("invalid hostname")
        .and_then(|url| {
            BindingSelector::resolve_parts(url.scheme(), has_certificate, server.request_timeout())
                .map_err(Into::into)
        })
        .map(|b| format!("{:?}", b.security_mode))
        .unwrap_or_else(|e| format!("error: {}", e));

    let certificate = match &server.client_certificate {
        None => "-".to_string(),
        Some(CertificateConfig::Pem {
            private_key: None, ..
        }) => "pem (no key)".to_string(),
        Some(CertificateConfig::Pem { .. }) => "pem".to_string(),
        Some(CertificateConfig::Pkcs12 { .. }) => "pkcs12".to_string(),
    };

    ServerRow {
        name: server.name.clone(),
        hostname: server.hostname.clone(),
        binding,
        certificate,
        timeout_ms: server.request_timeout_ms,
    }
}
