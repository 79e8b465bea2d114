//! Server profiles loaded from TOML or YAML
//!
//! ```toml
//! [[servers]]
//! name = "field-a"
//! hostname = "https://witsml.field-a.example.com/store/WMLS.asmx"
//! username = "driller"
//! password_env = "FIELD_A_PASSWORD"
//! request_timeout_ms = 30000
//!
//! [servers.client_certificate]
//! format = "pem"
//! certificate = "/etc/witsml/client.crt"
//! private_key = "/etc/witsml/client.key"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};
use crate::options::{ClientCertificate, ConnectionOptions, Credentials};

/// A file holding any number of server profiles
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServersFile {
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
}

impl ServersFile {
    /// Load from a file, picking the format from the extension
    /// (`.yaml`/`.yml` for YAML, anything else as TOML)
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_toml(&content),
        }
    }

    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn find(&self, name: &str) -> Option<&ServerConfig> {
        self.servers.iter().find(|s| s.name == name)
    }
}

/// Connection settings for one WITSML server
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Profile name
    pub name: String,

    /// Store endpoint URI
    pub hostname: String,

    #[serde(default)]
    pub username: String,

    /// Inline password (takes precedence over `password_env`)
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Environment variable holding the password
    #[serde(default)]
    pub password_env: Option<String>,

    #[serde(default)]
    pub client_certificate: Option<CertificateConfig>,

    /// Request timeout in milliseconds (default: 60s)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_request_timeout() -> u64 {
    60_000 // 60 seconds
}

/// Where to read client certificate material from
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum CertificateConfig {
    Pem {
        certificate: PathBuf,
        #[serde(default)]
        private_key: Option<PathBuf>,
    },
    Pkcs12 {
        path: PathBuf,
        #[serde(default)]
        password: Option<SecretString>,
    },
}

impl CertificateConfig {
    /// Read the certificate files
    pub fn load(&self) -> ConfigResult<ClientCertificate> {
        match self {
            Self::Pem {
                certificate,
                private_key,
            } => {
                let cert = read_file(certificate)?;
                let key = private_key.as_deref().map(read_file).transpose()?;
                Ok(ClientCertificate::from_pem(cert, key))
            }
            Self::Pkcs12 { path, password } => {
                let der = read_file(path)?;
                let password = password
                    .as_ref()
                    .map(|p| p.expose_secret().clone())
                    .unwrap_or_default();
                Ok(ClientCertificate::from_pkcs12(der, password))
            }
        }
    }
}

fn read_file(path: &Path) -> ConfigResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| ConfigError::io(path, e))
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Resolve the password from the inline value or the environment
    pub fn resolve_password(&self) -> ConfigResult<String> {
        if let Some(password) = &self.password {
            return Ok(password.expose_secret().clone());
        }

        match &self.password_env {
            Some(var) => {
                std::env::var(var).map_err(|_| ConfigError::MissingPassword(self.name.clone()))
            }
            None => Err(ConfigError::MissingPassword(self.name.clone())),
        }
    }

    /// Build [`ConnectionOptions`], reading any certificate files
    pub fn to_connection_options(&self) -> ConfigResult<ConnectionOptions> {
        let credentials = Credentials::new(self.username.clone(), self.resolve_password()?);
        let mut options = ConnectionOptions::new(&self.hostname, credentials)?
            .with_request_timeout(self.request_timeout());

        if let Some(certificate) = &self.client_certificate {
            options = options.with_client_certificate(certificate.load()?);
        }

        tracing::debug!(
            server = %self.name,
            hostname = %options.hostname(),
            certificate = options.client_certificate().map(|c| c.format()),
            "Resolved connection options"
        );

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TOML: &str = r#"
        [[servers]]
        name = "plain"
        hostname = "http://localhost:7070/store"
        username = "driller"
        password = "pw"

        [[servers]]
        name = "tls"
        hostname = "https://witsml.example.com/store"
        username = "driller"
        password_env = "WITSML_CORE_TEST_UNSET_VARIABLE"
        request_timeout_ms = 1500
    "#;

    #[test]
    fn parse_toml() {
        let file = ServersFile::from_toml(TOML).unwrap();
        assert_eq!(file.servers.len(), 2);

        let plain = file.find("plain").unwrap();
        assert_eq!(plain.request_timeout(), Duration::from_secs(60));
        assert_eq!(plain.resolve_password().unwrap(), "pw");

        let tls = file.find("tls").unwrap();
        assert_eq!(tls.request_timeout(), Duration::from_millis(1500));
        assert!(file.find("missing").is_none());
    }

    #[test]
    fn missing_password_is_an_error() {
        let file = ServersFile::from_toml(TOML).unwrap();
        let err = file.find("tls").unwrap().to_connection_options().unwrap_err();
        assert!(matches!(err, ConfigError::MissingPassword(name) if name == "tls"));
    }

    #[test]
    fn parse_yaml_with_pem_certificate() {
        let yaml = r#"
servers:
  - name: cert
    hostname: https://witsml.example.com/store
    username: u
    password: p
    client_certificate:
      format: pem
      certificate: /tmp/client.crt
"#;
        let file = ServersFile::from_yaml(yaml).unwrap();
        let cert = file.servers[0].client_certificate.as_ref().unwrap();
        assert!(matches!(
            cert,
            CertificateConfig::Pem { private_key: None, .. }
        ));
    }

    #[test]
    fn loads_certificate_files() {
        let mut cert = tempfile::NamedTempFile::new().unwrap();
        cert.write_all(b"-----BEGIN CERTIFICATE-----\n").unwrap();

        let config = ServerConfig {
            name: "cert".to_string(),
            hostname: "https://witsml.example.com".to_string(),
            username: "u".to_string(),
            password: Some(SecretString::new("p".to_string())),
            password_env: None,
            client_certificate: Some(CertificateConfig::Pem {
                certificate: cert.path().to_path_buf(),
                private_key: None,
            }),
            request_timeout_ms: 10,
        };

        let options = config.to_connection_options().unwrap();
        let loaded = options.client_certificate().unwrap();
        assert!(!loaded.has_private_key());
        assert_eq!(options.request_timeout(), Duration::from_millis(10));
    }

    #[test]
    fn missing_certificate_file_reports_path() {
        let config = CertificateConfig::Pem {
            certificate: PathBuf::from("/nonexistent/witsml/client.crt"),
            private_key: None,
        };
        let err = config.load().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/witsml/client.crt"));
    }

    #[test]
    fn from_file_uses_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("servers.toml");
        std::fs::write(&path, TOML).unwrap();
        assert_eq!(ServersFile::from_file(&path).unwrap().servers.len(), 2);

        let bad = dir.path().join("servers.yaml");
        std::fs::write(&bad, "servers: [").unwrap();
        assert!(matches!(
            ServersFile::from_file(&bad),
            Err(ConfigError::Parse(_))
        ));
    }
}
