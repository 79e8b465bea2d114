//! Configuration file handling for witsml-cli

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// File holding server profiles (TOML or YAML)
    pub servers_file: Option<PathBuf>,
    /// Profile used when neither `--server` nor `--profile` is given
    pub default_profile: Option<String>,
    /// Default output format
    pub output: Option<String>,
    /// Disable colored output
    pub no_color: Option<bool>,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("witsml-cli");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(
        &self,
        servers_file: Option<&Path>,
        profile: Option<&str>,
        output: Option<&str>,
        no_color: bool,
    ) -> MergedConfig {
        MergedConfig {
            servers_file: servers_file
                .map(Path::to_path_buf)
                .or_else(|| self.servers_file.clone()),
            profile: profile
                .map(String::from)
                .or_else(|| self.default_profile.clone()),
            output: output
                .map(String::from)
                .or_else(|| self.output.clone())
                .unwrap_or_else(|| "raw".to_string()),
            no_color: no_color || self.no_color.unwrap_or(false),
        }
    }
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub servers_file: Option<PathBuf>,
    pub profile: Option<String>,
    pub output: String,
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "servers_file = \"/etc/witsml/servers.toml\"\ndefault_profile = \"field-a\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("field-a"));
        assert_eq!(
            config.servers_file.as_deref(),
            Some(Path::new("/etc/witsml/servers.toml"))
        );
    }

    #[test]
    fn args_override_file() {
        let config = Config {
            servers_file: Some(PathBuf::from("/from/config.toml")),
            default_profile: Some("config-profile".to_string()),
            output: Some("json".to_string()),
            no_color: Some(true),
        };

        let merged = config.merge_with_args(None, Some("cli-profile"), None, false);
        assert_eq!(merged.output, "json");
        assert_eq!(merged.profile.as_deref(), Some("cli-profile"));
        assert_eq!(
            merged.servers_file.as_deref(),
            Some(Path::new("/from/config.toml"))
        );
        assert!(merged.no_color);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "servers_file = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
