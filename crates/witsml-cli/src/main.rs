//! WITSML CLI - Command-line probe for WITSML Store servers
//!
//! Opens an authenticated channel to a server, either from a named profile or
//! from arguments, and issues Store operations through it.

mod commands;
mod config;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use witsml_client::{
    ClientCertificate, ConnectionOptions, Credentials, ProtocolClientFactory, SelectionPolicy,
    StoreClient, WitsmlClientError,
};
use witsml_core::{ConfigError, ServersFile};

use crate::config::{Config, MergedConfig};
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "witsml-cli")]
#[command(author, version, about = "WITSML Store CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// Store endpoint URL (overrides --profile)
    #[arg(short, long, env = "WITSML_SERVER")]
    server: Option<String>,

    /// Server profile name from the servers file
    #[arg(short, long, env = "WITSML_PROFILE")]
    profile: Option<String>,

    /// Servers file (TOML or YAML)
    #[arg(long, env = "WITSML_SERVERS_FILE")]
    servers_file: Option<PathBuf>,

    /// Username (with --server)
    #[arg(short, long, env = "WITSML_USERNAME", default_value = "")]
    username: String,

    /// Password (with --server)
    #[arg(long, env = "WITSML_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// PEM client certificate (with --server)
    #[arg(long)]
    cert: Option<PathBuf>,

    /// PEM private key for --cert
    #[arg(long, requires = "cert")]
    key: Option<PathBuf>,

    /// Request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Select the binding from certificate presence only, ignoring the scheme
    #[arg(long)]
    ignore_scheme: bool,

    /// Configuration file path
    #[arg(short, long, env = "WITSML_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List server profiles and the binding each one resolves to
    Servers,

    /// Call WMLS_GetVersion
    Version,

    /// Call WMLS_GetCap
    Cap {
        /// OptionsIn string
        #[arg(long, default_value = "dataVersion=1.4.1.1")]
        options: String,
    },

    /// Send an operation element read from a file
    Call {
        /// Operation name, e.g. GetFromStore or WMLS_GetFromStore
        operation: String,

        /// File holding the operation element placed inside soap:Body
        body: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Merge CLI args with config
    let merged = config.merge_with_args(
        cli.servers_file.as_deref(),
        cli.profile.as_deref(),
        cli.output.map(|o| o.as_str()),
        cli.no_color,
    );
    let format = OutputFormat::from_str(&merged.output, true).unwrap_or_default();
    let ctx = OutputContext::new(format, merged.no_color, cli.quiet);

    let result = run(&cli, &merged, &ctx).await;
    if let Err(err) = &result {
        report(err, &ctx);
    }
    result
}

async fn run(cli: &Cli, merged: &MergedConfig, ctx: &OutputContext) -> Result<()> {
    match &cli.command {
        Commands::Servers => {
            let file = load_servers_file(merged)?;
            commands::servers(&file, ctx)?;
        }

        Commands::Version => {
            let client = create_client(cli, merged)?;
            commands::version(&client, ctx).await?;
        }

        Commands::Cap { options } => {
            let client = create_client(cli, merged)?;
            commands::cap(&client, options, ctx).await?;
        }

        Commands::Call { operation, body } => {
            let client = create_client(cli, merged)?;
            commands::call(&client, operation, body, ctx).await?;
        }
    }

    Ok(())
}

fn load_servers_file(merged: &MergedConfig) -> Result<ServersFile> {
    let path = merged
        .servers_file
        .as_ref()
        .context("No servers file configured (use --servers-file or servers_file in config)")?;
    ServersFile::from_file(path)
        .with_context(|| format!("Failed to load servers file: {}", path.display()))
}

/// Connection options from --server arguments, or from the selected profile
fn connection_options(cli: &Cli, merged: &MergedConfig) -> Result<ConnectionOptions> {
    let mut options = if let Some(server) = &cli.server {
        let credentials = Credentials::new(cli.username.clone(), cli.password.clone());
        let mut options = ConnectionOptions::new(server, credentials)?;

        if let Some(cert_path) = &cli.cert {
            let certificate = std::fs::read(cert_path)
                .with_context(|| format!("Failed to read certificate: {}", cert_path.display()))?;
            let key = cli
                .key
                .as_ref()
                .map(|path| {
                    std::fs::read(path)
                        .with_context(|| format!("Failed to read key: {}", path.display()))
                })
                .transpose()?;
            options = options.with_client_certificate(ClientCertificate::from_pem(certificate, key));
        }
        options
    } else if let Some(profile) = &merged.profile {
        let file = load_servers_file(merged)?;
        let server = file
            .find(profile)
            .with_context(|| format!("Unknown server profile '{}'", profile))?;
        server.to_connection_options()?
    } else {
        bail!("No server given (use --server or --profile)");
    };

    if let Some(timeout_ms) = cli.timeout_ms {
        options = options.with_request_timeout(Duration::from_millis(timeout_ms));
    }

    Ok(options)
}

/// Create a store client for the resolved connection options
fn create_client(cli: &Cli, merged: &MergedConfig) -> Result<StoreClient> {
    let options = connection_options(cli, merged)?;
    let policy = if cli.ignore_scheme {
        SelectionPolicy::CertificatePresence
    } else {
        SelectionPolicy::SchemeAware
    };
    tracing::debug!(endpoint = %options.hostname(), ?policy, "Creating client");

    ProtocolClientFactory::new()
        .with_selection_policy(policy)
        .build(&options)
        .context("Failed to create WITSML client")
}

/// Print a hint for failures the user can act on
fn report(err: &anyhow::Error, ctx: &OutputContext) {
    if let Some(hint) = hint(err) {
        ctx.error(hint);
    }
}

const CONFIGURATION_HINT: &str =
    "The connection settings are not supported; check the hostname, scheme and certificate";

fn hint(err: &anyhow::Error) -> Option<&'static str> {
    if let Some(e) = err.downcast_ref::<WitsmlClientError>() {
        if e.is_authentication_rejected() {
            return Some("Authentication rejected: check username, password and client certificate");
        }
        if e.is_remote_server_crash() {
            return Some(
                "The WITSML server failed while handling the request; it may succeed if retried",
            );
        }
        if e.is_configuration() {
            return Some(CONFIGURATION_HINT);
        }
        return None;
    }

    // Option parsing for --server fails before a client error exists
    err.downcast_ref::<ConfigError>().map(|_| CONFIGURATION_HINT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_server_argument_gets_configuration_hint() {
        let err = ConnectionOptions::new("not a url", Credentials::new("u", "p")).unwrap_err();
        let err = anyhow::Error::from(err);
        assert_eq!(hint(&err), Some(CONFIGURATION_HINT));
    }

    #[test]
    fn client_failures_get_distinct_hints() {
        let auth = anyhow::Error::from(WitsmlClientError::AuthenticationRejected { status: 401 });
        let crash = anyhow::Error::from(WitsmlClientError::RemoteServerCrashed)
            .context("Failed to call WMLS_GetVersion");

        let auth_hint = hint(&auth).unwrap();
        let crash_hint = hint(&crash).unwrap();
        assert!(auth_hint.contains("Authentication"));
        assert_ne!(auth_hint, crash_hint);
        assert_eq!(hint(&anyhow::anyhow!("unrelated")), None);
    }
}
