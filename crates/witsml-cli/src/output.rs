//! Output formatting for witsml-cli (table, json, raw)

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};
use witsml_client::SoapResponse;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Response envelope as received (default)
    #[default]
    Raw,
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Table => "table",
            Self::Json => "json",
        }
    }
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    /// Print a success message (unless in quiet mode)
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            eprintln!("{}", msg.green());
        }
    }

    /// Print a warning message
    pub fn warn(&self, msg: &str) {
        eprintln!("{}", msg.yellow());
    }

    /// Print an error message
    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg.red());
    }

    /// Print rows in the configured format
    pub fn print<T: Tabled + Serialize>(&self, data: &[T]) {
        match self.format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(data).unwrap_or_else(|_| "[]".to_string())
                );
            }
            OutputFormat::Table | OutputFormat::Raw => {
                if data.is_empty() {
                    if !self.quiet {
                        println!("No data");
                    }
                } else {
                    println!("{}", Table::new(data));
                }
            }
        }
    }

    /// Print a Store response in the configured format
    pub fn print_response(&self, response: &SoapResponse) {
        let row = ResponseRow::from(response);
        match self.format {
            OutputFormat::Raw => println!("{}", row.body),
            OutputFormat::Table => println!("{}", Table::new([row])),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&row).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
    }
}

// =============================================================================
// Display types for various commands
// =============================================================================

/// Server profile display for the servers command
#[derive(Debug, Tabled, Serialize)]
pub struct ServerRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Hostname")]
    pub hostname: String,
    #[tabled(rename = "Binding")]
    pub binding: String,
    #[tabled(rename = "Certificate")]
    pub certificate: String,
    #[tabled(rename = "Timeout (ms)")]
    pub timeout_ms: u64,
}

/// Store response display
#[derive(Debug, Tabled, Serialize)]
pub struct ResponseRow {
    #[tabled(rename = "Status")]
    pub status: u16,
    #[tabled(rename = "Content-Type")]
    pub content_type: String,
    #[tabled(rename = "Body")]
    pub body: String,
}

impl From<&SoapResponse> for ResponseRow {
    fn from(response: &SoapResponse) -> Self {
        Self {
            status: response.status.as_u16(),
            content_type: response
                .headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
                .to_string(),
            body: response.text(),
        }
    }
}
