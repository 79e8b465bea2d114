//! Call command - send an arbitrary Store operation element

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use witsml_client::{StoreClient, StoreOperation};

use crate::output::OutputContext;

/// Send the operation element in `body_file` as `operation`
pub async fn call(
    client: &StoreClient,
    operation: &str,
    body_file: &Path,
    ctx: &OutputContext,
) -> Result<()> {
    let operation = parse_operation(operation)?;
    let body = std::fs::read_to_string(body_file)
        .with_context(|| format!("Failed to read request body: {}", body_file.display()))?;

    let response = client.call(operation, body.trim()).await?;
    match status_line(operation, response.status.as_u16()) {
        Ok(line) => ctx.success(&line),
        Err(line) => ctx.warn(&line),
    }
    ctx.print_response(&response);
    Ok(())
}

/// `Ok` for a 2xx status, `Err` for anything else that got past the interceptor
fn status_line(operation: StoreOperation, status: u16) -> std::result::Result<String, String> {
    if (200..300).contains(&status) {
        Ok(format!("{} completed (HTTP {})", operation, status))
    } else {
        Err(format!("{} returned HTTP {}", operation, status))
    }
}

fn parse_operation(name: &str) -> Result<StoreOperation> {
    StoreOperation::parse(name).ok_or_else(|| {
        let known: Vec<&str> = StoreOperation::ALL.iter().map(|op| op.name()).collect();
        anyhow!("Unknown operation '{}'. Expected one of: {}", name, known.join(", "))
    })
}
