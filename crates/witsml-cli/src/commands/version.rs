//! Version command - ask the store which data schema versions it supports

use anyhow::Result;
use witsml_client::StoreClient;

use crate::output::OutputContext;

/// Call `WMLS_GetVersion`
pub async fn version(client: &StoreClient, ctx: &OutputContext) -> Result<()> {
    let response = client.get_version().await?;
    ctx.print_response(&response);
    Ok(())
}
