//! Cap command - fetch the server capabilities object

use anyhow::Result;
use witsml_client::StoreClient;

use crate::output::OutputContext;

/// Call `WMLS_GetCap` with the given `OptionsIn`
pub async fn cap(client: &StoreClient, options_in: &str, ctx: &OutputContext) -> Result<()> {
    let response = client.get_cap(options_in).await?;
    ctx.print_response(&response);
    Ok(())
}
