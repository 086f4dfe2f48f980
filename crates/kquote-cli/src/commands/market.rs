use kquote_core::QuoteClient;
use serde_json::json;

use crate::error::CliError;

use super::{CommandResult, Context, View};

pub async fn run(context: &Context) -> Result<CommandResult, CliError> {
    let client = QuoteClient::new(context.http.clone()).with_timeout_ms(context.timeout_ms);
    let indices = client.fetch_indices().await?;

    Ok(CommandResult::ok(
        json!({ "indices": indices }),
        View::Market(indices),
    ))
}
