use kquote_core::{CatalogScraper, CatalogStore};
use serde_json::json;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use tracing::info;

use crate::error::CliError;

use super::{CommandResult, Context, View};

pub async fn run(context: &Context) -> Result<CommandResult, CliError> {
    info!("updating ticker database, this may take a moment");

    let tickers = CatalogScraper::new(context.http.clone()).scrape_all().await?;

    let store = CatalogStore::new(context.paths.catalog_path());
    store.save(&tickers)?;
    info!(tickers = tickers.len(), path = %store.path().display(), "catalog saved");

    let mut lines = vec![format!("Successfully updated {} tickers.", tickers.len())];
    let last_updated = store.last_updated()?;
    if let Some(at) = last_updated {
        let display = at
            .format(&Rfc2822)
            .map_err(|error| CliError::Command(error.to_string()))?;
        lines.push(format!("Last updated: {display}"));
    }

    let last_updated = last_updated
        .map(|at| at.format(&Rfc3339))
        .transpose()
        .map_err(|error| CliError::Command(error.to_string()))?;
    Ok(CommandResult::ok(
        json!({ "tickers": tickers.len(), "last_updated": last_updated }),
        View::Lines(lines),
    ))
}
