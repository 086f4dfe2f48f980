use kquote_core::{
    AliasBook, BatchResolution, CatalogStore, PortfolioBook, QuoteClient, ResolutionCache,
    Resolver, Stock, StoreError, ValidationError, DEFAULT_CACHE_CAPACITY,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::CliError;

use super::{CommandResult, Context, View};

#[derive(Debug, Serialize)]
struct QuoteResponseData {
    stocks: Vec<Stock>,
    resolution: BatchResolution,
}

pub async fn run(context: &Context, terms: &[String]) -> Result<CommandResult, CliError> {
    if context.max_stocks == 0 {
        return Err(CliError::Command(String::from(
            "--max-stocks must be at least 1",
        )));
    }

    let paths = &context.paths;
    let mut warnings = Vec::new();

    let portfolios = or_default(
        PortfolioBook::load(paths.portfolios_path()),
        "portfolios",
        &mut warnings,
    );
    let aliases = or_default(AliasBook::load(paths.aliases_path()), "aliases", &mut warnings);
    let mut cache = ResolutionCache::load(paths.cache_path()).unwrap_or_else(|error| {
        warn!(%error, "starting with an empty resolution cache");
        ResolutionCache::at(paths.cache_path(), DEFAULT_CACHE_CAPACITY)
    });

    let terms: Vec<String> = portfolios
        .expand(terms)
        .into_iter()
        .filter(|term| !term.trim().is_empty())
        .collect();
    if terms.is_empty() {
        warnings.push(ValidationError::NoTerms.to_string());
        let data = serde_json::to_value(QuoteResponseData {
            stocks: Vec::new(),
            resolution: BatchResolution::default(),
        })?;
        return Ok(CommandResult::ok(data, View::Quotes(Vec::new())).with_warnings(warnings));
    }

    let catalog = CatalogStore::new(paths.catalog_path());
    let batch = {
        let mut resolver = Resolver::new(&aliases, &catalog).with_cache(&mut cache);
        let batch = resolver.resolve_batch(&terms, context.max_stocks);
        if let Some(error) = resolver.catalog_error() {
            warnings.push(format!("ticker catalog unavailable, name search skipped: {error}"));
        }
        batch
    };

    if let Err(error) = cache.save() {
        warn!(%error, "failed to persist resolution cache");
    }

    for term in &batch.unresolved {
        warnings.push(format!("Could not find stock for '{term}'"));
    }
    if batch.discarded > 0 {
        warnings.push(format!(
            "Display limited to {} stocks. {} items were ignored.",
            context.max_stocks, batch.discarded
        ));
    }

    info!(
        terms = terms.len(),
        codes = batch.codes.len(),
        unresolved = batch.unresolved.len(),
        "resolved terms"
    );

    let client = QuoteClient::new(context.http.clone()).with_timeout_ms(context.timeout_ms);
    let stocks = client.fetch_stocks(&batch.codes).await?;

    let data = serde_json::to_value(QuoteResponseData {
        stocks: stocks.clone(),
        resolution: batch,
    })?;
    Ok(CommandResult::ok(data, View::Quotes(stocks)).with_warnings(warnings))
}

fn or_default<T: Default>(
    loaded: Result<T, StoreError>,
    what: &str,
    warnings: &mut Vec<String>,
) -> T {
    loaded.unwrap_or_else(|error| {
        warn!(%error, "ignoring unreadable {what}");
        warnings.push(format!("{what} ignored: {error}"));
        T::default()
    })
}
