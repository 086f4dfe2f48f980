use kquote_core::{find_tickers, CatalogStore, Ticker, ValidationError};
use serde::Serialize;

use crate::cli::FindArgs;
use crate::error::CliError;

use super::{CommandResult, Context, View};

#[derive(Debug, Serialize)]
struct FindResponseData<'a> {
    query: &'a str,
    total: usize,
    matches: &'a [Ticker],
}

pub fn run(context: &Context, args: &FindArgs) -> Result<CommandResult, CliError> {
    let query = args.query.trim();
    if query.is_empty() {
        let data = serde_json::to_value(FindResponseData {
            query,
            total: 0,
            matches: &[],
        })?;
        return Ok(CommandResult::ok(data, View::Lines(Vec::new()))
            .with_warnings(vec![ValidationError::EmptyQuery.to_string()]));
    }
    if args.limit == 0 {
        return Err(CliError::Command(String::from("--limit must be at least 1")));
    }

    let catalog = CatalogStore::new(context.paths.catalog_path()).load()?;
    let mut matches = find_tickers(catalog.tickers(), query);
    let total = matches.len();
    matches.truncate(args.limit);

    let data = serde_json::to_value(FindResponseData {
        query,
        total,
        matches: &matches,
    })?;

    let view = if matches.is_empty() {
        View::line(format!("No matches found for '{query}'."))
    } else {
        View::Tickers {
            remaining: total - matches.len(),
            tickers: matches,
        }
    };
    Ok(CommandResult::ok(data, view))
}
