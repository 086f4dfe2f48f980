mod alias;
mod clean;
mod find;
mod market;
mod portfolio;
mod quote;
mod update;

use std::sync::Arc;

use kquote_core::{AppPaths, HttpClient, ReqwestHttpClient, Stock, Ticker};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// What a command produced: machine-readable data plus its terminal rendering.
#[derive(Debug)]
pub struct CommandResult {
    pub data: Value,
    pub view: View,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value, view: View) -> Self {
        Self {
            data,
            view,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

/// Table-mode rendering of a command result.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// One row per stock: name, price, change.
    Quotes(Vec<Stock>),
    /// Index blocks with high/low/value detail.
    Market(Vec<Stock>),
    /// Catalog matches, with the number of matches not shown.
    Tickers { tickers: Vec<Ticker>, remaining: usize },
    /// Aligned key/value rows, or `empty` when there are none.
    List {
        rows: Vec<(String, String)>,
        empty: String,
    },
    Lines(Vec<String>),
}

impl View {
    pub fn line(text: impl Into<String>) -> Self {
        Self::Lines(vec![text.into()])
    }
}

/// Everything a command needs from the outside world.
pub struct Context {
    pub paths: AppPaths,
    pub http: Arc<dyn HttpClient>,
    pub timeout_ms: u64,
    pub max_stocks: usize,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            paths: AppPaths::from_env(),
            http: Arc::new(ReqwestHttpClient::new()),
            timeout_ms: cli.timeout_ms,
            max_stocks: cli.max_stocks,
        }
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let context = Context::from_cli(cli);
    dispatch(&context, cli.command.as_ref(), &cli.terms).await
}

pub async fn dispatch(
    context: &Context,
    command: Option<&Command>,
    terms: &[String],
) -> Result<CommandResult, CliError> {
    context.paths.ensure_dirs()?;

    match command {
        None => quote::run(context, terms).await,
        Some(Command::Quote(args)) => quote::run(context, &args.terms).await,
        Some(Command::Find(args)) => find::run(context, args),
        Some(Command::Alias(args)) => alias::run(context, args),
        Some(Command::Portfolio(args)) => portfolio::run(context, args),
        Some(Command::Update) => update::run(context).await,
        Some(Command::Clean) => clean::run(context),
        Some(Command::Market) => market::run(context).await,
    }
}
