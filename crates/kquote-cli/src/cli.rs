//! CLI argument definitions for kquote.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `<terms…>` / `quote` | Resolve terms and show live quotes |
//! | `find` | Rank catalog names against a query |
//! | `alias` | Manage nicknames |
//! | `portfolio` | Manage named groups of terms |
//! | `update` | Rebuild the ticker catalog from the market listings |
//! | `clean` | Remove the resolution cache and the catalog |
//! | `market` | Show KOSPI/KOSDAQ index detail |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `2000` | Quote request timeout in ms |
//! | `--max-stocks` | `20` | Maximum number of stocks shown at once |
//! | `-v` | off | Log verbosity (`-v` info, `-vv` debug) |
//!
//! # Examples
//!
//! ```bash
//! kquote 삼전 카카오 005930
//! kquote find 삼성 --limit 5
//! kquote alias set sam 005930
//! kquote portfolio set tech 삼전 sk하이닉스 naver
//! kquote tech --format json --pretty
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use kquote_core::http_client::QUOTE_TIMEOUT_MS;

/// Default number of stocks shown by one quote invocation.
pub const DEFAULT_MAX_STOCKS: usize = 20;

/// Default number of rows printed by `find`.
pub const DEFAULT_FIND_LIMIT: usize = 10;

/// kquote - Korean stock quotes from nicknames, codes or partial names
#[derive(Debug, Parser)]
#[command(
    name = "kquote",
    author,
    version,
    about = "Korean stock quotes from nicknames, codes or partial names",
    long_about = "kquote resolves what you type into KOSPI/KOSDAQ codes and shows live quotes.\n\
\n\
Each term is tried as, in order:\n\
  • a nickname saved with 'kquote alias set'\n\
  • a 6-character market code\n\
  • a previously resolved term\n\
  • a fuzzy match against the ticker catalog\n\
\n\
Portfolio names expand to their saved terms.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Quote request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = QUOTE_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Maximum number of stocks shown at once; extra entries are dropped.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_STOCKS)]
    pub max_stocks: usize,

    /// Increase log verbosity (-v info, -vv debug). `KQUOTE_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// Nicknames, codes, partial names or portfolio names.
    #[arg(value_name = "TERMS")]
    pub terms: Vec<String>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text for terminal display.
    Table,
    /// Single JSON object.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve terms and show live quotes.
    ///
    /// # Examples
    ///
    ///   kquote quote 삼전 카카오
    ///   kquote quote tech 005930
    Quote(QuoteArgs),

    /// Search the ticker catalog.
    ///
    /// # Examples
    ///
    ///   kquote find 삼성
    ///   kquote find kodex --limit 20
    Find(FindArgs),

    /// Manage nicknames.
    Alias(AliasArgs),

    /// Manage portfolios.
    Portfolio(PortfolioArgs),

    /// Rebuild the ticker catalog from the KOSPI, KOSDAQ and ETF listings.
    Update,

    /// Remove the resolution cache and the ticker catalog.
    ///
    /// Aliases and portfolios are kept.
    Clean,

    /// Show KOSPI/KOSDAQ index detail.
    Market,
}

/// Arguments for the `quote` command.
#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Nicknames, codes, partial names or portfolio names.
    #[arg(required = true, num_args = 1..)]
    pub terms: Vec<String>,
}

/// Arguments for the `find` command.
#[derive(Debug, Args)]
pub struct FindArgs {
    /// Partial company name or abbreviation.
    pub query: String,

    /// Maximum number of matches to print.
    #[arg(long, default_value_t = DEFAULT_FIND_LIMIT)]
    pub limit: usize,
}

/// Arguments for the `alias` command group.
#[derive(Debug, Args)]
pub struct AliasArgs {
    #[command(subcommand)]
    pub command: AliasCommand,
}

#[derive(Debug, Subcommand)]
pub enum AliasCommand {
    /// Point a nickname at a code, or at whatever a term resolves to.
    Set {
        nickname: String,
        /// Code, existing nickname or partial name.
        target: String,
    },

    /// Delete a nickname.
    #[command(visible_alias = "rm")]
    Remove { nickname: String },

    /// List nicknames.
    #[command(visible_alias = "ls")]
    List,
}

/// Arguments for the `portfolio` command group.
#[derive(Debug, Args)]
pub struct PortfolioArgs {
    #[command(subcommand)]
    pub command: PortfolioCommand,
}

#[derive(Debug, Subcommand)]
pub enum PortfolioCommand {
    /// Save a named group of terms, replacing any previous one.
    Set {
        name: String,
        #[arg(required = true, num_args = 1..)]
        items: Vec<String>,
    },

    /// Delete a portfolio.
    #[command(visible_alias = "rm")]
    Remove { name: String },

    /// List portfolios.
    #[command(visible_alias = "ls")]
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_terms_parse_without_subcommand() {
        let cli = Cli::try_parse_from(["kquote", "삼전", "카카오"]).expect("parses");

        assert!(cli.command.is_none());
        assert_eq!(cli.terms, vec!["삼전", "카카오"]);
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.max_stocks, DEFAULT_MAX_STOCKS);
        assert_eq!(cli.timeout_ms, QUOTE_TIMEOUT_MS);
    }

    #[test]
    fn subcommand_name_is_not_taken_as_a_term() {
        let cli = Cli::try_parse_from(["kquote", "find", "삼성", "--limit", "3"]).expect("parses");

        match cli.command {
            Some(Command::Find(args)) => {
                assert_eq!(args.query, "삼성");
                assert_eq!(args.limit, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(cli.terms.is_empty());
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli = Cli::try_parse_from(["kquote", "market", "--format", "json", "--pretty", "-vv"])
            .expect("parses");

        assert!(matches!(cli.command, Some(Command::Market)));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.pretty);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn alias_remove_accepts_rm() {
        let cli = Cli::try_parse_from(["kquote", "alias", "rm", "sam"]).expect("parses");

        match cli.command {
            Some(Command::Alias(AliasArgs {
                command: AliasCommand::Remove { nickname },
            })) => assert_eq!(nickname, "sam"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn portfolio_set_requires_items() {
        assert!(Cli::try_parse_from(["kquote", "portfolio", "set", "tech"]).is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["kquote", "--format", "ndjson", "삼전"]).is_err());
    }
}
