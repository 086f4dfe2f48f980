use std::path::PathBuf;

use thiserror::Error;

/// Validation errors for user input and domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("code must be 6 ASCII letters or digits: '{value}'")]
    InvalidCode { value: String },
    #[error("ticker name cannot be empty")]
    EmptyName,
    #[error("unknown market '{value}', expected KOSPI or KOSDAQ")]
    InvalidMarket { value: String },

    #[error("search query cannot be empty")]
    EmptyQuery,
    #[error("at least one stock name, code or alias is required")]
    NoTerms,
    #[error("nickname cannot be empty")]
    EmptyNickname,
    #[error("portfolio name cannot be empty")]
    EmptyPortfolioName,
}

/// Errors raised by the file-backed stores (catalog, cache, aliases, portfolios).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read ticker table {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("bundled ticker table is malformed: {0}")]
    BundledCatalog(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Whole-scrape failures. Per-page and per-source failures never surface here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    #[error("scraped 0 tickers from {sources} sources; network or parsing error likely")]
    NoTickers { sources: usize },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Source(#[from] crate::data_source::SourceError),
}
