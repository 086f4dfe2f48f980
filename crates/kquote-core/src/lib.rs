//! # kquote core
//!
//! Ticker resolution, catalog maintenance and live quotes for KOSPI/KOSDAQ.
//!
//! ## Overview
//!
//! - **Resolution cascade** turning nicknames, codes and loose company names
//!   into 6-character codes
//! - **LRU resolution cache** persisted between runs
//! - **Fuzzy matcher** ranking catalog names against a query
//! - **Catalog scraper** rebuilding the ticker list from the market listings
//! - **Quote client** for realtime prices and index values
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`alias`] | Nickname book |
//! | [`cache`] | LRU `term -> code` cache |
//! | [`catalog`] | Ticker catalog and CSV persistence |
//! | [`config`] | On-disk locations |
//! | [`data_source`] | Upstream endpoints and [`SourceError`] |
//! | [`domain`] | [`Ticker`], [`Market`], [`Stock`] |
//! | [`encoding`] | EUC-KR decoding |
//! | [`error`] | Core error types |
//! | [`fuzzy`] | Subsequence ranking |
//! | [`http_client`] | HTTP client abstraction |
//! | [`portfolio`] | Named term groups |
//! | [`quote_client`] | Realtime quotes |
//! | [`resolver`] | Resolution cascade |
//! | [`scraper`] | Concurrent listing scraper |
//! | [`throttling`] | Request pacing |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kquote_core::{AliasBook, AppPaths, CatalogStore, ResolutionCache, Resolver};
//!
//! let paths = AppPaths::from_env();
//! let aliases = AliasBook::load(paths.aliases_path())?;
//! let catalog = CatalogStore::new(paths.catalog_path());
//! let mut cache = ResolutionCache::load(paths.cache_path())?;
//!
//! let batch = Resolver::new(&aliases, &catalog)
//!     .with_cache(&mut cache)
//!     .resolve_batch(["삼전", "카카오", "005930"], 20);
//! cache.save()?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐
//! │  CLI / User   │
//! └───────┬───────┘
//!         │ terms
//!         ▼
//! ┌───────────────┐    ┌────────────┐
//! │   Resolver    │───▶│ AliasBook  │
//! │               │───▶│ LRU cache  │
//! │               │───▶│ Catalog ───┼──▶ fuzzy
//! └───────┬───────┘    └────────────┘
//!         │ codes
//!         ▼
//! ┌───────────────┐    ┌────────────┐
//! │  QuoteClient  │───▶│ HttpClient │◀── CatalogScraper
//! └───────────────┘    └────────────┘
//! ```

pub mod alias;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod encoding;
pub mod error;
pub mod fuzzy;
pub mod http_client;
mod json_file;
pub mod portfolio;
pub mod quote_client;
pub mod resolver;
pub mod scraper;
pub mod throttling;

// Stores
pub use alias::AliasBook;
pub use cache::{ResolutionCache, DEFAULT_CACHE_CAPACITY};
pub use catalog::{dedup_by_code, Catalog, CatalogSource, CatalogStore};
pub use portfolio::PortfolioBook;

// Configuration
pub use config::AppPaths;

// Upstream errors
pub use data_source::{Endpoint, SourceError, SourceErrorKind};

// Domain models
pub use domain::{is_valid_code, Direction, Market, Stock, Ticker, CODE_LEN};

pub use encoding::decode_euc_kr;

// Error types
pub use error::{CoreError, ScrapeError, StoreError, ValidationError};

pub use fuzzy::find_tickers;

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

pub use quote_client::QuoteClient;
pub use resolver::{AliasProvider, BatchResolution, Resolution, Resolver};
pub use scraper::{CatalogScraper, ListingSource, ScraperConfig};
pub use throttling::RequestPacer;
