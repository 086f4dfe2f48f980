//! Rebuilds the ticker catalog from the public market listing pages.
//!
//! Three sources run concurrently, one tokio task each:
//!
//! | Source | Format | Market |
//! |--------|--------|--------|
//! | KOSPI market-cap listing | paginated EUC-KR HTML | KOSPI |
//! | KOSDAQ market-cap listing | paginated EUC-KR HTML | KOSDAQ |
//! | ETF listing | single JSON document | KOSPI |
//!
//! A failing page ends its source early and a failing source contributes
//! nothing; only an empty union is an error.

use std::fmt::{Display, Formatter};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::catalog::dedup_by_code;
use crate::data_source::{Endpoint, SourceError};
use crate::encoding::decode_euc_kr;
use crate::error::ScrapeError;
use crate::http_client::{HttpClient, HttpRequest, SCRAPE_TIMEOUT_MS};
use crate::throttling::RequestPacer;
use crate::{Market, Ticker};

pub const KOSPI_LISTING_URL: &str =
    "https://finance.naver.com/sise/sise_market_sum.naver?sosok=0&page=";
pub const KOSDAQ_LISTING_URL: &str =
    "https://finance.naver.com/sise/sise_market_sum.naver?sosok=1&page=";
pub const ETF_LISTING_URL: &str =
    "https://finance.naver.com/api/sise/etfItemList.nhn?etfType=0&targetColumn=market_sum&sortOrder=desc";

/// Page count assumed when the last-page link is missing.
pub const DEFAULT_MAX_PAGES: u32 = 40;
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(50);

static ROW_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href="/item/main\.naver\?code=([A-Z0-9]+)" class="tltle">([^<]+)</a>"#)
        .expect("row pattern is valid")
});

static LAST_PAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class="pgRR">\s*<a href=".*?page=(\d+)"#).expect("last page pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperConfig {
    /// Minimum spacing between page requests of one source.
    pub page_delay: Duration,
    pub default_max_pages: u32,
    pub timeout_ms: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            page_delay: DEFAULT_PAGE_DELAY,
            default_max_pages: DEFAULT_MAX_PAGES,
            timeout_ms: SCRAPE_TIMEOUT_MS,
        }
    }
}

/// One upstream listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingSource {
    /// HTML listing; the page number is appended to `url_prefix`.
    Paginated { market: Market, url_prefix: String },
    /// JSON fund listing; every entry is filed under KOSPI.
    Etf { url: String },
}

impl ListingSource {
    pub fn kospi() -> Self {
        Self::Paginated {
            market: Market::Kospi,
            url_prefix: KOSPI_LISTING_URL.to_owned(),
        }
    }

    pub fn kosdaq() -> Self {
        Self::Paginated {
            market: Market::Kosdaq,
            url_prefix: KOSDAQ_LISTING_URL.to_owned(),
        }
    }

    pub fn etf() -> Self {
        Self::Etf {
            url: ETF_LISTING_URL.to_owned(),
        }
    }

    pub fn defaults() -> Vec<Self> {
        vec![Self::kospi(), Self::kosdaq(), Self::etf()]
    }
}

impl Display for ListingSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paginated { market, .. } => write!(f, "{market} listing"),
            Self::Etf { .. } => f.write_str("ETF listing"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EtfResponse {
    result: EtfResult,
}

#[derive(Debug, Deserialize)]
struct EtfResult {
    #[serde(rename = "etfItemList", default)]
    items: Vec<EtfItem>,
}

#[derive(Debug, Deserialize)]
struct EtfItem {
    itemcode: String,
    itemname: String,
}

/// Concurrent fan-out over the listing sources.
#[derive(Clone)]
pub struct CatalogScraper {
    http_client: Arc<dyn HttpClient>,
    config: ScraperConfig,
    sources: Vec<ListingSource>,
}

impl CatalogScraper {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            config: ScraperConfig::default(),
            sources: ListingSource::defaults(),
        }
    }

    pub fn with_config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_sources(mut self, sources: Vec<ListingSource>) -> Self {
        self.sources = sources;
        self
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Scrapes every source and returns the de-duplicated union.
    ///
    /// Codes keep the first entry seen. No retries are attempted.
    pub async fn scrape_all(&self) -> Result<Vec<Ticker>, ScrapeError> {
        let collected = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = self
            .sources
            .iter()
            .cloned()
            .map(|source| {
                let worker = SourceWorker {
                    http_client: Arc::clone(&self.http_client),
                    config: self.config.clone(),
                    sink: Arc::clone(&collected),
                };
                tokio::spawn(async move { worker.run(source).await })
            })
            .collect();

        for handle in handles {
            if let Err(error) = handle.await {
                warn!(%error, "listing task terminated abnormally");
            }
        }

        let tickers = std::mem::take(&mut *collected.lock().await);
        if tickers.is_empty() {
            return Err(ScrapeError::NoTickers {
                sources: self.sources.len(),
            });
        }

        let total = tickers.len();
        let unique = dedup_by_code(tickers);
        info!(
            scraped = total,
            unique = unique.len(),
            "catalog scrape finished"
        );
        Ok(unique)
    }
}

struct SourceWorker {
    http_client: Arc<dyn HttpClient>,
    config: ScraperConfig,
    sink: Arc<Mutex<Vec<Ticker>>>,
}

impl SourceWorker {
    async fn run(self, source: ListingSource) {
        let rows = match &source {
            ListingSource::Paginated { market, url_prefix } => {
                self.scrape_paginated(*market, url_prefix).await
            }
            ListingSource::Etf { url } => self.scrape_etf(url).await,
        };
        info!(source = %source, rows, "listing source done");
    }

    async fn scrape_paginated(&self, market: Market, url_prefix: &str) -> usize {
        let pacer = RequestPacer::new(self.config.page_delay);

        pacer.ready().await;
        let first = match self.fetch_text(&format!("{url_prefix}1")).await {
            Ok(body) => body,
            Err(error) => {
                warn!(%market, %error, "first listing page failed; skipping source");
                return 0;
            }
        };

        let mut rows = self.append(extract_rows(&first, market)).await;
        let last_page = parse_last_page(&first).unwrap_or(self.config.default_max_pages);
        debug!(%market, last_page, "detected listing page count");

        for page in 2..=last_page {
            pacer.ready().await;
            let body = match self.fetch_text(&format!("{url_prefix}{page}")).await {
                Ok(body) => body,
                Err(error) => {
                    warn!(%market, page, %error, "listing page failed; keeping earlier pages");
                    break;
                }
            };

            let tickers = extract_rows(&body, market);
            if tickers.is_empty() {
                debug!(%market, page, "empty listing page; stopping");
                break;
            }
            rows += self.append(tickers).await;
        }
        rows
    }

    async fn scrape_etf(&self, url: &str) -> usize {
        let body = match self.fetch_text(url).await {
            Ok(body) => body,
            Err(error) => {
                warn!(%error, "ETF listing failed; skipping source");
                return 0;
            }
        };

        match parse_etf_listing(&body) {
            Ok(tickers) => self.append(tickers).await,
            Err(error) => {
                warn!(%error, "ETF listing could not be parsed; skipping source");
                0
            }
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, SourceError> {
        let request = HttpRequest::get(url)
            .with_header("referer", "https://finance.naver.com/")
            .with_timeout_ms(self.config.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            SourceError::unavailable(Endpoint::Listing, error.message().to_owned())
        })?;
        if !response.is_success() {
            return Err(SourceError::unavailable(
                Endpoint::Listing,
                format!("upstream returned status {}", response.status),
            ));
        }
        Ok(decode_euc_kr(&response.body).into_owned())
    }

    async fn append(&self, tickers: Vec<Ticker>) -> usize {
        let count = tickers.len();
        self.sink.lock().await.extend(tickers);
        count
    }
}

/// Extracts `(code, name)` rows from one listing page. Malformed rows are skipped.
pub fn extract_rows(html: &str, market: Market) -> Vec<Ticker> {
    ROW_PATTERN
        .captures_iter(html)
        .filter_map(|captures| {
            let name = unescape_html(&captures[2]);
            match Ticker::parse(&captures[1], &name, market.as_str()) {
                Ok(ticker) => Some(ticker),
                Err(error) => {
                    debug!(%error, "skipping listing row");
                    None
                }
            }
        })
        .collect()
}

/// Page number in the "last page" link, if present.
pub fn parse_last_page(html: &str) -> Option<u32> {
    LAST_PAGE_PATTERN
        .captures(html)
        .and_then(|captures| captures[1].parse().ok())
        .filter(|&page| page > 0)
}

fn parse_etf_listing(body: &str) -> Result<Vec<Ticker>, SourceError> {
    let response: EtfResponse = serde_json::from_str(body).map_err(|error| {
        SourceError::decode(Endpoint::Listing, format!("invalid ETF listing: {error}"))
    })?;

    Ok(response
        .result
        .items
        .into_iter()
        .filter_map(|item| {
            Ticker::parse(&item.itemcode, &item.itemname, Market::Kospi.as_str()).ok()
        })
        .collect())
}

fn unescape_html(text: &str) -> String {
    if !text.contains('&') {
        return text.to_owned();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
