//! Realtime quotes from the Naver Finance polling API.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::data_source::{Endpoint, SourceError};
use crate::http_client::{HttpClient, HttpRequest, QUOTE_TIMEOUT_MS};
use crate::{Direction, Stock};

pub const STOCKS_URL: &str = "https://polling.finance.naver.com/api/realtime/domestic/stock/";
pub const INDICES_URL: &str =
    "https://polling.finance.naver.com/api/realtime/domestic/index/KOSPI,KOSDAQ";

#[derive(Debug, Deserialize)]
struct PollingResponse {
    #[serde(default)]
    datas: Vec<PollingItem>,
}

/// Numeric fields arrive as display strings (`"140,800"`, `"1,234백만"`).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PollingItem {
    item_code: String,
    stock_name: String,
    close_price: String,
    compare_to_previous_close_price: String,
    fluctuations_ratio: String,
    high_price: String,
    low_price: String,
    accumulated_trading_value: String,
    market_status: String,
    compare_to_previous_price: PriceMovement,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PriceMovement {
    name: String,
}

impl PollingItem {
    fn into_stock(self) -> Stock {
        Stock {
            price: parse_price(&self.close_price),
            change: parse_price(&self.compare_to_previous_close_price),
            change_percent: parse_percent(&self.fluctuations_ratio),
            high: parse_price(&self.high_price),
            low: parse_price(&self.low_price),
            trading_value: parse_price(&self.accumulated_trading_value),
            direction: Direction::from_upstream(&self.compare_to_previous_price.name),
            code: self.item_code,
            name: self.stock_name,
            market_status: self.market_status,
        }
    }
}

/// Parses a formatted number, stripping thousands separators and unit suffixes.
///
/// Anything unparsable becomes `0.0`.
pub fn parse_price(raw: &str) -> f64 {
    raw.replace(',', "")
        .replace("백만", "")
        .replace("천주", "")
        .trim()
        .parse()
        .unwrap_or(0.0)
}

pub fn parse_percent(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

/// Fetches live quotes for codes and the two market indices.
#[derive(Clone)]
pub struct QuoteClient {
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl QuoteClient {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            timeout_ms: QUOTE_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Quotes for `codes` in upstream order. No request is made for an empty list.
    pub async fn fetch_stocks(&self, codes: &[String]) -> Result<Vec<Stock>, SourceError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{STOCKS_URL}{}", codes.join(","));
        self.fetch(Endpoint::Stocks, url).await
    }

    /// KOSPI and KOSDAQ index values.
    pub async fn fetch_indices(&self) -> Result<Vec<Stock>, SourceError> {
        self.fetch(Endpoint::Indices, INDICES_URL.to_owned()).await
    }

    async fn fetch(&self, endpoint: Endpoint, url: String) -> Result<Vec<Stock>, SourceError> {
        let request = HttpRequest::get(url)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            SourceError::unavailable(endpoint, format!("transport error: {}", error.message()))
        })?;

        if !response.is_success() {
            let message = format!("upstream returned status {}", response.status);
            return Err(if response.status == 429 || response.status >= 500 {
                SourceError::unavailable(endpoint, message)
            } else {
                SourceError::invalid_request(endpoint, message)
            });
        }

        let parsed: PollingResponse = serde_json::from_slice(&response.body).map_err(|error| {
            SourceError::decode(endpoint, format!("failed to parse polling response: {error}"))
        })?;

        debug!(%endpoint, items = parsed.datas.len(), "fetched realtime quotes");
        Ok(parsed.datas.into_iter().map(PollingItem::into_stock).collect())
    }
}
