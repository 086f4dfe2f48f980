//! Upstream source identifiers and the structured error returned by remote calls.
//!
//! | Endpoint | Used by | Description |
//! |----------|---------|-------------|
//! | `Stocks` | [`QuoteClient`](crate::QuoteClient) | Realtime polling quotes |
//! | `Indices` | [`QuoteClient`](crate::QuoteClient) | KOSPI / KOSDAQ index values |
//! | `Listing` | [`CatalogScraper`](crate::CatalogScraper) | Market listing pages |

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Remote endpoint family, used in log fields and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Stocks,
    Indices,
    Listing,
}

impl Endpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stocks => "stocks",
            Self::Indices => "indices",
            Self::Listing => "listing",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    InvalidRequest,
    Decode,
}

/// Structured error for a single remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    endpoint: Endpoint,
    message: String,
}

impl SourceError {
    pub fn unavailable(endpoint: Endpoint, message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            endpoint,
            message: message.into(),
        }
    }

    pub fn invalid_request(endpoint: Endpoint, message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            endpoint,
            message: message.into(),
        }
    }

    pub fn decode(endpoint: Endpoint, message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Decode,
            endpoint,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub const fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Decode => "source.decode",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} request failed: {} ({})",
            self.endpoint,
            self.message,
            self.code()
        )
    }
}

impl std::error::Error for SourceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_errors_render_endpoint_and_code() {
        let error = SourceError::unavailable(Endpoint::Stocks, "status 503");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert_eq!(error.code(), "source.unavailable");
        assert_eq!(error.to_string(), "stocks request failed: status 503 (source.unavailable)");
    }

    #[test]
    fn decode_errors_carry_their_own_code() {
        let error = SourceError::decode(Endpoint::Indices, "unexpected body");
        assert_eq!(error.kind(), SourceErrorKind::Decode);
        assert_eq!(error.code(), "source.decode");
    }
}
