use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Length of a market code.
pub const CODE_LEN: usize = 6;

/// Returns true when `input` is exactly six ASCII letters or digits.
///
/// Existence in any catalog is not checked.
pub fn is_valid_code(input: &str) -> bool {
    input.len() == CODE_LEN && input.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Listing market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Market {
    Kospi,
    Kosdaq,
}

impl Market {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kospi => "KOSPI",
            Self::Kosdaq => "KOSDAQ",
        }
    }
}

impl Display for Market {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Market {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "KOSPI" => Ok(Self::Kospi),
            "KOSDAQ" => Ok(Self::Kosdaq),
            other => Err(ValidationError::InvalidMarket {
                value: other.to_owned(),
            }),
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticker {
    pub code: String,
    pub name: String,
    pub market: Market,
}

impl Ticker {
    pub fn new(code: impl Into<String>, name: impl Into<String>, market: Market) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            market,
        }
    }

    /// Builds a ticker from untrusted text, rejecting malformed codes and blank names.
    pub fn parse(code: &str, name: &str, market: &str) -> Result<Self, ValidationError> {
        let code = code.trim();
        if !is_valid_code(code) {
            return Err(ValidationError::InvalidCode {
                value: code.to_owned(),
            });
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        Ok(Self::new(code, name, market.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_six_ascii_alphanumerics() {
        assert!(is_valid_code("005930"));
        assert!(is_valid_code("ABCDEF"));
        assert!(is_valid_code("0001a0"));
    }

    #[test]
    fn rejects_wrong_length_and_non_ascii() {
        assert!(!is_valid_code("12345"));
        assert!(!is_valid_code("1234567"));
        assert!(!is_valid_code(""));
        assert!(!is_valid_code("가나다라마바"));
        assert!(!is_valid_code("00593 "));
        assert!(!is_valid_code("0059-0"));
    }

    #[test]
    fn market_parses_case_insensitively() {
        assert_eq!("kosdaq".parse::<Market>(), Ok(Market::Kosdaq));
        assert_eq!(" KOSPI ".parse::<Market>(), Ok(Market::Kospi));
        assert!(matches!(
            "NYSE".parse::<Market>(),
            Err(ValidationError::InvalidMarket { .. })
        ));
    }

    #[test]
    fn parse_trims_and_validates_fields() {
        let ticker = Ticker::parse(" 005930", "삼성전자 ", "KOSPI").expect("valid row");
        assert_eq!(ticker, Ticker::new("005930", "삼성전자", Market::Kospi));

        let err = Ticker::parse("5930", "삼성전자", "KOSPI").expect_err("short code");
        assert!(matches!(err, ValidationError::InvalidCode { .. }));

        let err = Ticker::parse("005930", "  ", "KOSPI").expect_err("blank name");
        assert_eq!(err, ValidationError::EmptyName);
    }
}
