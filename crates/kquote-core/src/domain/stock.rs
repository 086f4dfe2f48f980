use serde::{Deserialize, Serialize};

/// Price movement against the previous close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Rising,
    Falling,
    Flat,
}

impl Direction {
    /// Maps the upstream movement name (`RISING`, `FALLING`, ...) to a direction.
    pub fn from_upstream(name: &str) -> Self {
        match name {
            "RISING" | "UPPER_LIMIT" => Self::Rising,
            "FALLING" | "LOWER_LIMIT" => Self::Falling,
            _ => Self::Flat,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Rising => "▲",
            Self::Falling => "▼",
            Self::Flat => "-",
        }
    }
}

/// Live quote snapshot for a stock or an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub code: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub high: f64,
    pub low: f64,
    pub trading_value: f64,
    pub direction: Direction,
    pub market_status: String,
}

impl Stock {
    pub fn is_rising(&self) -> bool {
        self.direction == Direction::Rising
    }

    pub fn is_falling(&self) -> bool {
        self.direction == Direction::Falling
    }
}
