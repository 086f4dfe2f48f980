//! # Domain Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Catalog entry: code, company name, market |
//! | [`Market`] | Listing market (KOSPI or KOSDAQ) |
//! | [`Stock`] | Live quote snapshot for one code or index |
//! | [`Direction`] | Price movement against the previous close |
//!
//! [`is_valid_code`] is the purely syntactic check the resolver uses to
//! accept a term as a code without consulting any catalog.

mod stock;
mod ticker;

pub use stock::{Direction, Stock};
pub use ticker::{is_valid_code, Market, Ticker, CODE_LEN};
