use kquote_core::{Stock, Ticker};
use serde_json::json;

use crate::cli::OutputFormat;
use crate::commands::{CommandResult, View};
use crate::error::CliError;

pub fn render(result: &CommandResult, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let document = json!({ "data": result.data, "warnings": result.warnings });
            let payload = if pretty {
                serde_json::to_string_pretty(&document)?
            } else {
                serde_json::to_string(&document)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => {
            for warning in &result.warnings {
                eprintln!("⚠️  {warning}");
            }
            let text = render_view(&result.view);
            if !text.is_empty() {
                println!("{text}");
            }
        }
    }

    Ok(())
}

pub fn render_view(view: &View) -> String {
    match view {
        View::Quotes(stocks) => render_quotes(stocks),
        View::Market(indices) => render_market(indices),
        View::Tickers { tickers, remaining } => render_tickers(tickers, *remaining),
        View::List { rows, empty } => {
            if rows.is_empty() {
                empty.clone()
            } else {
                render_pairs(rows)
            }
        }
        View::Lines(lines) => lines.join("\n"),
    }
}

fn render_quotes(stocks: &[Stock]) -> String {
    if stocks.is_empty() {
        return String::new();
    }

    let prices: Vec<String> = stocks.iter().map(|stock| format_number(stock.price)).collect();
    let name_width = stocks
        .iter()
        .map(|stock| display_width(&stock.name))
        .max()
        .unwrap_or(0);
    let price_width = prices.iter().map(|price| display_width(price)).max().unwrap_or(0);

    let mut rows: Vec<String> = stocks
        .iter()
        .zip(&prices)
        .map(|(stock, price)| {
            format!(
                "{}  {}  {}",
                pad_right(&stock.name, name_width),
                pad_left(price, price_width),
                change_text(stock)
            )
        })
        .collect();

    if !stocks.iter().any(|stock| is_market_open(&stock.market_status)) {
        rows.push(String::from("(market closed; last session prices)"));
    }
    rows.join("\n")
}

fn render_market(indices: &[Stock]) -> String {
    indices
        .iter()
        .map(|index| {
            format!(
                "{} {} {}\n         High: {}   Low: {}   Val: {}",
                pad_right(&index.name, 8),
                format_number(index.price),
                change_text(index),
                format_number(index.high),
                format_number(index.low),
                format_large_value(index.trading_value)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_tickers(tickers: &[Ticker], remaining: usize) -> String {
    let name_width = tickers
        .iter()
        .map(|ticker| display_width(&ticker.name))
        .max()
        .unwrap_or(0);

    let mut rows: Vec<String> = tickers
        .iter()
        .map(|ticker| {
            format!(
                "{}  {} [{}]",
                pad_right(&ticker.name, name_width),
                ticker.code,
                ticker.market
            )
        })
        .collect();
    if remaining > 0 {
        rows.push(format!("...and {remaining} more."));
    }
    rows.join("\n")
}

fn render_pairs(rows: &[(String, String)]) -> String {
    let key_width = rows
        .iter()
        .map(|(key, _)| display_width(key))
        .max()
        .unwrap_or(0);

    rows.iter()
        .map(|(key, value)| format!("{}  {value}", pad_right(key, key_width)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn change_text(stock: &Stock) -> String {
    format!(
        "{} {} ({:.2}%)",
        stock.direction.symbol(),
        format_number(stock.change),
        stock.change_percent
    )
}

/// Upstream reports `OPEN` or `장중` while the session is trading.
fn is_market_open(status: &str) -> bool {
    let status = status.trim();
    status.eq_ignore_ascii_case("OPEN") || status == "장중"
}

/// Thousands separators; two decimals unless the value is integral.
pub fn format_number(value: f64) -> String {
    let text = if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    };

    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", int_part),
    };

    let mut grouped = String::from(sign);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

/// Trading value arrives in millions of won.
pub fn format_large_value(millions: f64) -> String {
    if millions >= 1_000_000.0 {
        format!("{:.1}T", millions / 1_000_000.0)
    } else if millions >= 1_000.0 {
        format!("{:.1}B", millions / 1_000.0)
    } else {
        format!("{millions:.1}M")
    }
}

/// Terminal columns; Hangul and other East Asian wide characters take two.
pub fn display_width(text: &str) -> usize {
    text.chars().map(|ch| if is_wide(ch) { 2 } else { 1 }).sum()
}

fn is_wide(ch: char) -> bool {
    matches!(
        ch as u32,
        0x1100..=0x115F
            | 0x2E80..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
    )
}

fn pad_right(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(display_width(text));
    format!("{text}{}", " ".repeat(padding))
}

fn pad_left(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(display_width(text));
    format!("{}{text}", " ".repeat(padding))
}
