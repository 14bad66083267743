// src/models.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of values in an OHLCV row.
pub const OHLCV_WIDTH: usize = 5;

// Ticker symbol, always trimmed and uppercased
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    pub fn normalize(raw: &str) -> Self {
        Symbol(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split a comma-separated symbol list, normalizing every entry.
///
/// Entries are kept in request order; empty entries are not dropped so the
/// caller sees one result per comma-separated slot.
pub fn parse_symbol_list(raw: &str) -> Vec<Symbol> {
    raw.split(',').map(Symbol::normalize).collect()
}

// One trading day of price and volume data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// Feature row in `[open, high, low, close, volume]` order.
    pub fn features(&self) -> [f64; OHLCV_WIDTH] {
        [self.open, self.high, self.low, self.close, self.volume as f64]
    }
}

// Descriptive company fields, any of which the provider may omit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub employees: Option<i64>,
    pub market_cap: Option<i64>,
}

// Derived ratios and ranges
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Financials {
    pub pe_ratio: Option<f64>,
    pub dividend_yield: Option<f64>,
    #[serde(rename = "52_week_high")]
    pub week52_high: Option<f64>,
    #[serde(rename = "52_week_low")]
    pub week52_low: Option<f64>,
    pub average_volume: Option<i64>,
}

// Metadata for a symbol the provider could resolve
#[derive(Debug, Clone, PartialEq)]
pub struct TickerInfo {
    pub symbol: String,
    pub company: CompanyInfo,
    pub financials: Financials,
}

/// Trailing window of daily bars to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRange {
    OneDay,
    FiveDays,
}

impl HistoryRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryRange::OneDay => "1d",
            HistoryRange::FiveDays => "5d",
        }
    }
}
