// src/models.rs

use chrono::NaiveDate;
use indexmap::IndexMap;
use market_data::{parse_symbol_list, CompanyInfo, Financials, OhlcvBar, Symbol, TickerInfo};
use serde::{Deserialize, Serialize};

pub const MISSING_SYMBOL: &str = "Please provide at least one stock symbol";
pub const INVALID_SYMBOL: &str = "Invalid stock symbol";
pub const NO_DATA: &str = "No data available for this symbol";

// Raw query pairs; a repeated `symbol` is not an error, the first one wins
#[derive(Deserialize, Debug, Default)]
#[serde(transparent)]
pub struct SymbolQuery {
    params: Vec<(String, String)>,
}

impl SymbolQuery {
    pub fn symbol(&self) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == "symbol")
            .map(|(_, value)| value.as_str())
    }

    /// Normalized symbols, or `None` when the parameter is absent or empty.
    pub fn symbols(&self) -> Option<Vec<Symbol>> {
        self.symbol()
            .filter(|raw| !raw.is_empty())
            .map(parse_symbol_list)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorResponse {
            error: message.into(),
        }
    }
}

// Either a payload or an error for one symbol, never both
#[derive(Serialize, Deserialize, Debug)]
#[serde(untagged)]
pub enum SymbolOutcome<T> {
    Failed(ErrorResponse),
    Data(T),
}

impl<T> SymbolOutcome<T> {
    pub fn error(message: impl Into<String>) -> Self {
        SymbolOutcome::Failed(ErrorResponse::new(message))
    }
}

/// Response body keyed by symbol, in request order.
pub type Envelope<T> = IndexMap<String, SymbolOutcome<T>>;

// Latest bar for /stock; every field is null when the history is empty
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct LatestTradingDay {
    pub date: Option<NaiveDate>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<i64>,
}

impl From<Option<&OhlcvBar>> for LatestTradingDay {
    fn from(bar: Option<&OhlcvBar>) -> Self {
        match bar {
            Some(bar) => LatestTradingDay {
                date: Some(bar.date),
                open: Some(bar.open),
                high: Some(bar.high),
                low: Some(bar.low),
                close: Some(bar.close),
                volume: Some(bar.volume),
            },
            None => LatestTradingDay::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct HistoricalClose {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct StockPayload {
    pub company_info: CompanyInfo,
    pub latest_trading_day: LatestTradingDay,
    pub historical_data: Vec<HistoricalClose>,
    pub financials: Financials,
}

impl StockPayload {
    pub fn new(info: TickerInfo, history: &[OhlcvBar]) -> Self {
        StockPayload {
            company_info: info.company,
            latest_trading_day: LatestTradingDay::from(history.last()),
            historical_data: history
                .iter()
                .map(|bar| HistoricalClose {
                    date: bar.date,
                    close: bar.close,
                })
                .collect(),
            financials: info.financials,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Prediction {
    pub next_trading_day: OhlcvBar,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PredictionPayload {
    pub latest_trading_day: OhlcvBar,
    pub prediction: Prediction,
}
