// src/lib.rs

//! Market data access: ticker metadata and daily price history from Yahoo
//! Finance, behind the [`MarketDataProvider`] trait.

pub mod loader;
pub mod models;
pub mod provider;

pub use models::{
    parse_symbol_list, CompanyInfo, Financials, HistoryRange, OhlcvBar, Symbol, TickerInfo,
    OHLCV_WIDTH,
};
pub use provider::{
    MarketDataProvider, ProviderError, YahooConfig, YahooProvider, DEFAULT_BASE_URL,
    DEFAULT_COOKIE_URL,
};
