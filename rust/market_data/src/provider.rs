// src/provider.rs

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::loader::{ChartResponse, QuoteSummaryResponse};
use crate::models::{HistoryRange, OhlcvBar, Symbol, TickerInfo};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

// Sets the session cookies quoteSummary requires before a crumb is issued
pub const DEFAULT_COOKIE_URL: &str = "https://fc.yahoo.com";

const SUMMARY_MODULES: &str = "assetProfile,price,summaryDetail";

// Browser-like agent; Yahoo rejects requests without one
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to market data provider failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("market data provider returned status {status} for {symbol}")]
    Status { status: u16, symbol: String },
    #[error("market data provider error ({code}): {description}")]
    Api { code: String, description: String },
    #[error("failed to parse provider response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid timestamp in price history: {0}")]
    InvalidTimestamp(i64),
    #[error("could not obtain a session crumb from the market data provider")]
    MissingCrumb,
    #[error("invalid market data provider URL {0}")]
    InvalidUrl(String),
}

/// Source of company metadata and daily price history.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Descriptive info for `symbol`, or `None` when the provider cannot
    /// resolve it.
    async fn ticker_info(&self, symbol: &Symbol) -> Result<Option<TickerInfo>, ProviderError>;

    /// Daily bars covering `range`, oldest first. Unknown symbols yield an
    /// empty history.
    async fn daily_history(
        &self,
        symbol: &Symbol,
        range: HistoryRange,
    ) -> Result<Vec<OhlcvBar>, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
    // Page visited once to seed session cookies before fetching a crumb;
    // None skips the crumb entirely
    pub cookie_url: Option<String>,
    pub timeout: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        YahooConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            cookie_url: Some(DEFAULT_COOKIE_URL.to_string()),
            timeout: Duration::from_secs(10),
        }
    }
}

pub struct YahooProvider {
    client: Client,
    config: YahooConfig,
    crumb: OnceCell<String>,
}

impl YahooProvider {
    pub fn new(config: YahooConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(YahooProvider {
            client,
            config,
            crumb: OnceCell::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    // Each segment is percent-encoded, so a symbol can never reshape the path or query
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let invalid = || ProviderError::InvalidUrl(self.config.base_url.clone());
        let mut url = Url::parse(&self.config.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // Fetched once per process; a failed attempt is retried on the next call
    async fn crumb(&self) -> Result<Option<&str>, ProviderError> {
        let Some(cookie_url) = self.config.cookie_url.as_deref() else {
            return Ok(None);
        };

        let client = &self.client;
        let crumb_url = self.endpoint(&["v1", "test", "getcrumb"])?;
        let crumb = self
            .crumb
            .get_or_try_init(|| async move {
                // Only the Set-Cookie headers matter here, the status is usually 404
                client.get(cookie_url).send().await?;

                let response = client.get(crumb_url).send().await?;
                if !response.status().is_success() {
                    return Err(ProviderError::MissingCrumb);
                }

                let crumb = response.text().await?.trim().to_string();
                if crumb.is_empty() || crumb.contains(' ') {
                    return Err(ProviderError::MissingCrumb);
                }
                debug!("obtained provider crumb");
                Ok::<_, ProviderError>(crumb)
            })
            .await?;

        Ok(Some(crumb.as_str()))
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn ticker_info(&self, symbol: &Symbol) -> Result<Option<TickerInfo>, ProviderError> {
        let url = self.endpoint(&["v10", "finance", "quoteSummary", symbol.as_str()])?;
        let mut request = self.client.get(url).query(&[("modules", SUMMARY_MODULES)]);
        if let Some(crumb) = self.crumb().await? {
            request = request.query(&[("crumb", crumb)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(%symbol, "provider does not know symbol");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                symbol: symbol.to_string(),
            });
        }

        let body = response.text().await?;
        let summary: QuoteSummaryResponse = serde_json::from_str(&body)?;
        if let Some(err) = summary.quote_summary.error {
            if err.is_not_found() {
                return Ok(None);
            }
            return Err(err.into());
        }

        Ok(summary
            .quote_summary
            .result
            .and_then(|results| results.into_iter().next())
            .and_then(|result| result.into_ticker_info()))
    }

    async fn daily_history(
        &self,
        symbol: &Symbol,
        range: HistoryRange,
    ) -> Result<Vec<OhlcvBar>, ProviderError> {
        let url = self.endpoint(&["v8", "finance", "chart", symbol.as_str()])?;
        let response = self
            .client
            .get(url)
            .query(&[("range", range.as_str()), ("interval", "1d")])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                symbol: symbol.to_string(),
            });
        }

        let body = response.text().await?;
        let chart: ChartResponse = serde_json::from_str(&body)?;
        if let Some(err) = chart.chart.error {
            if err.is_not_found() {
                return Ok(Vec::new());
            }
            return Err(err.into());
        }

        match chart.chart.result.and_then(|results| results.into_iter().next()) {
            Some(result) => result.into_bars(),
            None => Ok(Vec::new()),
        }
    }
}
