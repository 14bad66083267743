// src/loader.rs

use chrono::DateTime;
use serde::Deserialize;

use crate::models::{CompanyInfo, Financials, OhlcvBar, TickerInfo};
use crate::provider::ProviderError;

// Yahoo wraps most numbers as {"raw": 1.0, "fmt": "1.00"}; keep only the raw value
fn raw_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped<T> {
        raw: Option<T>,
    }

    let wrapped = Option::<Wrapped<T>>::deserialize(deserializer)?;
    Ok(wrapped.and_then(|w| w.raw))
}

// Error object shared by the chart and quoteSummary endpoints
#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        self.code.eq_ignore_ascii_case("not found")
    }
}

impl From<ApiError> for ProviderError {
    fn from(err: ApiError) -> Self {
        ProviderError::Api {
            code: err.code,
            description: err.description,
        }
    }
}

// Define the chart (price history) API structure
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
pub struct ChartMeta {
    #[serde(default)]
    pub symbol: Option<String>,
    // Seconds east of UTC for the listing exchange
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<QuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteColumns {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<i64>>,
}

impl ChartResult {
    /// Turn the columnar chart payload into bars, oldest first.
    ///
    /// Dates are taken in the exchange's local time. Rows missing any price
    /// are skipped; a missing volume counts as zero.
    pub fn into_bars(self) -> Result<Vec<OhlcvBar>, ProviderError> {
        let offset = self.meta.gmtoffset;
        let columns = self.indicators.quote.into_iter().next().unwrap_or_default();

        let mut bars = Vec::with_capacity(self.timestamp.len());
        for (i, &ts) in self.timestamp.iter().enumerate() {
            let prices = (
                columns.open.get(i).copied().flatten(),
                columns.high.get(i).copied().flatten(),
                columns.low.get(i).copied().flatten(),
                columns.close.get(i).copied().flatten(),
            );
            let (Some(open), Some(high), Some(low), Some(close)) = prices else {
                continue;
            };

            let date = DateTime::from_timestamp(ts + offset, 0)
                .ok_or(ProviderError::InvalidTimestamp(ts))?
                .date_naive();

            bars.push(OhlcvBar {
                date,
                open,
                high,
                low,
                close,
                volume: columns.volume.get(i).copied().flatten().unwrap_or(0),
            });
        }

        Ok(bars)
    }
}

// Define the quoteSummary (company metadata) API structure
#[derive(Debug, Deserialize)]
pub struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    pub quote_summary: QuoteSummaryEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummaryEnvelope {
    #[serde(default)]
    pub result: Option<Vec<QuoteSummaryResult>>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResult {
    #[serde(default)]
    pub asset_profile: Option<AssetProfile>,
    #[serde(default)]
    pub price: Option<PriceModule>,
    #[serde(default)]
    pub summary_detail: Option<SummaryDetail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProfile {
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub country: Option<String>,
    pub long_business_summary: Option<String>,
    pub full_time_employees: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceModule {
    pub symbol: Option<String>,
    pub long_name: Option<String>,
    #[serde(default, deserialize_with = "raw_number")]
    pub market_cap: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDetail {
    #[serde(rename = "trailingPE", default, deserialize_with = "raw_number")]
    pub trailing_pe: Option<f64>,
    #[serde(default, deserialize_with = "raw_number")]
    pub dividend_yield: Option<f64>,
    #[serde(default, deserialize_with = "raw_number")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(default, deserialize_with = "raw_number")]
    pub fifty_two_week_low: Option<f64>,
    #[serde(default, deserialize_with = "raw_number")]
    pub average_volume: Option<i64>,
    #[serde(default, deserialize_with = "raw_number")]
    pub market_cap: Option<i64>,
}

impl QuoteSummaryResult {
    /// Map the provider modules onto our records.
    ///
    /// Returns `None` when the result carries no identifying symbol, which is
    /// how unresolvable tickers are told apart from sparse ones.
    pub fn into_ticker_info(self) -> Option<TickerInfo> {
        let price = self.price.unwrap_or_default();
        let symbol = price.symbol.filter(|s| !s.trim().is_empty())?;
        let profile = self.asset_profile.unwrap_or_default();
        let detail = self.summary_detail.unwrap_or_default();

        let company = CompanyInfo {
            name: price.long_name,
            sector: profile.sector,
            industry: profile.industry,
            website: profile.website,
            description: profile.long_business_summary,
            country: profile.country,
            employees: profile.full_time_employees,
            market_cap: price.market_cap.or(detail.market_cap),
        };

        let financials = Financials {
            pe_ratio: detail.trailing_pe,
            dividend_yield: detail.dividend_yield,
            week52_high: detail.fifty_two_week_high,
            week52_low: detail.fifty_two_week_low,
            average_volume: detail.average_volume,
        };

        Some(TickerInfo {
            symbol,
            company,
            financials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_chart_rows_with_missing_prices_are_skipped() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": { "symbol": "IBM", "gmtoffset": -14400 },
                    "timestamp": [1718199000, 1718285400],
                    "indicators": { "quote": [{
                        "open": [170.0, null],
                        "high": [171.5, 172.0],
                        "low": [169.2, 168.0],
                        "close": [170.9, 171.0],
                        "volume": [null, 100]
                    }]}
                }],
                "error": null
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(body).unwrap();
        let result = response.chart.result.unwrap().into_iter().next().unwrap();
        let bars = result.into_bars().unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 6, 12).unwrap());
        assert_eq!(bars[0].volume, 0);
    }

    #[test]
    fn test_summary_without_symbol_is_unresolvable() {
        let body = r#"{
            "quoteSummary": {
                "result": [{ "price": { "longName": "Ghost Corp" } }],
                "error": null
            }
        }"#;

        let response: QuoteSummaryResponse = serde_json::from_str(body).unwrap();
        let result = response.quote_summary.result.unwrap().into_iter().next().unwrap();
        assert!(result.into_ticker_info().is_none());
    }

    #[test]
    fn test_empty_raw_objects_are_absent() {
        let body = r#"{ "trailingPE": {}, "dividendYield": { "raw": 0.005, "fmt": "0.50%" } }"#;
        let detail: SummaryDetail = serde_json::from_str(body).unwrap();
        assert_eq!(detail.trailing_pe, None);
        assert_eq!(detail.dividend_yield, Some(0.005));
        assert_eq!(detail.average_volume, None);
    }
}
