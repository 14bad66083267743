// src/config.rs

use clap::Parser;
use market_data::{YahooConfig, DEFAULT_BASE_URL, DEFAULT_COOKIE_URL};
use std::path::PathBuf;
use std::time::Duration;
use validator::Validate;

/// Serve stock data and next-trading-day forecasts over HTTP.
#[derive(Parser, Validate, Debug, Clone)]
#[command(name = "stock-server", version)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "STOCK_SERVER_HOST", default_value = "0.0.0.0")]
    #[validate(length(min = 1))]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "STOCK_SERVER_PORT", default_value_t = 8080)]
    #[validate(range(min = 1))]
    pub port: u16,

    /// Trained model artifact, loaded once at startup
    #[arg(
        long,
        env = "STOCK_SERVER_MODEL_PATH",
        default_value = "multi_stock_prediction_model_5y.json"
    )]
    pub model_path: PathBuf,

    /// Base URL of the market data API
    #[arg(long, env = "STOCK_SERVER_PROVIDER_URL", default_value = DEFAULT_BASE_URL)]
    #[validate(url)]
    pub provider_url: String,

    /// Page visited to obtain session cookies before requesting a crumb
    #[arg(long, env = "STOCK_SERVER_COOKIE_URL", default_value = DEFAULT_COOKIE_URL)]
    #[validate(url)]
    pub cookie_url: String,

    /// Call the provider without a session crumb
    #[arg(long, env = "STOCK_SERVER_NO_CRUMB")]
    pub no_crumb: bool,

    /// Timeout for each market data request, in seconds
    #[arg(long, env = "STOCK_SERVER_PROVIDER_TIMEOUT_SECS", default_value_t = 10)]
    #[validate(range(min = 1, max = 300))]
    pub provider_timeout_secs: u64,
}

impl ServerConfig {
    pub fn yahoo_config(&self) -> YahooConfig {
        YahooConfig {
            base_url: self.provider_url.clone(),
            cookie_url: (!self.no_crumb).then(|| self.cookie_url.clone()),
            timeout: Duration::from_secs(self.provider_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::try_parse_from(["stock-server"]).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.yahoo_config().timeout, Duration::from_secs(config.provider_timeout_secs));
        assert_eq!(config.yahoo_config().cookie_url.as_deref(), Some(DEFAULT_COOKIE_URL));
    }

    #[test]
    fn test_no_crumb_disables_bootstrap() {
        let config = ServerConfig::try_parse_from(["stock-server", "--no-crumb"]).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.yahoo_config().cookie_url, None);
    }

    #[test]
    fn test_cookie_url_must_be_a_url() {
        let config =
            ServerConfig::try_parse_from(["stock-server", "--cookie-url", "fc yahoo"]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "stock-server",
            "--host",
            "127.0.0.1",
            "--port",
            "9090",
            "--model-path",
            "/srv/models/next_day.json",
            "--cookie-url",
            "https://consent.example.com",
        ])
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.model_path, PathBuf::from("/srv/models/next_day.json"));
        assert_eq!(config.yahoo_config().cookie_url.as_deref(), Some("https://consent.example.com"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_port_zero_is_rejected() {
        let config = ServerConfig::try_parse_from(["stock-server", "--port", "0"]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provider_url_must_be_a_url() {
        let config =
            ServerConfig::try_parse_from(["stock-server", "--provider-url", "not a url"]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_bounds() {
        let config =
            ServerConfig::try_parse_from(["stock-server", "--provider-timeout-secs", "0"]).unwrap();
        assert!(config.validate().is_err());
    }
}
