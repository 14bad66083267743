// src/lib.rs
pub mod config;
pub mod forecast;
pub mod handlers;
pub mod models;
pub mod utils;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{middleware, web, App, Error, HttpServer};
use anyhow::Context;
use forecast_model::Regressor;
use market_data::{MarketDataProvider, YahooProvider};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

const DEFAULT_LOG_DIRECTIVES: &str = "stock_server=info,actix_web=info";

/// Log filter from a `RUST_LOG` style spec, falling back to info level for
/// this crate and actix when the spec is unset or invalid.
pub fn log_filter(spec: Option<&str>) -> EnvFilter {
    spec.and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVES))
}

/// The application with its middleware, routes and shared state.
pub fn app(
    provider: web::Data<dyn MarketDataProvider>,
    model: web::Data<dyn Regressor>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(middleware::Logger::default())
        .wrap(Cors::permissive())
        .app_data(provider)
        .app_data(model)
        .configure(handlers::routes)
}

/// Load the model, build the provider client and serve until shutdown.
///
/// A missing or invalid model artifact aborts startup.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let model = forecast_model::load_model(&config.model_path).with_context(|| {
        format!("failed to load model from {}", config.model_path.display())
    })?;
    info!(path = %config.model_path.display(), "loaded forecast model");

    let provider = YahooProvider::new(config.yahoo_config())
        .context("failed to build market data client")?;
    info!(url = %provider.base_url(), "using market data provider");

    let model: Arc<dyn Regressor> = Arc::new(model);
    let provider: Arc<dyn MarketDataProvider> = Arc::new(provider);
    let model = web::Data::from(model);
    let provider = web::Data::from(provider);

    info!("Starting stock server at http://{}:{}", config.host, config.port);
    HttpServer::new(move || app(provider.clone(), model.clone()))
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_defaults_to_info() {
        let filter = log_filter(None).to_string().to_lowercase();
        assert!(filter.contains("stock_server=info"));
        assert!(filter.contains("actix_web=info"));
    }

    #[test]
    fn test_log_filter_respects_user_spec() {
        let filter = log_filter(Some("stock_server=debug")).to_string().to_lowercase();
        assert!(filter.contains("stock_server=debug"));
        assert!(!filter.contains("stock_server=info"));
        assert!(!filter.contains("actix_web"));
    }

    #[test]
    fn test_log_filter_falls_back_on_invalid_spec() {
        let filter = log_filter(Some("stock_server=loud")).to_string().to_lowercase();
        assert!(filter.contains("stock_server=info"));
    }
}
