// src/handlers.rs

use crate::forecast::{forecast_next_day, PredictionError};
use crate::models::{
    Envelope, ErrorResponse, Prediction, PredictionPayload, StockPayload, SymbolOutcome,
    SymbolQuery, INVALID_SYMBOL, MISSING_SYMBOL, NO_DATA,
};
use actix_web::{get, web, HttpResponse, Responder};
use forecast_model::Regressor;
use market_data::{HistoryRange, MarketDataProvider, ProviderError, Symbol};
use tracing::warn;

#[get("/stock")]
pub async fn get_stock(
    query: web::Query<SymbolQuery>,
    provider: web::Data<dyn MarketDataProvider>,
) -> impl Responder {
    let Some(symbols) = query.symbols() else {
        return HttpResponse::BadRequest().json(ErrorResponse::new(MISSING_SYMBOL));
    };

    let mut envelope: Envelope<StockPayload> = Envelope::new();
    for symbol in symbols {
        let outcome = match load_stock(provider.get_ref(), &symbol).await {
            Ok(Some(payload)) => SymbolOutcome::Data(payload),
            Ok(None) => SymbolOutcome::error(INVALID_SYMBOL),
            Err(err) => {
                warn!(%symbol, error = %err, "failed to load stock data");
                SymbolOutcome::error(err.to_string())
            }
        };
        envelope.insert(symbol.to_string(), outcome);
    }

    HttpResponse::Ok().json(envelope)
}

// None when the provider cannot resolve the symbol
async fn load_stock(
    provider: &dyn MarketDataProvider,
    symbol: &Symbol,
) -> Result<Option<StockPayload>, ProviderError> {
    let Some(info) = provider.ticker_info(symbol).await? else {
        return Ok(None);
    };
    let history = provider.daily_history(symbol, HistoryRange::FiveDays).await?;

    Ok(Some(StockPayload::new(info, &history)))
}

#[get("/predict")]
pub async fn predict(
    query: web::Query<SymbolQuery>,
    provider: web::Data<dyn MarketDataProvider>,
    model: web::Data<dyn Regressor>,
) -> impl Responder {
    let Some(symbols) = query.symbols() else {
        return HttpResponse::BadRequest().json(ErrorResponse::new(MISSING_SYMBOL));
    };

    let mut envelope: Envelope<PredictionPayload> = Envelope::new();
    for symbol in symbols {
        let outcome = match predict_symbol(provider.get_ref(), model.get_ref(), &symbol).await {
            Ok(Some(payload)) => SymbolOutcome::Data(payload),
            Ok(None) => SymbolOutcome::error(NO_DATA),
            Err(err) => {
                warn!(%symbol, error = %err, "failed to forecast");
                SymbolOutcome::error(err.to_string())
            }
        };
        envelope.insert(symbol.to_string(), outcome);
    }

    HttpResponse::Ok().json(envelope)
}

// None when the provider has no recent bar; the model is not called then
async fn predict_symbol(
    provider: &dyn MarketDataProvider,
    model: &dyn Regressor,
    symbol: &Symbol,
) -> Result<Option<PredictionPayload>, PredictionError> {
    let history = provider.daily_history(symbol, HistoryRange::OneDay).await?;
    let Some(latest) = history.into_iter().last() else {
        return Ok(None);
    };

    let next_trading_day = forecast_next_day(model, &latest)?;

    Ok(Some(PredictionPayload {
        latest_trading_day: latest,
        prediction: Prediction { next_trading_day },
    }))
}

#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_stock).service(predict).service(health_check);
}
