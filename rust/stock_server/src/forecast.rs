// src/forecast.rs

use forecast_model::{predict_ohlcv, ModelError, Regressor};
use market_data::{OhlcvBar, ProviderError};
use thiserror::Error;

use crate::utils::next_trading_day;

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("cannot convert predicted volume {0} to an integer")]
    Volume(f64),
}

/// Forecast the bar following `latest` with `model`.
pub fn forecast_next_day(
    model: &dyn Regressor,
    latest: &OhlcvBar,
) -> Result<OhlcvBar, PredictionError> {
    let [open, high, low, close, volume] = predict_ohlcv(model, latest.features())?;

    Ok(OhlcvBar {
        date: next_trading_day(latest.date),
        open,
        high,
        low,
        close,
        volume: volume_to_count(volume)?,
    })
}

// Truncates toward zero like a plain integer cast, but refuses NaN and overflow
fn volume_to_count(volume: f64) -> Result<i64, PredictionError> {
    if !volume.is_finite() || volume <= i64::MIN as f64 || volume >= i64::MAX as f64 {
        return Err(PredictionError::Volume(volume));
    }
    Ok(volume.trunc() as i64)
}
