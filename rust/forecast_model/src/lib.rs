// src/lib.rs

//! Next-day OHLCV forecasting model: artifact loading and inference.

pub mod artifact;
pub mod regressor;

use std::path::PathBuf;
use thiserror::Error;

pub use artifact::{load_model, ModelArtifact};
pub use regressor::{predict_ohlcv, LinearRegressor, Regressor};

pub const OHLCV_WIDTH: usize = 5;

/// Column order shared by model inputs and outputs.
pub const OHLCV_COLUMNS: [&str; OHLCV_WIDTH] = ["open", "high", "low", "close", "volume"];

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid model artifact: {0}")]
    Artifact(String),
    #[error("model expects {expected} features, got {found}")]
    InputShape { expected: usize, found: usize },
    #[error("model returned {found} values per row, expected {expected}")]
    OutputShape { expected: usize, found: usize },
    #[error("model returned no predictions")]
    EmptyOutput,
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}
