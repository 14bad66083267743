// src/artifact.rs

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::regressor::LinearRegressor;
use crate::{ModelError, OHLCV_COLUMNS};

/// On-disk form of a trained next-day model.
///
/// `coefficients[t][f]` is the weight of feature `f` for target `t`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub features: Vec<String>,
    pub targets: Vec<String>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl ModelArtifact {
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let file = File::open(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn into_regressor(self) -> Result<LinearRegressor, ModelError> {
        check_columns("features", &self.features)?;
        check_columns("targets", &self.targets)?;

        if self.coefficients.len() != self.targets.len() {
            return Err(ModelError::Artifact(format!(
                "expected {} coefficient rows, found {}",
                self.targets.len(),
                self.coefficients.len()
            )));
        }
        if let Some(row) = self
            .coefficients
            .iter()
            .find(|row| row.len() != self.features.len())
        {
            return Err(ModelError::Artifact(format!(
                "coefficient row has {} weights for {} features",
                row.len(),
                self.features.len()
            )));
        }

        let shape = (self.targets.len(), self.features.len());
        let weights: Vec<f64> = self.coefficients.into_iter().flatten().collect();
        let coefficients = Array2::from_shape_vec(shape, weights)?;

        LinearRegressor::new(coefficients, Array1::from(self.intercepts))
    }
}

// The service always feeds and reads [open, high, low, close, volume]
fn check_columns(kind: &str, columns: &[String]) -> Result<(), ModelError> {
    let matches = columns.len() == OHLCV_COLUMNS.len()
        && columns
            .iter()
            .zip(OHLCV_COLUMNS)
            .all(|(have, want)| have.eq_ignore_ascii_case(want));
    if matches {
        Ok(())
    } else {
        Err(ModelError::Artifact(format!(
            "{kind} must be {OHLCV_COLUMNS:?}, found {columns:?}"
        )))
    }
}

/// Load the model artifact at `path`.
pub fn load_model(path: &Path) -> Result<LinearRegressor, ModelError> {
    ModelArtifact::from_path(path)?.into_regressor()
}
