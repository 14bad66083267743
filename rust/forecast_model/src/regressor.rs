// src/regressor.rs

use ndarray::{Array1, Array2, ArrayView2};

use crate::{ModelError, OHLCV_WIDTH};

/// A fitted model that maps feature rows to target rows.
pub trait Regressor: Send + Sync {
    fn n_features(&self) -> usize;

    /// Predict one output row per input row.
    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>, ModelError>;
}

// Multi-output linear model: Y = X · Wᵀ + b
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    coefficients: Array2<f64>, // (targets, features)
    intercepts: Array1<f64>,   // (targets,)
}

impl LinearRegressor {
    pub fn new(coefficients: Array2<f64>, intercepts: Array1<f64>) -> Result<Self, ModelError> {
        if coefficients.nrows() != intercepts.len() {
            return Err(ModelError::Artifact(format!(
                "{} coefficient rows but {} intercepts",
                coefficients.nrows(),
                intercepts.len()
            )));
        }
        Ok(LinearRegressor {
            coefficients,
            intercepts,
        })
    }

    pub fn n_targets(&self) -> usize {
        self.coefficients.nrows()
    }
}

impl Regressor for LinearRegressor {
    fn n_features(&self) -> usize {
        self.coefficients.ncols()
    }

    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>, ModelError> {
        if features.ncols() != self.n_features() {
            return Err(ModelError::InputShape {
                expected: self.n_features(),
                found: features.ncols(),
            });
        }

        let mut output = features.dot(&self.coefficients.t());
        output += &self.intercepts;
        Ok(output)
    }
}

/// Run a single OHLCV row through `model`.
///
/// Both the input and the output are in `[open, high, low, close, volume]`
/// order; an output row of any other width is rejected.
pub fn predict_ohlcv(
    model: &dyn Regressor,
    sample: [f64; OHLCV_WIDTH],
) -> Result<[f64; OHLCV_WIDTH], ModelError> {
    let batch = ArrayView2::from_shape((1, OHLCV_WIDTH), &sample[..])?;
    let output = model.predict(batch)?;

    let row = output.rows().into_iter().next().ok_or(ModelError::EmptyOutput)?;
    if row.len() != OHLCV_WIDTH {
        return Err(ModelError::OutputShape {
            expected: OHLCV_WIDTH,
            found: row.len(),
        });
    }

    let mut forecast = [0.0; OHLCV_WIDTH];
    for (slot, value) in forecast.iter_mut().zip(row.iter()) {
        *slot = *value;
    }
    Ok(forecast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use more_asserts::assert_le;
    use ndarray::{arr1, arr2, Array2};

    fn identity_model() -> LinearRegressor {
        LinearRegressor::new(Array2::eye(OHLCV_WIDTH), Array1::zeros(OHLCV_WIDTH)).unwrap()
    }

    #[test]
    fn test_linear_predict_applies_weights_and_intercepts() {
        let model = LinearRegressor::new(
            arr2(&[[1.0, 2.0], [0.5, 0.0], [0.0, -1.0]]),
            arr1(&[0.1, 0.2, 0.3]),
        )
        .unwrap();

        let output = model.predict(arr2(&[[2.0, 3.0]]).view()).unwrap();

        assert_eq!(output.dim(), (1, 3));
        assert_le!((output[[0, 0]] - 8.1).abs(), 1e-12);
        assert_le!((output[[0, 1]] - 1.2).abs(), 1e-12);
        assert_le!((output[[0, 2]] + 2.7).abs(), 1e-12);
    }

    #[test]
    fn test_predict_rejects_wrong_feature_count() {
        let err = identity_model()
            .predict(arr2(&[[1.0, 2.0, 3.0]]).view())
            .unwrap_err();
        assert!(matches!(err, ModelError::InputShape { expected: 5, found: 3 }));
    }

    #[test]
    fn test_predict_ohlcv_keeps_field_order() {
        let forecast = predict_ohlcv(&identity_model(), [1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(forecast, [1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_predict_ohlcv_rejects_short_output() {
        let model = LinearRegressor::new(Array2::ones((3, OHLCV_WIDTH)), Array1::zeros(3)).unwrap();
        let err = predict_ohlcv(&model, [1.0; OHLCV_WIDTH]).unwrap_err();
        assert!(matches!(err, ModelError::OutputShape { expected: 5, found: 3 }));
    }

    #[test]
    fn test_mismatched_intercepts_are_rejected() {
        assert!(LinearRegressor::new(Array2::zeros((5, 5)), Array1::zeros(4)).is_err());
    }
}
