//! Min-max feature scaling with parameters fitted offline.

use serde::{Deserialize, Serialize};

use celiver_model::{CeliverError, Result};

use crate::matrix::FeatureMatrix;

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Maps each column linearly so the fitted `[min, max]` lands on `feature_range`.
///
/// Columns that were constant during fitting (zero range) are divided by one,
/// matching the usual scikit-learn handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
    #[serde(default = "default_feature_range")]
    pub feature_range: (f64, f64),
}

impl MinMaxScaler {
    pub fn new(data_min: Vec<f64>, data_max: Vec<f64>) -> Result<Self> {
        let scaler = Self {
            data_min,
            data_max,
            feature_range: default_feature_range(),
        };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn n_features(&self) -> usize {
        self.data_min.len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_max.len() != self.data_min.len() {
            return Err(CeliverError::shape(
                "scaler data_max",
                self.data_min.len(),
                self.data_max.len(),
            ));
        }
        Ok(())
    }

    /// Per-column `(scale, offset)` so that `x' = x * scale + offset`.
    fn coefficients(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let (low, high) = self.feature_range;
        self.data_min
            .iter()
            .zip(&self.data_max)
            .map(move |(&min, &max)| {
                let range = max - min;
                let range = if range == 0.0 { 1.0 } else { range };
                let scale = (high - low) / range;
                (scale, low - min * scale)
            })
    }

    pub fn transform(&self, matrix: &FeatureMatrix) -> Result<FeatureMatrix> {
        if matrix.cols() != self.n_features() {
            return Err(CeliverError::shape(
                "scaler input columns",
                self.n_features(),
                matrix.cols(),
            ));
        }
        let coefficients: Vec<(f64, f64)> = self.coefficients().collect();
        let mut data = Vec::with_capacity(matrix.rows() * matrix.cols());
        for row in matrix.iter_rows() {
            data.extend(
                row.iter()
                    .zip(&coefficients)
                    .map(|(value, (scale, offset))| value * scale + offset),
            );
        }
        FeatureMatrix::new(matrix.names().to_vec(), matrix.rows(), data)
    }
}
