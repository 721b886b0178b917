//! Scale, select and classify a feature table.

use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use celiver_model::{CeliverError, Prediction, PredictionSet, Result};

use crate::bundle::ModelBundle;
use crate::classifier::Classifier;
use crate::matrix::{FeatureMatrix, row_ids};

/// Applies a validated [`ModelBundle`] to feature tables.
#[derive(Debug, Clone)]
pub struct PredictionPipeline {
    bundle: ModelBundle,
}

impl PredictionPipeline {
    pub fn new(bundle: ModelBundle) -> Result<Self> {
        bundle.validate()?;
        Ok(Self { bundle })
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    /// Predict every row of `table`.
    ///
    /// Column 0 holds the sample identifier; every other column is a model
    /// input. Predictions come back in row order.
    pub fn predict(&self, table: &DataFrame) -> Result<PredictionSet> {
        let span = info_span!("predict", rows = table.height());
        let _guard = span.enter();
        let start = Instant::now();

        let ids = row_ids(table)?;
        let matrix = FeatureMatrix::from_frame(table, 1)?;
        self.check_columns(&matrix)?;

        let scaled = self.bundle.scaler.transform(&matrix)?;
        let selected = self.bundle.selector.transform(&scaled)?;
        debug!(
            scaled = scaled.cols(),
            selected = selected.cols(),
            "features scaled and selected"
        );

        let predictions: Vec<Prediction> = ids
            .into_iter()
            .zip(selected.iter_rows())
            .map(|(id, row)| {
                let probability = self.bundle.classifier.predict_proba(row);
                Prediction {
                    id,
                    probability,
                    label: u8::from(probability > self.bundle.threshold),
                }
            })
            .collect();
        let set = PredictionSet::new(predictions);
        info!(
            rows = set.len(),
            positives = set.positive_count(),
            duration_ms = start.elapsed().as_millis(),
            "predictions complete"
        );
        Ok(set)
    }

    fn check_columns(&self, matrix: &FeatureMatrix) -> Result<()> {
        let Some(expected) = &self.bundle.feature_names else {
            return Ok(());
        };
        if expected.len() != matrix.cols() {
            return Err(CeliverError::shape(
                "feature table columns",
                expected.len() + 1,
                matrix.cols() + 1,
            ));
        }
        for (want, found) in expected.iter().zip(matrix.names()) {
            if want != found {
                return Err(CeliverError::missing_column(want.clone()));
            }
        }
        Ok(())
    }
}
