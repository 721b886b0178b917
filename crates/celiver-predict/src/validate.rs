//! Comparison of predictions against known labels.

use polars::prelude::{AnyValue, DataFrame};
use serde::{Deserialize, Serialize};
use tracing::debug;

use celiver_ingest::{any_to_f64, any_to_string};
use celiver_model::{CeliverError, Result};

/// Remove the label column from `df` and return it as 0/1 values.
///
/// Labels may be numeric or numeric text. Any non-zero label counts as
/// positive. Missing or unreadable labels are rejected.
pub fn split_labels(df: &DataFrame, column: &str) -> Result<(DataFrame, Vec<u8>)> {
    let values = df
        .column(column)
        .map_err(|_| CeliverError::missing_column(column))?;
    let labels = (0..values.len())
        .map(|row| {
            let cell = values.get(row)?;
            match any_to_f64(cell.clone()) {
                Some(value) if !value.is_nan() => Ok(u8::from(value != 0.0)),
                _ if matches!(cell, AnyValue::Null) => {
                    Err(CeliverError::numeric(column, row, "missing"))
                }
                _ => Err(CeliverError::numeric(column, row, any_to_string(cell))),
            }
        })
        .collect::<Result<Vec<u8>>>()?;
    let features = df.drop(column)?;
    debug!(column, rows = labels.len(), "split label column");
    Ok((features, labels))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl ConfusionMatrix {
    pub fn from_labels(truth: &[u8], predicted: &[u8]) -> Result<Self> {
        if truth.len() != predicted.len() {
            return Err(CeliverError::shape(
                "label count",
                predicted.len(),
                truth.len(),
            ));
        }
        let mut matrix = Self::default();
        for (&actual, &guess) in truth.iter().zip(predicted) {
            match (actual != 0, guess != 0) {
                (true, true) => matrix.true_positive += 1,
                (false, true) => matrix.false_positive += 1,
                (false, false) => matrix.true_negative += 1,
                (true, false) => matrix.false_negative += 1,
            }
        }
        Ok(matrix)
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    pub fn metrics(&self) -> ValidationMetrics {
        let tp = self.true_positive as f64;
        let fp = self.false_positive as f64;
        let tn = self.true_negative as f64;
        let fn_ = self.false_negative as f64;
        let det = ((tp + fp) * (tp + fn_) * (tn + fp) * (tn + fn_)).sqrt();
        ValidationMetrics {
            samples: self.total(),
            accuracy: fraction(tp + tn, tp + fp + tn + fn_),
            sensitivity: fraction(tp, tp + fn_),
            specificity: fraction(tn, tn + fp),
            f1: fraction(tp, tp + 0.5 * (fp + fn_)),
            mcc: fraction(tp * tn - fp * fn_, det),
        }
    }
}

fn fraction(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Summary scores of a validation run.
///
/// A score whose denominator is zero is reported as 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    pub samples: usize,
    pub accuracy: f64,
    pub sensitivity: f64,
    pub specificity: f64,
    pub f1: f64,
    pub mcc: f64,
}
