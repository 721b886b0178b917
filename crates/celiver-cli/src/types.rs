use std::path::PathBuf;

use celiver_features::InputMode;
use celiver_predict::{ConfusionMatrix, ValidationMetrics};

#[derive(Debug)]
pub struct FeaturesResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mode: InputMode,
    pub rows: usize,
    pub columns: usize,
    pub generated: usize,
}

#[derive(Debug)]
pub struct PredictResult {
    pub input: PathBuf,
    pub model: PathBuf,
    pub output: PathBuf,
    pub mode: InputMode,
    pub rows: usize,
    pub positives: usize,
    pub generated: usize,
    pub selected: usize,
    pub validation: Option<ValidationReport>,
}

/// Predictions scored against a known outcome column.
#[derive(Debug)]
pub struct ValidationReport {
    pub label_column: String,
    pub matrix: ConfusionMatrix,
    pub metrics: ValidationMetrics,
}
