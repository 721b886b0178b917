use serde::{Deserialize, Serialize};

/// Classifier output for one input row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Sample identifier taken from the first input column.
    pub id: String,
    /// Positive-class probability.
    pub probability: f64,
    /// Binary class (0 or 1).
    pub label: u8,
}

/// Predictions for a whole table, in input row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionSet {
    pub predictions: Vec<Prediction>,
}

impl PredictionSet {
    pub fn new(predictions: Vec<Prediction>) -> Self {
        Self { predictions }
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    pub fn labels(&self) -> Vec<u8> {
        self.predictions.iter().map(|p| p.label).collect()
    }

    pub fn positive_count(&self) -> usize {
        self.predictions.iter().filter(|p| p.label == 1).count()
    }
}
