//! Prediction stage for CEliver feature tables.
//!
//! The feature table's columns after the identifier are scaled, reduced to the
//! selected columns and classified. Artifacts come from a single JSON bundle
//! produced offline.

pub mod bundle;
pub mod classifier;
pub mod hash;
pub mod matrix;
pub mod pipeline;
pub mod scaler;
pub mod select;
pub mod validate;

pub use bundle::ModelBundle;
pub use classifier::{
    Classifier, ClassifierModel, DecisionTree, LogisticClassifier, TreeEnsembleClassifier,
    sigmoid,
};
pub use hash::sha256_hex;
pub use matrix::{FeatureMatrix, row_ids};
pub use pipeline::PredictionPipeline;
pub use scaler::MinMaxScaler;
pub use select::KBestSelector;
pub use validate::{ConfusionMatrix, ValidationMetrics, split_labels};
