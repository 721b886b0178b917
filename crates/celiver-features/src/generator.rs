use celiver_model::FeatureVector;

use crate::series::RowSeries;

/// A deterministic expansion of one series into named features.
///
/// Implementations must emit the same names in the same order for every
/// series of a given length; the feature table relies on it to lay out
/// columns once for all rows.
pub trait FeatureGenerator: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Number of features emitted for a series of `length` values.
    fn feature_count(&self, length: usize) -> usize;

    /// Compute the features of one series.
    fn generate(&self, series: &RowSeries) -> FeatureVector;
}
