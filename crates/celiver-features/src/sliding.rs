//! Prefix/suffix ratio features.
//!
//! For every split point `k` in `1..L` the feature `SW_{k}_{L-k}` is the sum
//! of positions before the split divided by the sum of positions after it.

use celiver_model::FeatureVector;

use crate::generator::FeatureGenerator;
use crate::ratio::PositionSums;
use crate::series::RowSeries;

#[derive(Debug, Clone, Copy, Default)]
pub struct SlidingWindowFeatures;

impl FeatureGenerator for SlidingWindowFeatures {
    fn name(&self) -> &'static str {
        "sliding_window"
    }

    fn feature_count(&self, length: usize) -> usize {
        length.saturating_sub(1)
    }

    fn generate(&self, series: &RowSeries) -> FeatureVector {
        let length = series.len();
        let sums = PositionSums::new(&series.positions());
        let mut features = FeatureVector::with_capacity(self.feature_count(length));
        for split in 1..length {
            features.push(
                format!("SW_{split}_{}", length - split),
                sums.range_ratio(0..split, split..length),
            );
        }
        features
    }
}
