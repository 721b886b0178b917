//! Block-vs-block ratio features.
//!
//! Block lengths run from `L / 2` down to 1. A block length that divides `L`
//! partitions the positions into equal blocks and compares every pair of
//! blocks (`PR{l}_{n1}_{n2}`, blocks numbered from 1). Any other block length
//! slides a pair of adjacent blocks one position at a time
//! (`PI{l}_F{step}`, steps numbered from 1).

use celiver_model::FeatureVector;

use crate::generator::FeatureGenerator;
use crate::ratio::PositionSums;
use crate::series::RowSeries;

/// How positions are split for one block length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    /// `blocks` equal, non-overlapping blocks of `block` positions.
    Regular { block: usize, blocks: usize },
    /// Adjacent block pairs sliding over `steps` offsets.
    Irregular { block: usize, steps: usize },
}

impl Partition {
    /// Partition for block length `block` over `length` positions. `block` must be non-zero.
    pub fn new(length: usize, block: usize) -> Self {
        if length % block == 0 {
            Self::Regular {
                block,
                blocks: length / block,
            }
        } else {
            Self::Irregular {
                block,
                steps: (length + 1).saturating_sub(2 * block),
            }
        }
    }

    /// Every partition used for a series of `length`, in emission order.
    pub fn all(length: usize) -> impl Iterator<Item = Self> {
        (1..=length / 2).rev().map(move |block| Self::new(length, block))
    }

    pub fn feature_count(self) -> usize {
        match self {
            Self::Regular { blocks, .. } => blocks * blocks.saturating_sub(1) / 2,
            Self::Irregular { steps, .. } => steps,
        }
    }
}

/// All unordered pairs `(i, j)` with `i < j < count`, in lexicographic order.
pub fn pairs(count: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..count).flat_map(move |first| (first + 1..count).map(move |second| (first, second)))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProbabilityFeatures;

impl ProbabilityFeatures {
    fn push_partition(features: &mut FeatureVector, sums: &PositionSums, partition: Partition) {
        match partition {
            Partition::Regular { block, blocks } => {
                let span = |n: usize| n * block..(n + 1) * block;
                for (first, second) in pairs(blocks) {
                    features.push(
                        format!("PR{block}_{}_{}", first + 1, second + 1),
                        sums.range_ratio(span(first), span(second)),
                    );
                }
            }
            Partition::Irregular { block, steps } => {
                for start in 0..steps {
                    features.push(
                        format!("PI{block}_F{}", start + 1),
                        sums.range_ratio(start..start + block, start + block..start + 2 * block),
                    );
                }
            }
        }
    }
}

impl FeatureGenerator for ProbabilityFeatures {
    fn name(&self) -> &'static str {
        "probability"
    }

    fn feature_count(&self, length: usize) -> usize {
        Partition::all(length).map(Partition::feature_count).sum()
    }

    fn generate(&self, series: &RowSeries) -> FeatureVector {
        let length = series.len();
        let sums = PositionSums::new(&series.positions());
        let mut features = FeatureVector::with_capacity(self.feature_count(length));
        for partition in Partition::all(length) {
            Self::push_partition(&mut features, &sums, partition);
        }
        features
    }
}
