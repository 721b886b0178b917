//! Zero-safe ratios over sums of series positions.

use std::ops::Range;

/// `numerator / denominator`, or exactly `0.0` when the denominator is zero.
#[inline]
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Prefix sums over a slice, for O(1) range sums.
///
/// Positions are small integers, so every sum is exact in `f64` and the
/// ratios match a naive left-to-right summation bit for bit.
#[derive(Debug, Clone)]
pub struct PositionSums {
    cumulative: Vec<f64>,
}

impl PositionSums {
    pub fn new(values: &[f64]) -> Self {
        let mut cumulative = Vec::with_capacity(values.len() + 1);
        let mut running = 0.0;
        cumulative.push(running);
        for value in values {
            running += value;
            cumulative.push(running);
        }
        Self { cumulative }
    }

    pub fn len(&self) -> usize {
        self.cumulative.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of `values[range]`.
    pub fn sum(&self, range: Range<usize>) -> f64 {
        self.cumulative[range.end] - self.cumulative[range.start]
    }

    pub fn total(&self) -> f64 {
        self.sum(0..self.len())
    }

    /// Ratio of the sums of two ranges, zero when the second sums to zero.
    pub fn range_ratio(&self, numerator: Range<usize>, denominator: Range<usize>) -> f64 {
        ratio(self.sum(numerator), self.sum(denominator))
    }
}
