use serde::{Deserialize, Serialize};

use celiver_model::{CeliverError, Result};

use crate::matrix::FeatureMatrix;

/// Keeps the columns chosen by an offline k-best fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KBestSelector {
    /// Selected column positions in the scaled matrix, ascending.
    pub indices: Vec<usize>,
}

impl KBestSelector {
    pub fn new(indices: Vec<usize>) -> Result<Self> {
        let selector = Self { indices };
        selector.validate(usize::MAX)?;
        Ok(selector)
    }

    pub fn k(&self) -> usize {
        self.indices.len()
    }

    /// Indices must be strictly increasing and below `width`.
    pub fn validate(&self, width: usize) -> Result<()> {
        for pair in self.indices.windows(2) {
            if pair[0] >= pair[1] {
                return Err(CeliverError::shape("selector index order", pair[0] + 1, pair[1]));
            }
        }
        if let Some(&last) = self.indices.last()
            && last >= width
        {
            return Err(CeliverError::shape("selector index range", width, last + 1));
        }
        Ok(())
    }

    pub fn transform(&self, matrix: &FeatureMatrix) -> Result<FeatureMatrix> {
        self.validate(matrix.cols())?;
        let names = self.selected_names(matrix.names());
        let mut data = Vec::with_capacity(matrix.rows() * self.k());
        for row in matrix.iter_rows() {
            data.extend(self.indices.iter().map(|&idx| row[idx]));
        }
        FeatureMatrix::new(names, matrix.rows(), data)
    }

    /// Names of the selected columns, skipping indices outside `names`.
    pub fn selected_names(&self, names: &[String]) -> Vec<String> {
        self.indices
            .iter()
            .filter_map(|&idx| names.get(idx).cloned())
            .collect()
    }
}
