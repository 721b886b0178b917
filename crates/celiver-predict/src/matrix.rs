//! Dense numeric view of a feature table.

use polars::prelude::{AnyValue, DataFrame, DataType};

use tracing::debug;

use celiver_ingest::{any_to_f64, any_to_string};
use celiver_model::{CeliverError, Result};

/// Row-major `f64` matrix with named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    names: Vec<String>,
    rows: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    /// Build from row-major data. `data.len()` must be `rows * names.len()`.
    pub fn new(names: Vec<String>, rows: usize, data: Vec<f64>) -> Result<Self> {
        let expected = rows * names.len();
        if data.len() != expected {
            return Err(CeliverError::shape("matrix data", expected, data.len()));
        }
        Ok(Self { names, rows, data })
    }

    /// Every column from index `skip` on, cast to `f64`.
    ///
    /// Null cells become NaN and are left to the classifier's missing-value
    /// routing. A non-null cell that is not a number is a `Numeric` error.
    pub fn from_frame(df: &DataFrame, skip: usize) -> Result<Self> {
        let rows = df.height();
        let columns = df.get_columns().get(skip..).unwrap_or(&[]);
        let width = columns.len();
        let mut data = vec![0.0; rows * width];
        let mut names = Vec::with_capacity(width);
        let mut missing = 0usize;
        for (col_idx, column) in columns.iter().enumerate() {
            let name = column.name().to_string();
            let cast = column.cast(&DataType::Float64)?;
            let values = cast.as_materialized_series().f64()?;
            for (row, value) in values.into_iter().enumerate() {
                data[row * width + col_idx] = match value {
                    Some(value) => value,
                    None => {
                        let raw = column.get(row)?;
                        if matches!(raw, AnyValue::Null) {
                            missing += 1;
                            f64::NAN
                        } else if let Some(parsed) = any_to_f64(raw.clone()) {
                            parsed
                        } else {
                            return Err(CeliverError::numeric(name, row, any_to_string(raw)));
                        }
                    }
                };
            }
            names.push(name);
        }
        if missing > 0 {
            debug!(missing, "null cells passed on as NaN");
        }
        Ok(Self { names, rows, data })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.names.len()
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let width = self.cols();
        &self.data[row * width..(row + 1) * width]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).map(move |row| self.row(row))
    }
}

/// Identifiers from the first column, rendered as text.
pub fn row_ids(df: &DataFrame) -> Result<Vec<String>> {
    let column = df
        .get_columns()
        .first()
        .ok_or_else(|| CeliverError::shape("identifier column", 1, 0))?;
    Ok((0..df.height())
        .map(|row| any_to_string(column.get(row).unwrap_or(AnyValue::Null)))
        .collect())
}
