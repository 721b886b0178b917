//! Fixed-width series view over table rows.

use polars::prelude::{DataFrame, DataType};

use celiver_model::{CeliverError, Result, SeriesLayout};

/// The series of one row: `layout.length` cells taken from `layout.offset` on.
///
/// Cells that are missing or not numeric are kept as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSeries {
    values: Vec<Option<f64>>,
}

impl RowSeries {
    /// Build a series, rejecting any length other than the layout's.
    pub fn new(values: Vec<Option<f64>>, layout: SeriesLayout) -> Result<Self> {
        if values.len() != layout.length {
            return Err(CeliverError::shape("row series", layout.length, values.len()));
        }
        Ok(Self { values })
    }

    pub fn from_values(values: &[f64], layout: SeriesLayout) -> Result<Self> {
        Self::new(values.iter().copied().map(Some).collect(), layout)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Measured values of the row.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Index positions `0..len` as floats.
    ///
    /// The ratio generators work on these positions, not on [`Self::values`].
    /// Trained artifacts depend on that, so it must not change.
    pub fn positions(&self) -> Vec<f64> {
        (0..self.values.len()).map(|idx| idx as f64).collect()
    }
}

/// Column-major copy of the series columns of a whole table.
#[derive(Debug, Clone)]
pub struct SeriesColumns {
    layout: SeriesLayout,
    columns: Vec<Vec<Option<f64>>>,
    height: usize,
}

impl SeriesColumns {
    /// Extract the series columns of `df`.
    ///
    /// The table must expose exactly `layout.required_width()` columns; any
    /// other width would change which cells belong to the series.
    pub fn from_frame(df: &DataFrame, layout: SeriesLayout) -> Result<Self> {
        let expected = layout.required_width();
        if df.width() != expected {
            return Err(CeliverError::shape("input columns", expected, df.width()));
        }
        let mut columns = Vec::with_capacity(layout.length);
        for column in &df.get_columns()[layout.columns()] {
            let cast = column.cast(&DataType::Float64)?;
            let values: Vec<Option<f64>> =
                cast.as_materialized_series().f64()?.into_iter().collect();
            columns.push(values);
        }
        Ok(Self {
            layout,
            columns,
            height: df.height(),
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layout(&self) -> SeriesLayout {
        self.layout
    }

    /// Series of row `row`. Panics if `row >= height`.
    pub fn row(&self, row: usize) -> RowSeries {
        RowSeries {
            values: self.columns.iter().map(|column| column[row]).collect(),
        }
    }
}
