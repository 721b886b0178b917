//! Assembly of the wide feature table.
//!
//! Every row's series is expanded by the sliding-window generator followed by
//! the probability generator. The generated columns are identical for all
//! rows, so they are laid out once and filled column-major before being
//! appended to the input table.

use std::time::Instant;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use rayon::ThreadPoolBuilder;
use rayon::prelude::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, info_span};

use celiver_model::{CeliverError, FeatureVector, Result, SeriesLayout};

use crate::generator::FeatureGenerator;
use crate::probability::ProbabilityFeatures;
use crate::series::{RowSeries, SeriesColumns};
use crate::sliding::SlidingWindowFeatures;

/// Builds the feature table for a preprocessed input table.
#[derive(Debug, Clone)]
pub struct FeatureTableBuilder {
    layout: SeriesLayout,
    /// Number of worker threads.
    ///
    /// - `0`: use rayon's global thread pool
    /// - `1`: compute rows sequentially
    /// - `n > 1`: run on a dedicated pool of `n` threads
    threads: usize,
    sliding: SlidingWindowFeatures,
    probability: ProbabilityFeatures,
}

impl Default for FeatureTableBuilder {
    fn default() -> Self {
        Self {
            layout: SeriesLayout::STANDARD,
            threads: 0,
            sliding: SlidingWindowFeatures,
            probability: ProbabilityFeatures,
        }
    }
}

impl FeatureTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: SeriesLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn layout(&self) -> SeriesLayout {
        self.layout
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    fn generators(&self) -> [&dyn FeatureGenerator; 2] {
        [&self.sliding, &self.probability]
    }

    /// Number of generated columns.
    pub fn feature_count(&self) -> usize {
        self.generators()
            .iter()
            .map(|generator| generator.feature_count(self.layout.length))
            .sum()
    }

    /// Names of the generated columns, in table order.
    pub fn feature_names(&self) -> Vec<String> {
        let blank = vec![None; self.layout.length];
        let series = RowSeries::new(blank, self.layout)
            .map(|series| self.row_features(&series))
            .unwrap_or_default();
        series.names().map(str::to_string).collect()
    }

    /// Features of one row: sliding-window features, then probability features.
    pub fn row_features(&self, series: &RowSeries) -> FeatureVector {
        let mut features = FeatureVector::with_capacity(self.feature_count());
        for generator in self.generators() {
            features.append(generator.generate(series));
        }
        features
    }

    /// Append the generated feature columns to `df`.
    ///
    /// The input is left untouched. Fails when the table width does not match
    /// the series layout or when an input column already uses a feature name.
    pub fn build(&self, df: &DataFrame) -> Result<DataFrame> {
        let span = info_span!("feature_table", rows = df.height(), threads = self.threads);
        let _guard = span.enter();
        let start = Instant::now();

        let series = SeriesColumns::from_frame(df, self.layout)?;
        let names = self.feature_names();
        for name in &names {
            if df.column(name).is_ok() {
                return Err(CeliverError::DuplicateColumn {
                    column: name.clone(),
                });
            }
        }

        let rows = self.compute_rows(&series)?;
        let mut values: Vec<Vec<f64>> = names
            .iter()
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();
        for (row, features) in rows.iter().enumerate() {
            if features.len() != names.len() {
                return Err(CeliverError::shape(
                    format!("features of row {row}"),
                    names.len(),
                    features.len(),
                ));
            }
            for (column, value) in values.iter_mut().zip(features.values()) {
                column.push(value);
            }
        }
        let columns: Vec<Column> = names
            .iter()
            .zip(values)
            .map(|(name, column)| Series::new(name.as_str().into(), column).into_column())
            .collect();
        let table = df.hstack(&columns)?;

        info!(
            rows = table.height(),
            features = names.len(),
            duration_ms = start.elapsed().as_millis(),
            "feature table built"
        );
        Ok(table)
    }

    fn compute_rows(&self, series: &SeriesColumns) -> Result<Vec<FeatureVector>> {
        let height = series.height();
        match self.threads {
            1 => {
                debug!(rows = height, "computing features sequentially");
                Ok((0..height)
                    .map(|row| self.row_features(&series.row(row)))
                    .collect())
            }
            0 => Ok(self.compute_parallel(series)),
            threads => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|err| CeliverError::Io(std::io::Error::other(err)))?;
                Ok(pool.install(|| self.compute_parallel(series)))
            }
        }
    }

    /// Indexed parallel collect: results land at their row position.
    fn compute_parallel(&self, series: &SeriesColumns) -> Vec<FeatureVector> {
        debug!(
            rows = series.height(),
            pool_threads = rayon::current_num_threads(),
            "computing features in parallel"
        );
        (0..series.height())
            .into_par_iter()
            .map(|row| self.row_features(&series.row(row)))
            .collect()
    }
}
