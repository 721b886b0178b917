//! CSV loading into polars data frames.
//!
//! Input files carry one sample per row: an identifier, demographic and
//! biomarker columns, and the fixed-width series. Columns are kept in file
//! order because downstream stages address them by position.

use std::path::{Path, PathBuf};

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use tracing::debug;

use celiver_model::{CeliverError, Result};

/// Rows scanned to infer column types.
const INFER_SCHEMA_ROWS: usize = 1000;

/// Fail with [`CeliverError::MissingInput`] unless `path` is an existing file.
pub fn ensure_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CeliverError::MissingInput {
            path: path.to_path_buf(),
        })
    }
}

/// Fail with [`CeliverError::MissingInput`] unless `path` is an existing directory.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CeliverError::MissingInput {
            path: path.to_path_buf(),
        })
    }
}

/// Read a CSV file with a header row into a data frame.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    ensure_file(path)?;
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read input csv"
    );
    Ok(df)
}
