#![deny(unsafe_code)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised anywhere between reading the input table and emitting predictions.
///
/// Ratio computations never produce an error: a zero denominator is defined as
/// a ratio of zero.
#[derive(Debug, Error)]
pub enum CeliverError {
    #[error("input not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("shape mismatch in {context}: expected {expected}, found {found}")]
    Shape {
        context: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid value in column {column} at row {row}: {value}")]
    Numeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("missing required column: {column}")]
    MissingColumn { column: String },

    #[error("column {column} already exists in the input table")]
    DuplicateColumn { column: String },

    #[error("invalid model artifact {}: {message}", path.display())]
    Artifact { path: PathBuf, message: String },

    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CeliverError {
    pub fn shape(context: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::Shape {
            context: context.into(),
            expected,
            found,
        }
    }

    pub fn numeric(column: impl Into<String>, row: usize, value: impl ToString) -> Self {
        Self::Numeric {
            column: column.into(),
            row,
            value: value.to_string(),
        }
    }

    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    pub fn artifact(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Artifact {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CeliverError>;
