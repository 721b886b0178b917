//! Feature extraction for CEliver biomarker tables.
//!
//! - **series**: the fixed-width series view of each row
//! - **ratio**: zero-safe ratios and block sums over series positions
//! - **sliding**: prefix/suffix ratio features (`SW_*`)
//! - **probability**: block-vs-block ratio features (`PR*`, `PI*`)
//! - **table**: per-row feature assembly and concatenation with the input
//! - **raw**: sex indicator derivation and AFP log transform for raw input

pub mod generator;
pub mod probability;
pub mod ratio;
pub mod raw;
pub mod series;
pub mod sliding;
pub mod table;

use polars::prelude::DataFrame;
use tracing::info_span;

use celiver_model::Result;

pub use generator::FeatureGenerator;
pub use probability::{Partition, ProbabilityFeatures, pairs};
pub use ratio::{PositionSums, ratio};
pub use raw::RawPreprocessor;
pub use series::{RowSeries, SeriesColumns};
pub use sliding::SlidingWindowFeatures;
pub use table::FeatureTableBuilder;

/// Whether an input table still needs raw preprocessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Carries `Sex` as a category and untransformed `AFP`.
    #[default]
    Raw,
    /// Already holds `Sex_F`/`Sex_M` indicators and log-scaled `AFP`.
    Preprocessed,
}

/// Preprocess (when raw) and append the generated feature columns.
pub fn extract_features(
    df: &DataFrame,
    mode: InputMode,
    builder: &FeatureTableBuilder,
) -> Result<DataFrame> {
    let span = info_span!("extract_features", rows = df.height(), mode = ?mode);
    let _guard = span.enter();
    match mode {
        InputMode::Raw => {
            let preprocessed = RawPreprocessor::default().apply(df)?;
            builder.build(&preprocessed)
        }
        InputMode::Preprocessed => builder.build(df),
    }
}
