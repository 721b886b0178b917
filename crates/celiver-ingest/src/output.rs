//! Writers for feature tables and prediction files.

use std::fs::File;
use std::path::Path;

use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::debug;

use celiver_model::{CeliverError, PredictionSet, Result};

use crate::polars_utils::format_numeric;

/// Write a data frame as CSV with a header row.
pub fn write_csv_frame(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    CsvWriter::new(file).include_header(true).finish(df)?;
    debug!(path = %path.display(), rows = df.height(), "wrote csv frame");
    Ok(())
}

/// Write predictions as `id,probability,prediction` rows in input order.
pub fn write_predictions(predictions: &PredictionSet, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer
        .write_record(["id", "probability", "prediction"])
        .map_err(csv_error)?;
    for prediction in &predictions.predictions {
        writer
            .write_record([
                prediction.id.as_str(),
                format_numeric(prediction.probability).as_str(),
                if prediction.label == 1 { "1" } else { "0" },
            ])
            .map_err(csv_error)?;
    }
    writer.flush()?;
    debug!(
        path = %path.display(),
        rows = predictions.len(),
        "wrote predictions"
    );
    Ok(())
}

fn csv_error(error: csv::Error) -> CeliverError {
    CeliverError::Io(std::io::Error::other(error))
}
