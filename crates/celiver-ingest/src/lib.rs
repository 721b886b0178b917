pub mod csv_frame;
pub mod output;
pub mod polars_utils;

pub use csv_frame::{ensure_directory, ensure_file, read_csv_frame};
pub use output::{write_csv_frame, write_predictions};
pub use polars_utils::{any_to_f64, any_to_string, format_numeric};
