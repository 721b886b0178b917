pub mod error;
pub mod feature;
pub mod layout;
pub mod prediction;

pub use error::{CeliverError, Result};
pub use feature::{Feature, FeatureVector};
pub use layout::SeriesLayout;
pub use prediction::{Prediction, PredictionSet};
