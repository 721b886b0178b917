//! Model artifact bundle.
//!
//! A bundle is one JSON document holding everything fitted offline:
//!
//! ```json
//! {
//!   "feature_names": ["Age", "Sex_F", "...", "PR1_19_20"],
//!   "scaler": { "data_min": [...], "data_max": [...] },
//!   "selector": { "indices": [0, 4, 31] },
//!   "classifier": { "kind": "logistic", "weights": [...], "intercept": -0.2 },
//!   "threshold": 0.5
//! }
//! ```
//!
//! `feature_names` is optional; when present the feature table's columns
//! after the identifier must match it exactly.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use celiver_model::{CeliverError, Result};

use crate::classifier::{Classifier, ClassifierModel};
use crate::hash::sha256_hex;
use crate::scaler::MinMaxScaler;
use crate::select::KBestSelector;

fn default_threshold() -> f64 {
    0.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    /// Expected scaler input columns, in order.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub scaler: MinMaxScaler,
    pub selector: KBestSelector,
    pub classifier: ClassifierModel,
    /// A row is positive when its probability is strictly above this value.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl ModelBundle {
    /// Read, verify and validate a bundle.
    ///
    /// When `expected_sha256` is given, the file digest must match it
    /// (hex, case-insensitive) before anything is parsed.
    pub fn load(path: &Path, expected_sha256: Option<&str>) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                CeliverError::MissingInput {
                    path: path.to_path_buf(),
                }
            } else {
                CeliverError::Io(err)
            }
        })?;

        let actual = sha256_hex(&bytes);
        debug!(path = %path.display(), sha256 = %actual, "read model bundle");
        if let Some(expected) = expected_sha256 {
            let expected = expected.trim().to_ascii_lowercase();
            if actual != expected {
                return Err(CeliverError::artifact(
                    path,
                    format!("sha256 mismatch (expected {expected}, got {actual})"),
                ));
            }
        }

        let bundle: Self = serde_json::from_slice(&bytes)
            .map_err(|err| CeliverError::artifact(path, err.to_string()))?;
        bundle.validate()?;
        info!(
            path = %path.display(),
            classifier = bundle.classifier.kind(),
            scaler_features = bundle.scaler.n_features(),
            selected = bundle.selector.k(),
            "model bundle loaded"
        );
        Ok(bundle)
    }

    /// Check that scaler, selector and classifier line up.
    pub fn validate(&self) -> Result<()> {
        self.scaler.validate()?;
        let width = self.scaler.n_features();
        if let Some(names) = &self.feature_names
            && names.len() != width
        {
            return Err(CeliverError::shape("bundle feature_names", width, names.len()));
        }
        self.selector.validate(width)?;
        if self.classifier.n_features() != self.selector.k() {
            return Err(CeliverError::shape(
                "classifier features",
                self.selector.k(),
                self.classifier.n_features(),
            ));
        }
        self.classifier.validate()?;
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(CeliverError::numeric("threshold", 0, self.threshold));
        }
        Ok(())
    }

    /// Names of the columns the classifier sees, when the bundle records names.
    pub fn selected_feature_names(&self) -> Option<Vec<String>> {
        self.feature_names
            .as_deref()
            .map(|names| self.selector.selected_names(names))
    }
}
