//! Binary classifiers evaluated on the selected, scaled features.
//!
//! Two model families are supported:
//!
//! - [`LogisticClassifier`]: a linear score passed through the logistic function.
//! - [`TreeEnsembleClassifier`]: boosted regression trees whose leaf values
//!   are summed into a raw score, then passed through the logistic function.

use serde::{Deserialize, Serialize};

use celiver_model::{CeliverError, Result};

/// Logistic function.
#[inline]
pub fn sigmoid(score: f64) -> f64 {
    1.0 / (1.0 + (-score).exp())
}

/// A binary classifier over a fixed-width feature row.
pub trait Classifier: Send + Sync {
    /// Number of features each row must carry.
    fn n_features(&self) -> usize;

    /// Positive-class probability of one row.
    fn predict_proba(&self, row: &[f64]) -> f64;

    /// Structural checks run once after loading.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Logistic
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

impl Classifier for LogisticClassifier {
    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn predict_proba(&self, row: &[f64]) -> f64 {
        let score: f64 = self
            .weights
            .iter()
            .zip(row)
            .map(|(weight, value)| weight * value)
            .sum();
        sigmoid(score + self.intercept)
    }
}

// ============================================================================
// Tree ensemble
// ============================================================================

/// One regression tree stored as parallel per-node arrays.
///
/// Node 0 is the root. A row goes left when `value <= threshold`; a NaN value
/// follows `default_left`. Child indices must point past their parent, which
/// rules out cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub split_feature: Vec<usize>,
    pub threshold: Vec<f64>,
    pub left: Vec<usize>,
    pub right: Vec<usize>,
    pub default_left: Vec<bool>,
    pub is_leaf: Vec<bool>,
    pub leaf_value: Vec<f64>,
}

impl DecisionTree {
    /// A tree consisting of a single leaf.
    pub fn leaf(value: f64) -> Self {
        Self {
            split_feature: vec![0],
            threshold: vec![0.0],
            left: vec![0],
            right: vec![0],
            default_left: vec![true],
            is_leaf: vec![true],
            leaf_value: vec![value],
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    pub fn validate(&self, n_features: usize) -> Result<()> {
        let nodes = self.n_nodes();
        if nodes == 0 {
            return Err(CeliverError::shape("tree nodes", 1, 0));
        }
        let lengths = [
            ("tree split_feature", self.split_feature.len()),
            ("tree threshold", self.threshold.len()),
            ("tree left", self.left.len()),
            ("tree right", self.right.len()),
            ("tree default_left", self.default_left.len()),
            ("tree leaf_value", self.leaf_value.len()),
        ];
        for (context, len) in lengths {
            if len != nodes {
                return Err(CeliverError::shape(context, nodes, len));
            }
        }
        for node in 0..nodes {
            if self.is_leaf[node] {
                continue;
            }
            if self.split_feature[node] >= n_features {
                return Err(CeliverError::shape(
                    format!("split feature of node {node}"),
                    n_features,
                    self.split_feature[node] + 1,
                ));
            }
            for child in [self.left[node], self.right[node]] {
                if child <= node || child >= nodes {
                    return Err(CeliverError::shape(
                        format!("child of node {node}"),
                        nodes,
                        child,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Leaf value reached by `row`.
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut node = 0;
        while !self.is_leaf[node] {
            let value = row[self.split_feature[node]];
            let go_left = if value.is_nan() {
                self.default_left[node]
            } else {
                value <= self.threshold[node]
            };
            node = if go_left {
                self.left[node]
            } else {
                self.right[node]
            };
        }
        self.leaf_value[node]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsembleClassifier {
    pub n_features: usize,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<DecisionTree>,
}

impl Classifier for TreeEnsembleClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, row: &[f64]) -> f64 {
        let score: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        sigmoid(self.base_score + score)
    }

    fn validate(&self) -> Result<()> {
        self.trees
            .iter()
            .try_for_each(|tree| tree.validate(self.n_features))
    }
}

// ============================================================================
// Serialized model
// ============================================================================

/// Classifier as stored in a model bundle, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierModel {
    Logistic(LogisticClassifier),
    TreeEnsemble(TreeEnsembleClassifier),
}

impl ClassifierModel {
    fn inner(&self) -> &dyn Classifier {
        match self {
            Self::Logistic(model) => model,
            Self::TreeEnsemble(model) => model,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Logistic(_) => "logistic",
            Self::TreeEnsemble(_) => "tree_ensemble",
        }
    }
}

impl Classifier for ClassifierModel {
    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn predict_proba(&self, row: &[f64]) -> f64 {
        self.inner().predict_proba(row)
    }

    fn validate(&self) -> Result<()> {
        self.inner().validate()
    }
}
