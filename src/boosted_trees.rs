//! Stage-2 multi-class labeler: gradient-boosted regression trees
//!
//! One scorer per class accumulates leaf values one-vs-rest; the class with
//! the highest accumulated score wins. The tree representation mirrors the
//! usual boosted-tree dump: internal nodes split on `feature < threshold`,
//! leaves carry additive score contributions. Models are trained offline and
//! loaded through [`crate::model_persistence`].
//!
//! # References
//!
//! Chen, T., & Guestrin, C. (2016). XGBoost: A scalable tree boosting system.
//! In Proceedings of the 22nd ACM SIGKDD (pp. 785-794).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for boosted classifier evaluation
#[derive(Error, Debug)]
pub enum BoostedError {
    #[error("Feature count mismatch: model expects {expected}, row has {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("Model has no classes")]
    NoClasses,
}

pub type Result<T> = std::result::Result<T, BoostedError>;

/// A node in a regression tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal node with split feature and threshold
    Internal {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    /// Leaf node with additive score contribution
    Leaf { value: f64 },
}

impl TreeNode {
    /// Walk the tree for a row; `feature < threshold` descends left
    fn score(&self, features: &[f64]) -> f64 {
        match self {
            TreeNode::Internal {
                feature_idx,
                threshold,
                left,
                right,
            } => {
                if features[*feature_idx] < *threshold {
                    left.score(features)
                } else {
                    right.score(features)
                }
            }
            TreeNode::Leaf { value } => *value,
        }
    }

    /// Highest feature index referenced anywhere in the tree
    fn max_feature_idx(&self) -> Option<usize> {
        match self {
            TreeNode::Internal {
                feature_idx,
                left,
                right,
                ..
            } => {
                let mut max = *feature_idx;
                if let Some(l) = left.max_feature_idx() {
                    max = max.max(l);
                }
                if let Some(r) = right.max_feature_idx() {
                    max = max.max(r);
                }
                Some(max)
            }
            TreeNode::Leaf { .. } => None,
        }
    }
}

/// Single boosted regression tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub root: TreeNode,
}

impl RegressionTree {
    fn score(&self, features: &[f64]) -> f64 {
        self.root.score(features)
    }
}

/// Boosting rounds for a single class (one-vs-rest)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassScorer {
    pub trees: Vec<RegressionTree>,
}

/// Gradient-boosted multi-class classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostedClassifier {
    /// Number of features each row must carry
    pub n_features: usize,
    /// Score every class starts from before tree contributions
    pub base_score: f64,
    /// Per-class tree ensembles, indexed by class id
    pub classes: Vec<ClassScorer>,
}

impl BoostedClassifier {
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Check that every tree references features within `n_features`.
    /// Persisted models are validated with this before use.
    pub fn is_consistent(&self) -> bool {
        self.classes.iter().all(|c| {
            c.trees
                .iter()
                .all(|t| t.root.max_feature_idx().map_or(true, |m| m < self.n_features))
        })
    }

    /// Accumulated per-class scores for one row
    pub fn scores_row(&self, features: &[f64]) -> Result<Vec<f64>> {
        if self.classes.is_empty() {
            return Err(BoostedError::NoClasses);
        }
        if features.len() != self.n_features {
            return Err(BoostedError::FeatureMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }

        Ok(self
            .classes
            .iter()
            .map(|c| {
                self.base_score + c.trees.iter().map(|t| t.score(features)).sum::<f64>()
            })
            .collect())
    }

    /// Predict the class index for one row; ties resolve to the lowest class
    pub fn predict_row(&self, features: &[f64]) -> Result<u32> {
        let scores = self.scores_row(features)?;

        let mut best = 0usize;
        for (i, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = i;
            }
        }
        Ok(best as u32)
    }

    /// Predict the class index for every row, preserving row order
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<u32>> {
        rows.iter().map(|r| self.predict_row(r)).collect()
    }
}
