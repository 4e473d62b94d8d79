//! Stage-1 binary detector: weighted decision-stump ensemble
//!
//! An AdaBoost-style committee of one-feature threshold stumps. Each stump
//! votes ±1 by thresholding a single feature; votes are scaled by the stump's
//! boosting weight and the signed sum decides the binary flag. Models are
//! trained offline and loaded through [`crate::model_persistence`]; this
//! module only evaluates them.
//!
//! # References
//!
//! Freund, Y., & Schapire, R. E. (1997). A decision-theoretic generalization
//! of on-line learning and an application to boosting. Journal of Computer
//! and System Sciences, 55(1), 119-139.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for stump ensemble evaluation
#[derive(Error, Debug)]
pub enum StumpError {
    #[error("Feature count mismatch: model expects {expected}, row has {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("Model has no stumps")]
    EmptyEnsemble,
}

pub type Result<T> = std::result::Result<T, StumpError>;

/// One-feature threshold classifier voting ±1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionStump {
    /// Index of the feature this stump thresholds
    pub feature_idx: usize,
    /// Split point
    pub threshold: f64,
    /// +1 votes positive above the threshold, -1 inverts the vote
    pub polarity: i8,
    /// Boosting weight (alpha) for this stump
    pub weight: f64,
}

impl DecisionStump {
    /// Signed, weighted vote for one row
    fn vote(&self, features: &[f64]) -> f64 {
        let raw = if features[self.feature_idx] > self.threshold {
            1.0
        } else {
            -1.0
        };
        raw * f64::from(self.polarity) * self.weight
    }
}

/// Weighted stump committee producing a 0/1 flag per row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StumpEnsemble {
    /// Number of features each row must carry
    pub n_features: usize,
    /// Committee members in boosting order
    pub stumps: Vec<DecisionStump>,
}

impl StumpEnsemble {
    /// Check that every stump references a feature within `n_features`.
    /// Persisted models are validated with this before use.
    pub fn is_consistent(&self) -> bool {
        self.stumps.iter().all(|s| s.feature_idx < self.n_features)
    }

    /// Predict the binary flag for a single row
    pub fn predict_row(&self, features: &[f64]) -> Result<u8> {
        if self.stumps.is_empty() {
            return Err(StumpError::EmptyEnsemble);
        }
        if features.len() != self.n_features {
            return Err(StumpError::FeatureMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let score: f64 = self.stumps.iter().map(|s| s.vote(features)).sum();
        Ok(u8::from(score > 0.0))
    }

    /// Predict the binary flag for every row, preserving row order
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<u8>> {
        rows.iter().map(|r| self.predict_row(r)).collect()
    }
}
