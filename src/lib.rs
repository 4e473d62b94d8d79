//! Centinela - Two-stage ML traffic classifier for attack-surface triage
//!
//! This library loads pre-trained stage-1 (binary) and stage-2 (multi-class)
//! classifiers, samples network-flow rows from a CSV dataset, runs both models
//! over the same sample, and reports detected attack-surface categories
//! against a synthetic event timeline.

pub mod boosted_trees;
pub mod cli;
pub mod dataset;
pub mod model_persistence;
pub mod pipeline;
pub mod report;
pub mod stump_ensemble;
pub mod timeline;
