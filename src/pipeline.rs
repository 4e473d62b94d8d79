//! Two-stage prediction pipeline
//!
//! One batch per run: load both models and the dataset, draw a random
//! sample, run the stage-1 binary detector and the stage-2 multi-class
//! labeler over the identical rows, map classes to attack-surface labels,
//! synthesize the event timeline, and assemble the report.
//!
//! The stages are independent: stage-1 output is carried through as a raw
//! column and never fed to stage-2.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::boosted_trees::{self, BoostedClassifier};
use crate::dataset::{self, Dataset, Sample};
use crate::model_persistence;
use crate::report::{Report, ReportKey};
use crate::stump_ensemble::{self, StumpEnsemble};
use crate::timeline;

/// Errors for pipeline runs
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage-1 model error: {0}")]
    Stage1(#[from] stump_ensemble::StumpError),

    #[error("Stage-2 model error: {0}")]
    Stage2(#[from] boosted_trees::BoostedError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] dataset::DatasetError),

    #[error("Model load error: {0}")]
    ModelLoad(#[from] model_persistence::ModelPersistenceError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Name of the duration column the timeline is synthesized from
pub const FLOW_DURATION_COLUMN: &str = "flow_duration";

/// Marker rendered when the stage-2 model emits a class outside the table
pub const UNMAPPED_LABEL: &str = "<unmapped>";

/// Attack-surface categories emitted by the stage-2 labeler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceArea {
    BenignTraffic,
    ReconHostDiscovery,
    ReconOsScan,
    ReconPortScan,
    VulnerabilityScan,
}

impl SurfaceArea {
    /// Total over classes 0-4; anything else is unmapped
    pub fn from_class(class: u32) -> Option<Self> {
        match class {
            0 => Some(Self::BenignTraffic),
            1 => Some(Self::ReconHostDiscovery),
            2 => Some(Self::ReconOsScan),
            3 => Some(Self::ReconPortScan),
            4 => Some(Self::VulnerabilityScan),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BenignTraffic => "BenignTraffic",
            Self::ReconHostDiscovery => "Recon-HostDiscovery",
            Self::ReconOsScan => "Recon-OSScan",
            Self::ReconPortScan => "Recon-PortScan",
            Self::VulnerabilityScan => "VulnerabilityScan",
        }
    }
}

impl fmt::Display for SurfaceArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sampled row augmented with both model outputs and its synthetic
/// event instant
#[derive(Debug, Clone)]
pub struct PredictionRow {
    /// Raw stage-1 binary flag
    pub binary_pred: u8,
    /// Raw stage-2 class before label mapping
    pub class: u32,
    /// Mapped label; `None` when the class falls outside the table
    pub surface_area: Option<SurfaceArea>,
    /// Elapsed seconds for this flow, from the dataset
    pub flow_duration: f64,
    /// Synthetic event instant
    pub time_stamp: DateTime<Utc>,
}

impl PredictionRow {
    pub fn label_str(&self) -> &'static str {
        self.surface_area.map_or(UNMAPPED_LABEL, SurfaceArea::as_str)
    }
}

/// Run both models over the same sampled rows and synthesize the timeline.
///
/// Both predictions are computed on the identical row set and order; the
/// timeline is prefix-summed over the sample's `flow_duration` column and
/// anchored at `start`.
pub fn run_two_stage(
    sample: &Sample,
    stage1: &StumpEnsemble,
    stage2: &BoostedClassifier,
    start: DateTime<Utc>,
) -> Result<Vec<PredictionRow>> {
    let binary = stage1.predict(sample.rows())?;
    let classes = stage2.predict(sample.rows())?;
    let durations = sample.column_values(FLOW_DURATION_COLUMN)?;
    let stamps = timeline::synthesize(&durations, start);

    Ok(binary
        .into_iter()
        .zip(classes)
        .zip(durations.into_iter().zip(stamps))
        .map(
            |((binary_pred, class), (flow_duration, time_stamp))| PredictionRow {
                binary_pred,
                class,
                surface_area: SurfaceArea::from_class(class),
                flow_duration,
                time_stamp,
            },
        )
        .collect())
}

/// Everything one pipeline run needs, injected explicitly
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Stage-1 model path (plain file or `.zip` archive)
    pub stage1_path: PathBuf,
    /// Archive entry holding the stage-1 model, for `.zip` paths
    pub stage1_entry: Option<String>,
    /// Stage-2 model path (plain file or `.zip` archive)
    pub stage2_path: PathBuf,
    /// Archive entry holding the stage-2 model, for `.zip` paths
    pub stage2_entry: Option<String>,
    /// Flow dataset to sample from
    pub dataset_path: PathBuf,
    /// Number of rows to sample
    pub sample_size: usize,
    /// Fixed RNG seed for a reproducible draw; `None` draws fresh each run
    pub seed: Option<u64>,
    /// Report mapping direction
    pub keyed_by: ReportKey,
}

/// Load models and dataset, sample, predict, and assemble the report.
///
/// The run-start instant is captured here, once per run.
pub fn run(config: &PipelineConfig) -> Result<Report> {
    let stage1 =
        model_persistence::load_stump_ensemble(&config.stage1_path, config.stage1_entry.as_deref())?;
    let stage2 = model_persistence::load_boosted_classifier(
        &config.stage2_path,
        config.stage2_entry.as_deref(),
    )?;
    tracing::debug!(
        stage1_stumps = stage1.stumps.len(),
        stage2_classes = stage2.n_classes(),
        "models loaded"
    );

    let dataset = Dataset::from_csv(&config.dataset_path)?;
    let sample = dataset.sample(config.sample_size, config.seed)?;
    tracing::debug!(rows = sample.len(), total = dataset.len(), "sampled dataset");

    let start = Utc::now();
    let rows = run_two_stage(&sample, &stage1, &stage2, start)?;

    let report = Report::build(&rows, config.keyed_by);
    tracing::debug!(
        predicted = rows.len(),
        reported = report.len(),
        "report assembled"
    );
    Ok(report)
}
