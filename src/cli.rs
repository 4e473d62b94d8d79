//! CLI argument parsing for Centinela

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Output format for the attack-surface report
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

/// Which side of the report mapping becomes the key
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KeyedBy {
    /// category -> timestamp (default)
    Category,
    /// timestamp -> category
    Timestamp,
}

#[derive(Parser, Debug)]
#[command(name = "centinela")]
#[command(version)]
#[command(about = "Two-stage ML traffic classifier for attack-surface triage", long_about = None)]
pub struct Cli {
    /// Stage-1 binary detector model (plain file or .zip archive)
    #[arg(long = "stage1", value_name = "PATH")]
    pub stage1: PathBuf,

    /// Archive entry holding the stage-1 model (defaults to the first entry)
    #[arg(long = "stage1-entry", value_name = "NAME")]
    pub stage1_entry: Option<String>,

    /// Stage-2 multi-class labeler model (plain file or .zip archive)
    #[arg(long = "stage2", value_name = "PATH")]
    pub stage2: PathBuf,

    /// Archive entry holding the stage-2 model (defaults to the first entry)
    #[arg(long = "stage2-entry", value_name = "NAME")]
    pub stage2_entry: Option<String>,

    /// Flow dataset to sample from (CSV with a flow_duration column)
    #[arg(long = "dataset", value_name = "PATH")]
    pub dataset: PathBuf,

    /// Number of rows to sample from the dataset
    #[arg(
        short = 'n',
        long = "sample-size",
        value_name = "N",
        default_value = "50"
    )]
    pub sample_size: usize,

    /// Fixed RNG seed for a reproducible sample (omit for an independent draw)
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Report mapping direction
    #[arg(long = "keyed-by", value_enum, default_value = "category")]
    pub keyed_by: KeyedBy,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
