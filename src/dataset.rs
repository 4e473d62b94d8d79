//! CSV flow dataset loading and random sampling
//!
//! Datasets are loaded once into memory with whatever columns the file
//! carries (headers are read dynamically, every field parsed as a number)
//! and are immutable after load. Sampling draws rows uniformly without
//! replacement; a fixed seed makes the draw reproducible across runs.

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

/// Errors for dataset loading and sampling
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Row {row}: failed to parse field '{field}' as a number: {value:?}")]
    ParseError {
        row: usize,
        field: String,
        value: String,
    },

    #[error("Sample size {requested} exceeds dataset rows {available}")]
    SampleTooLarge { requested: usize, available: usize },

    #[error("Sample size must be positive")]
    EmptySample,

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, DatasetError>;

/// In-memory tabular dataset with named columns, immutable after load
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl Dataset {
    /// Load a dataset from a CSV file with a header row
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path.as_ref())?;

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let mut row = Vec::with_capacity(columns.len());
            for (j, raw) in record.iter().enumerate() {
                let value: f64 = raw.trim().parse().map_err(|_| DatasetError::ParseError {
                    row: i,
                    field: columns.get(j).cloned().unwrap_or_default(),
                    value: raw.to_string(),
                })?;
                row.push(value);
            }
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Build a dataset directly from columns and rows (used by tests and
    /// model-producing tooling)
    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Draw `n` distinct rows uniformly at random.
    ///
    /// The sample's row order is the draw order, not the dataset order.
    /// `seed = Some(s)` draws from a seeded RNG (identical seed, dataset and
    /// `n` reproduce the identical sample); `None` draws fresh each run.
    pub fn sample(&self, n: usize, seed: Option<u64>) -> Result<Sample> {
        if n == 0 {
            return Err(DatasetError::EmptySample);
        }
        if n > self.rows.len() {
            return Err(DatasetError::SampleTooLarge {
                requested: n,
                available: self.rows.len(),
            });
        }

        let indices = match seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                rand::seq::index::sample(&mut rng, self.rows.len(), n).into_vec()
            }
            None => {
                let mut rng = rand::thread_rng();
                rand::seq::index::sample(&mut rng, self.rows.len(), n).into_vec()
            }
        };

        let rows = indices.iter().map(|&i| self.rows[i].clone()).collect();
        Ok(Sample {
            columns: self.columns.clone(),
            source_indices: indices,
            rows,
        })
    }
}

/// A row subset of a [`Dataset`], preserving the full column set
#[derive(Debug, Clone)]
pub struct Sample {
    columns: Vec<String>,
    source_indices: Vec<usize>,
    rows: Vec<Vec<f64>>,
}

impl Sample {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Dataset row indices the sample was drawn from, in draw order
    pub fn source_indices(&self) -> &[usize] {
        &self.source_indices
    }

    /// Values of one named column, in sample row order
    pub fn column_values(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self
            .columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| DatasetError::ColumnNotFound(name.to_string()))?;
        Ok(self.rows.iter().map(|r| r[idx]).collect())
    }
}
