//! Model persistence for the two classifier stages
//!
//! Persisted models are MessagePack-encoded structs, stored either as plain
//! files or packed inside a zip archive holding one (or a named) entry.
//! Loading validates feature-index consistency so a corrupt model surfaces
//! as a load error rather than a panic deep in prediction.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::boosted_trees::BoostedClassifier;
use crate::stump_ensemble::StumpEnsemble;

/// Errors that can occur during model persistence operations
#[derive(Error, Debug)]
pub enum ModelPersistenceError {
    #[error("Model file not found: {0}")]
    FileNotFound(String),

    #[error("Archive contains no entries: {0}")]
    EmptyArchive(String),

    #[error("Archive entry not found: {0}")]
    EntryNotFound(String),

    #[error("Failed to decode model: {0}")]
    DecodeError(String),

    #[error("Failed to encode model: {0}")]
    EncodeError(String),

    #[error("Invalid model format: {0}")]
    InvalidFormat(String),

    #[error("Archive error: {0}")]
    ArchiveError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for model persistence operations
pub type Result<T> = std::result::Result<T, ModelPersistenceError>;

fn is_zip_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
}

/// Read raw model bytes from a plain file or a zip archive.
///
/// `.zip` paths open the archive and read the named entry, or the first entry
/// when no name is given. All handles are dropped before returning.
fn read_model_bytes(path: &Path, entry: Option<&str>) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(ModelPersistenceError::FileNotFound(
            path.display().to_string(),
        ));
    }

    if !is_zip_path(path) {
        return Ok(std::fs::read(path)?);
    }

    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    if archive.is_empty() {
        return Err(ModelPersistenceError::EmptyArchive(
            path.display().to_string(),
        ));
    }

    let mut entry_file = match entry {
        Some(name) => archive
            .by_name(name)
            .map_err(|_| ModelPersistenceError::EntryNotFound(name.to_string()))?,
        None => archive.by_index(0)?,
    };

    let mut bytes = Vec::new();
    entry_file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn decode<M: DeserializeOwned>(bytes: &[u8]) -> Result<M> {
    rmp_serde::from_slice(bytes).map_err(|e| ModelPersistenceError::DecodeError(e.to_string()))
}

fn encode<M: Serialize>(model: &M) -> Result<Vec<u8>> {
    rmp_serde::to_vec(model).map_err(|e| ModelPersistenceError::EncodeError(e.to_string()))
}

/// Load a stage-1 stump ensemble from a plain file or zip archive
pub fn load_stump_ensemble(path: impl AsRef<Path>, entry: Option<&str>) -> Result<StumpEnsemble> {
    let bytes = read_model_bytes(path.as_ref(), entry)?;
    let model: StumpEnsemble = decode(&bytes)?;
    if !model.is_consistent() {
        return Err(ModelPersistenceError::InvalidFormat(
            "stump feature index out of range".to_string(),
        ));
    }
    Ok(model)
}

/// Load a stage-2 boosted classifier from a plain file or zip archive
pub fn load_boosted_classifier(
    path: impl AsRef<Path>,
    entry: Option<&str>,
) -> Result<BoostedClassifier> {
    let bytes = read_model_bytes(path.as_ref(), entry)?;
    let model: BoostedClassifier = decode(&bytes)?;
    if !model.is_consistent() {
        return Err(ModelPersistenceError::InvalidFormat(
            "tree feature index out of range".to_string(),
        ));
    }
    Ok(model)
}

/// Save a stump ensemble as a plain MessagePack file
pub fn save_stump_ensemble(model: &StumpEnsemble, path: impl AsRef<Path>) -> Result<()> {
    std::fs::write(path, encode(model)?)?;
    Ok(())
}

/// Save a boosted classifier as a plain MessagePack file
pub fn save_boosted_classifier(model: &BoostedClassifier, path: impl AsRef<Path>) -> Result<()> {
    std::fs::write(path, encode(model)?)?;
    Ok(())
}

fn write_archive(path: &Path, entry_name: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let file = File::create(path)?;
    let mut archive = zip::ZipWriter::new(file);
    archive.start_file(entry_name, zip::write::SimpleFileOptions::default())?;
    archive.write_all(bytes)?;
    archive.finish()?;
    Ok(())
}

/// Save a stump ensemble packed as a single-entry zip archive
pub fn save_stump_ensemble_archive(
    model: &StumpEnsemble,
    path: impl AsRef<Path>,
    entry_name: &str,
) -> Result<()> {
    write_archive(path.as_ref(), entry_name, &encode(model)?)
}

/// Save a boosted classifier packed as a single-entry zip archive
pub fn save_boosted_classifier_archive(
    model: &BoostedClassifier,
    path: impl AsRef<Path>,
    entry_name: &str,
) -> Result<()> {
    write_archive(path.as_ref(), entry_name, &encode(model)?)
}
