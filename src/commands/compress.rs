//! Compression commands for the three ways a PDF can be handed in.

use crate::api_contracts::CompressResponse;
use crate::error::{CompressorError, Result};
use crate::paths::clean_path_input;
use crate::state::AppStateManager;
use crate::types::{OptimizeLevel, SaveOutcome, UnsavedOutput};
use std::path::PathBuf;

/// What a compress command produced
#[derive(Debug)]
pub enum CompressOutput {
    Saved(CompressResponse),
    /// The write failed; the caller still gets the compressed PDF
    Unsaved(UnsavedOutput),
}

impl From<SaveOutcome> for CompressOutput {
    fn from(outcome: SaveOutcome) -> Self {
        match outcome {
            SaveOutcome::Saved(result) => CompressOutput::Saved(result.into()),
            SaveOutcome::Unsaved(output) => CompressOutput::Unsaved(output),
        }
    }
}

fn optional_path(input: Option<&str>) -> Option<PathBuf> {
    input
        .filter(|s| !s.trim().is_empty())
        .map(clean_path_input)
}

fn required_path(input: &str, what: &str) -> Result<PathBuf> {
    optional_path(Some(input))
        .ok_or_else(|| CompressorError::invalid_path("", format!("Missing required parameter: {}", what)))
}

/// Read a local file into memory and send it through the upload path.
///
/// Without `destination_path` the output goes to the fallback directory.
pub async fn compress_upload(
    state_manager: &AppStateManager,
    file_path: &str,
    destination_path: Option<&str>,
    level: OptimizeLevel,
) -> Result<CompressOutput> {
    let file_path = required_path(file_path, "file")?;
    let bytes = state_manager.workflow.read_source(&file_path)?;
    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| CompressorError::SourceNotFound { path: file_path.clone() })?;

    state_manager.debug_logger.info(format!(
        "Uploading {} ({:.2} MB)",
        file_name,
        bytes.len() as f64 / 1024.0 / 1024.0
    ));

    let outcome = state_manager
        .workflow
        .compress_upload(bytes, &file_name, level, optional_path(destination_path))
        .await?;
    Ok(outcome.into())
}

/// Compress `source_dir/file_name` into `destination_path`
pub async fn compress_from_path(
    state_manager: &AppStateManager,
    source_dir: &str,
    file_name: &str,
    destination_path: &str,
    level: OptimizeLevel,
    delete_original: bool,
) -> Result<CompressOutput> {
    let source_dir = required_path(source_dir, "source path")?;
    let destination = required_path(destination_path, "destination path")?;
    if file_name.trim().is_empty() {
        return Err(CompressorError::invalid_path(&source_dir, "Missing required parameter: file name"));
    }

    state_manager.debug_logger.info(format!(
        "Processing {} from {} (delete original: {})",
        file_name,
        source_dir.display(),
        if delete_original { "YES" } else { "NO" }
    ));

    let outcome = state_manager
        .workflow
        .compress_from_dir(&source_dir, file_name, level, &destination, delete_original)
        .await?;
    Ok(outcome.into())
}

/// Compress a file and store the result alongside it
pub async fn compress_from_full_path(
    state_manager: &AppStateManager,
    full_path: &str,
    file_name: Option<&str>,
    level: OptimizeLevel,
    delete_original: bool,
) -> Result<CompressOutput> {
    let full_path = required_path(full_path, "full path")?;
    let file_name = file_name.filter(|n| !n.trim().is_empty());

    state_manager.debug_logger.info(format!(
        "Processing PDF from full path: {} (delete original: {})",
        full_path.display(),
        if delete_original { "YES" } else { "NO" }
    ));

    let outcome = state_manager
        .workflow
        .compress_in_place(&full_path, file_name, level, delete_original)
        .await?;
    Ok(outcome.into())
}
