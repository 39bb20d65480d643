//! Debug and diagnostic commands.

use crate::api_contracts::{ProbeResponse, SaveProbeResponse};
use crate::config_utils;
use crate::error::{CompressorError, Result};
use crate::paths::clean_path_input;
use crate::state::AppStateManager;
use std::path::PathBuf;

/// Check whether the compression service answers
pub async fn check_service(state_manager: &AppStateManager) -> ProbeResponse {
    state_manager.debug_logger.info(format!(
        "Checking compression service at {}",
        state_manager.config.status_url
    ));

    match state_manager.client.check_status().await {
        Ok(body) => ProbeResponse {
            success: true,
            message: "Compression service is accessible".to_string(),
            details: Some(body),
        },
        Err(CompressorError::CompressionService { status: 0, body }) => ProbeResponse {
            success: false,
            message: "Cannot connect to compression service".to_string(),
            details: Some(body),
        },
        Err(e) => ProbeResponse {
            success: false,
            message: e.to_string(),
            details: None,
        },
    }
}

/// Check that files can be created and deleted in `dir`
pub fn check_delete(state_manager: &AppStateManager, dir: Option<&str>) -> ProbeResponse {
    let dir = dir.map(clean_path_input);
    let report = state_manager.diagnostics.deletion_probe(dir.as_deref());
    ProbeResponse {
        success: report.success,
        message: report.message,
        details: None,
    }
}

/// Copy a file uncompressed into `destination_path` to prove the destination is writable
pub fn test_save(
    state_manager: &AppStateManager,
    file_path: &str,
    destination_path: &str,
) -> Result<SaveProbeResponse> {
    let file_path = clean_path_input(file_path);
    let destination = clean_path_input(destination_path);
    if destination.as_os_str().is_empty() {
        return Err(CompressorError::invalid_destination(destination, "No destination path specified"));
    }

    let bytes = state_manager.workflow.read_source(&file_path)?;
    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload.pdf".to_string());

    let saved_path = state_manager
        .diagnostics
        .save_probe(&destination, &bytes, &file_name)?;

    Ok(SaveProbeResponse {
        success: true,
        message: "Test file saved successfully".to_string(),
        filename: saved_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        saved_path,
    })
}

/// Export the buffered debug log to the logs directory
pub fn export_debug_log(state_manager: &AppStateManager) -> Result<PathBuf> {
    let logs_dir = config_utils::get_logs_dir()?;
    state_manager
        .debug_logger
        .save_report_to_dir(&logs_dir)
        .map_err(CompressorError::Internal)
}
