//! Folder commands: listing PDFs and revealing a folder in the file manager.

use crate::api_contracts::ListPdfsResponse;
use crate::error::{CompressorError, Result};
use crate::paths::clean_path_input;
use crate::state::AppStateManager;

/// List PDF files under `source_path`
pub fn list_pdfs(
    state_manager: &AppStateManager,
    source_path: &str,
    recursive: bool,
) -> Result<ListPdfsResponse> {
    if source_path.trim().is_empty() {
        return Err(CompressorError::invalid_path("", "Source path is required"));
    }

    let dir = clean_path_input(source_path);
    state_manager.debug_logger.debug(format!(
        "Listing PDFs in {} (recursive: {})",
        dir.display(),
        recursive
    ));

    let report = state_manager.scanner.scan(&dir, recursive)?;
    Ok(ListPdfsResponse::from(report))
}

/// Open a folder in the platform's file manager
pub fn reveal_folder(state_manager: &AppStateManager, folder_path: &str) -> Result<()> {
    let folder = clean_path_input(folder_path);

    if folder.as_os_str().is_empty() || !folder.is_dir() {
        return Err(CompressorError::invalid_path(folder, "Invalid folder path"));
    }
    state_manager.guard.check(&folder)?;

    state_manager.debug_logger.info(format!("Opening folder: {}", folder.display()));
    open::that(&folder).map_err(|e| {
        let error_msg = format!("Failed to open folder: {}", e);
        state_manager.debug_logger.error(error_msg.clone());
        CompressorError::Internal(error_msg)
    })
}
