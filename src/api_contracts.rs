//! Response types printed by the CLI in `--json` mode.
//!
//! Field names follow the JSON the web front end already understands
//! (`savedPath`, `originalDeleted`, ...), so scripts written against the old
//! proxy server keep working.

use crate::error::CompressorError;
use crate::types::{CompressionResult, PdfFileEntry, ScanReport, SkippedEntry};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// =============================================================================
// Health
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

// =============================================================================
// List PDFs
// =============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListPdfsResponse {
    pub success: bool,
    pub directory: PathBuf,
    pub recursive: bool,
    pub files: Vec<PdfFileEntry>,
    pub skipped: Vec<SkippedEntry>,
}

impl From<ScanReport> for ListPdfsResponse {
    fn from(report: ScanReport) -> Self {
        Self {
            success: true,
            directory: report.root,
            recursive: report.recursive,
            files: report.files,
            skipped: report.skipped,
        }
    }
}

// =============================================================================
// Compress
// =============================================================================

/// Output saved to disk
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompressResponse {
    pub success: bool,
    pub message: String,
    pub original_size: u64,
    pub compressed_size: u64,
    /// Percent saved
    pub savings: i64,
    pub saved_path: PathBuf,
    pub filename: String,
    pub original_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_skipped: Option<String>,
}

impl From<CompressionResult> for CompressResponse {
    fn from(result: CompressionResult) -> Self {
        let message = if result.original_deleted {
            "File compressed and original deleted"
        } else {
            "File compressed and saved successfully"
        };
        Self {
            success: true,
            message: message.to_string(),
            original_size: result.original_size,
            compressed_size: result.compressed_size,
            savings: result.savings_percent,
            saved_path: result.saved_path,
            filename: result.output_filename,
            original_deleted: result.original_deleted,
            deletion_skipped: result.deletion_skipped,
        }
    }
}

/// Compressed output that could not be saved; the PDF itself goes to stdout
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnsavedResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub original_size: u64,
    pub compressed_size: u64,
    pub savings: i64,
}

// =============================================================================
// Diagnostics
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaveProbeResponse {
    pub success: bool,
    pub message: String,
    pub saved_path: PathBuf,
    pub filename: String,
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Upstream body for compression service failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&CompressorError> for ErrorResponse {
    fn from(err: &CompressorError) -> Self {
        let details = match err {
            CompressorError::CompressionService { body, .. } => Some(body.clone()),
            _ => None,
        };
        Self {
            error: err.to_string(),
            code: err.code().to_string(),
            path: err.path().cloned(),
            details,
        }
    }
}
