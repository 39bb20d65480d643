//! Core types for scanning and compression.
//!
//! This module contains the data structures passed between the scanner,
//! the compression workflow and the command layer.

use serde::Serialize;
use std::path::PathBuf;

/// A PDF file found during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfFileEntry {
    /// Path relative to the scan root, always `/`-separated
    pub relative_path: String,
    pub full_path: PathBuf,
    pub file_name: String,
    /// Containing directory. Only filled in by recursive scans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

/// An entry the scanner could not access
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything a scan produced, including what it had to skip
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub root: PathBuf,
    pub recursive: bool,
    pub files: Vec<PdfFileEntry>,
    pub skipped: Vec<SkippedEntry>,
}

/// Optimization level forwarded to the compression service (1-9)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptimizeLevel(u8);

impl OptimizeLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 9;
    pub const DEFAULT: u8 = 3;

    /// Out-of-range values fall back to the default
    pub fn new(level: u8) -> Self {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Self(level)
        } else {
            Self(Self::DEFAULT)
        }
    }

    /// Parse user input; missing or unparseable values fall back to the default
    pub fn parse(input: Option<&str>) -> Self {
        input
            .and_then(|s| s.trim().parse::<u8>().ok())
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for OptimizeLevel {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Where the bytes to compress come from
#[derive(Debug, Clone)]
pub enum PdfSource {
    /// Uploaded content with no file on disk behind it
    Bytes(Vec<u8>),
    /// A file on disk; the only kind of source that can be deleted
    Path(PathBuf),
}

/// Parameters for one compress-and-save operation
#[derive(Debug, Clone)]
pub struct CompressionRequest {
    pub source: PdfSource,
    pub file_name: String,
    pub optimize_level: OptimizeLevel,
    /// Explicit destination directory. Must already exist when given.
    pub destination: Option<PathBuf>,
    pub delete_original: bool,
}

/// Outcome of a compression whose output landed on disk
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionResult {
    pub original_size: u64,
    pub compressed_size: u64,
    pub savings_percent: i64,
    pub saved_path: PathBuf,
    pub output_filename: String,
    pub original_deleted: bool,
    /// Why deletion was requested but not carried out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_skipped: Option<String>,
}

/// Compressed output that could not be written to its destination
#[derive(Debug, Clone, PartialEq)]
pub struct UnsavedOutput {
    pub bytes: Vec<u8>,
    pub output_filename: String,
    pub original_size: u64,
    pub compressed_size: u64,
    pub savings_percent: i64,
    pub reason: String,
}

/// Result of the workflow: either saved to disk, or handed back to the caller
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(CompressionResult),
    Unsaved(UnsavedOutput),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }

    /// Get the result if the output was saved, None otherwise
    pub fn saved(&self) -> Option<&CompressionResult> {
        match self {
            SaveOutcome::Saved(result) => Some(result),
            SaveOutcome::Unsaved(_) => None,
        }
    }

    /// Get the in-memory output if the write failed, None otherwise
    pub fn unsaved(&self) -> Option<&UnsavedOutput> {
        match self {
            SaveOutcome::Saved(_) => None,
            SaveOutcome::Unsaved(output) => Some(output),
        }
    }
}

/// Rounded percentage saved, matching JavaScript's `Math.round`.
///
/// Returns 0 for an empty original instead of dividing by zero.
pub fn savings_percent(original_size: u64, compressed_size: u64) -> i64 {
    if original_size == 0 {
        return 0;
    }
    let ratio = (original_size as f64 - compressed_size as f64) / original_size as f64;
    (ratio * 100.0 + 0.5).floor() as i64
}
