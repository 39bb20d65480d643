//! Self-checks for the environment the compressor runs in.

use crate::debug_logger::DebugLogger;
use crate::error::{CompressorError, Result};
use crate::paths::PathGuard;
use crate::services::compress_workflow::write_atomic;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Outcome of a probe. Probes report failure here rather than through `Err`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub success: bool,
    pub message: String,
}

impl ProbeReport {
    fn passed(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

pub struct Diagnostics {
    guard: PathGuard,
    logger: Arc<DebugLogger>,
}

impl Diagnostics {
    pub fn new(guard: PathGuard, logger: Arc<DebugLogger>) -> Self {
        Self { guard, logger }
    }

    /// Create, delete and re-check a scratch file in `dir` (default: the system temp dir)
    pub fn deletion_probe(&self, dir: Option<&Path>) -> ProbeReport {
        if let Some(dir) = dir {
            if let Err(e) = self.guard.check(dir) {
                self.logger.warn(e.to_string());
                return ProbeReport::failed(e.to_string());
            }
        }
        let dir = dir.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir);
        let probe_file = dir.join(format!(
            "pdf-compressor-delete-probe-{}.txt",
            Utc::now().timestamp_millis()
        ));

        if let Err(e) = fs::write(&probe_file, b"deletion probe") {
            self.logger.error(format!("Could not create test file {}: {}", probe_file.display(), e));
            return ProbeReport::failed(format!("Could not create test file: {}", e));
        }
        self.logger.debug(format!("Test file created: {}", probe_file.display()));

        if let Err(e) = fs::remove_file(&probe_file) {
            self.logger.error(format!("File deletion test failed: {}", e));
            return ProbeReport::failed(format!("File deletion test failed: {}", e));
        }

        if probe_file.exists() {
            return ProbeReport::failed("File deletion failed - file still exists after delete");
        }

        self.logger.info(format!("Deletion probe passed in {}", dir.display()));
        ProbeReport::passed(format!("File deletion test passed in {}", dir.display()))
    }

    /// Write `bytes` uncompressed as `test_<millis>_<file_name>` into an existing directory
    pub fn save_probe(&self, dir: &Path, bytes: &[u8], file_name: &str) -> Result<PathBuf> {
        if !dir.exists() {
            return Err(CompressorError::invalid_destination(dir, "Path does not exist"));
        }
        if !dir.is_dir() {
            return Err(CompressorError::invalid_destination(dir, "Path is not a directory"));
        }
        self.guard.check(dir)?;

        let test_name = format!("test_{}_{}", Utc::now().timestamp_millis(), file_name);
        let saved_path = dir.join(test_name);
        write_atomic(&saved_path, bytes)?;

        self.logger.info(format!("Test file saved to: {}", saved_path.display()));
        Ok(saved_path)
    }
}
