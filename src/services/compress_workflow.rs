//! Compress-and-save workflow
//!
//! Reads a PDF, sends it to the compression service, writes the result to a
//! destination directory and, when asked, removes the original. The original
//! is only ever removed after the compressed file has been written and
//! re-checked on disk.

use crate::compression_client::PdfCompressor;
use crate::debug_logger::DebugLogger;
use crate::error::{CompressorError, Result};
use crate::paths::{is_pdf_path, output_filename, PathGuard};
use crate::types::{
    savings_percent, CompressionRequest, CompressionResult, OptimizeLevel, PdfSource, SaveOutcome,
    UnsavedOutput,
};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Service that runs one compression end to end
pub struct CompressWorkflow {
    compressor: Arc<dyn PdfCompressor>,
    /// Used when a request has no explicit destination
    fallback_dir: Option<PathBuf>,
    guard: PathGuard,
    logger: Arc<DebugLogger>,
}

impl CompressWorkflow {
    pub fn new(
        compressor: Arc<dyn PdfCompressor>,
        fallback_dir: Option<PathBuf>,
        guard: PathGuard,
        logger: Arc<DebugLogger>,
    ) -> Self {
        Self {
            compressor,
            fallback_dir,
            guard,
            logger,
        }
    }

    /// Compress uploaded bytes. Without a destination the fallback directory is used.
    pub async fn compress_upload(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        level: OptimizeLevel,
        destination: Option<PathBuf>,
    ) -> Result<SaveOutcome> {
        self.compress_and_save(CompressionRequest {
            source: PdfSource::Bytes(bytes),
            file_name: file_name.to_string(),
            optimize_level: level,
            destination,
            delete_original: false,
        })
        .await
    }

    /// Compress `source_dir/file_name` into `destination`
    pub async fn compress_from_dir(
        &self,
        source_dir: &Path,
        file_name: &str,
        level: OptimizeLevel,
        destination: &Path,
        delete_original: bool,
    ) -> Result<SaveOutcome> {
        self.compress_and_save(CompressionRequest {
            source: PdfSource::Path(source_dir.join(file_name)),
            file_name: file_name.to_string(),
            optimize_level: level,
            destination: Some(destination.to_path_buf()),
            delete_original,
        })
        .await
    }

    /// Compress a file and save the result next to it
    pub async fn compress_in_place(
        &self,
        full_path: &Path,
        file_name: Option<&str>,
        level: OptimizeLevel,
        delete_original: bool,
    ) -> Result<SaveOutcome> {
        let file_name = match file_name {
            Some(name) => name.to_string(),
            None => full_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .ok_or_else(|| CompressorError::SourceNotFound {
                    path: full_path.to_path_buf(),
                })?,
        };

        let directory = match full_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        self.compress_and_save(CompressionRequest {
            source: PdfSource::Path(full_path.to_path_buf()),
            file_name,
            optimize_level: level,
            destination: Some(directory),
            delete_original,
        })
        .await
    }

    /// Run the full read → compress → write → (verify and delete) sequence.
    ///
    /// Everything up to the service call is validated first, so a failure
    /// there leaves the filesystem untouched. A failed write returns
    /// `SaveOutcome::Unsaved` carrying the compressed bytes.
    pub async fn compress_and_save(&self, request: CompressionRequest) -> Result<SaveOutcome> {
        let CompressionRequest {
            source,
            file_name,
            optimize_level,
            destination,
            delete_original,
        } = request;

        // Step 1: Source bytes
        let (file_bytes, source_path) = match source {
            PdfSource::Bytes(bytes) => (bytes, None),
            PdfSource::Path(path) => {
                let bytes = self.read_source(&path)?;
                (bytes, Some(path))
            }
        };
        let original_size = file_bytes.len() as u64;

        // Step 2: Destination
        let destination = self.resolve_destination(destination)?;

        self.logger.info(format!(
            "Processing {} ({} bytes, level {}) -> {}",
            file_name,
            original_size,
            optimize_level.value(),
            destination.display()
        ));

        // Step 3: Compression service
        let compressed = self
            .compressor
            .compress(file_bytes, &file_name, optimize_level)
            .await?;
        let compressed_size = compressed.len() as u64;
        let savings = savings_percent(original_size, compressed_size);

        self.logger.info(format!(
            "Compression complete: {} -> {} bytes ({}% saved)",
            original_size, compressed_size, savings
        ));

        // Step 4 + 5: Output name and write
        let output_filename = output_filename(&file_name);
        let saved_path = destination.join(&output_filename);

        if let Err(e) = write_atomic(&saved_path, &compressed) {
            self.logger.error(format!("Error saving file: {}", e));
            return Ok(SaveOutcome::Unsaved(UnsavedOutput {
                bytes: compressed,
                output_filename,
                original_size,
                compressed_size,
                savings_percent: savings,
                reason: e.to_string(),
            }));
        }
        self.logger.info(format!("File saved to: {}", saved_path.display()));

        // Step 6: Deletion gate
        let (original_deleted, deletion_skipped) = if delete_original {
            match source_path {
                Some(ref source) => match self.delete_source_if_safe(source, &saved_path) {
                    Ok(()) => (true, None),
                    Err(reason) => (false, Some(reason)),
                },
                None => {
                    let reason = "No source file on disk to delete".to_string();
                    self.logger.warn(format!("Skipped deletion - {}", reason));
                    (false, Some(reason))
                }
            }
        } else {
            (false, None)
        };

        Ok(SaveOutcome::Saved(CompressionResult {
            original_size,
            compressed_size,
            savings_percent: savings,
            saved_path,
            output_filename,
            original_deleted,
            deletion_skipped,
        }))
    }

    /// Read a source PDF from disk, enforcing the allowed roots
    pub fn read_source(&self, path: &Path) -> Result<Vec<u8>> {
        if !path.is_file() {
            return Err(CompressorError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
        self.guard.check(path)?;

        fs::read(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                CompressorError::SourceNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                CompressorError::invalid_path(path, format!("Cannot read file: {}", e))
            }
        })
    }

    /// An explicit destination must already be a directory; the fallback is created on demand
    fn resolve_destination(&self, destination: Option<PathBuf>) -> Result<PathBuf> {
        match destination {
            Some(dir) => {
                if !dir.exists() {
                    return Err(CompressorError::invalid_destination(
                        &dir,
                        "Destination path does not exist",
                    ));
                }
                if !dir.is_dir() {
                    return Err(CompressorError::invalid_destination(
                        &dir,
                        "Destination path is not a directory",
                    ));
                }
                self.guard.check(&dir)?;
                Ok(dir)
            }
            None => {
                let dir = self.fallback_dir.clone().ok_or_else(|| {
                    CompressorError::invalid_destination(
                        PathBuf::new(),
                        "No destination given and no fallback directory available",
                    )
                })?;
                self.logger.warn(format!(
                    "No destination path specified, using fallback: {}",
                    dir.display()
                ));
                fs::create_dir_all(&dir).map_err(|e| {
                    CompressorError::invalid_destination(
                        &dir,
                        format!("Failed to create fallback directory: {}", e),
                    )
                })?;
                Ok(dir)
            }
        }
    }

    /// Delete `source` only if the output is on disk and non-empty and the
    /// source is still an existing PDF distinct from the output.
    fn delete_source_if_safe(&self, source: &Path, saved_path: &Path) -> std::result::Result<(), String> {
        let output_ok = fs::metadata(saved_path).map(|m| m.len() > 0).unwrap_or(false);
        if !output_ok {
            let reason = format!("Compressed file validation failed: {}", saved_path.display());
            self.logger.error(format!("Skipped deletion - {}", reason));
            return Err(reason);
        }

        if !is_pdf_path(source) || !source.exists() {
            let reason = format!("Invalid source file: {}", source.display());
            self.logger.warn(format!("Skipped deletion - {}", reason));
            return Err(reason);
        }

        if let (Ok(a), Ok(b)) = (source.canonicalize(), saved_path.canonicalize()) {
            if a == b {
                let reason = "Source and output are the same file".to_string();
                self.logger.warn(format!("Skipped deletion - {}", reason));
                return Err(reason);
            }
        }

        match fs::remove_file(source) {
            Ok(()) => {
                self.logger.info(format!("Original file deleted: {}", source.display()));
                Ok(())
            }
            Err(e) => {
                let reason = format!("Error deleting original file: {}", e);
                self.logger.error(reason.clone());
                Err(reason)
            }
        }
    }
}

/// Write `bytes` to `path` via a synced temp file and rename, replacing any existing file
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output.pdf".to_string());
    let tmp_file = path.with_file_name(format!(".{}.tmp", file_name));

    let write_failure = |source: io::Error| CompressorError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let result = (|| -> io::Result<()> {
        let mut tmp = fs::File::create(&tmp_file)?;
        tmp.write_all(bytes)?;
        tmp.sync_all()?;
        drop(tmp);
        fs::rename(&tmp_file, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_file); // best-effort cleanup of orphaned tmp
        return Err(write_failure(e));
    }
    Ok(())
}
