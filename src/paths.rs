//! Path input helpers
//!
//! Normalizes user-supplied path strings, derives output file names and
//! optionally confines every accepted path to a set of allowed roots.

use crate::error::{CompressorError, Result};
use std::path::{Path, PathBuf};

const PDF_EXTENSION: &str = ".pdf";
const REDUCED_SUFFIX: &str = "_red";

/// Clean a pasted path: trim whitespace, then strip leading/trailing quote runs.
///
/// `"'/home/me/My Docs'"` becomes `/home/me/My Docs`.
pub fn clean_path_input(input: &str) -> PathBuf {
    let cleaned = input
        .trim()
        .trim_start_matches(['\'', '"'])
        .trim_end_matches(['\'', '"']);
    PathBuf::from(cleaned)
}

/// Case-insensitive check for a trailing `.pdf`
pub fn is_pdf_name(name: &str) -> bool {
    name.to_lowercase().ends_with(PDF_EXTENSION)
}

/// Same as [`is_pdf_name`] but for the final component of a path
pub fn is_pdf_path(path: &Path) -> bool {
    path.file_name()
        .map(|n| is_pdf_name(&n.to_string_lossy()))
        .unwrap_or(false)
}

/// Name of the compressed output for `file_name`.
///
/// Only a trailing `.pdf` (any case) is replaced, keeping its casing:
/// `report.pdf` -> `report_red.pdf`, `SCAN.PDF` -> `SCAN_red.PDF`.
/// Names without that extension get `_red.pdf` appended, so
/// `report.pdf.backup` -> `report.pdf.backup_red.pdf`.
pub fn output_filename(file_name: &str) -> String {
    if is_pdf_name(file_name) {
        // ".pdf" is ASCII so the split point is a char boundary
        let (stem, extension) = file_name.split_at(file_name.len() - PDF_EXTENSION.len());
        format!("{}{}{}", stem, REDUCED_SUFFIX, extension)
    } else {
        format!("{}{}{}", file_name, REDUCED_SUFFIX, PDF_EXTENSION)
    }
}

/// Confines accepted paths to a list of allowed roots.
///
/// An empty guard accepts everything.
#[derive(Debug, Clone, Default)]
pub struct PathGuard {
    allowed_roots: Vec<PathBuf>,
}

impl PathGuard {
    pub fn new(allowed_roots: Vec<PathBuf>) -> Self {
        let allowed_roots = allowed_roots
            .into_iter()
            .map(|root| root.canonicalize().unwrap_or(root))
            .collect();
        Self { allowed_roots }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.allowed_roots.is_empty()
    }

    /// Resolve symlinks and `..` in `path`, then require it to live under an allowed root
    pub fn check(&self, path: &Path) -> Result<()> {
        if self.is_unrestricted() {
            return Ok(());
        }

        let canonical = path
            .canonicalize()
            .map_err(|e| CompressorError::invalid_path(path, format!("Cannot resolve path: {}", e)))?;

        if self.allowed_roots.iter().any(|root| canonical.starts_with(root)) {
            Ok(())
        } else {
            Err(CompressorError::invalid_path(
                path,
                "Path is outside the allowed directories",
            ))
        }
    }
}
