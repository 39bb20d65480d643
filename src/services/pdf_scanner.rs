//! PDF discovery service
//!
//! Lists the PDF files under a root directory, either the immediate
//! children only or the whole subtree. Entries that cannot be accessed are
//! skipped and reported in the [`ScanReport`] instead of failing the scan.

use crate::debug_logger::DebugLogger;
use crate::error::{CompressorError, Result};
use crate::paths::{is_pdf_name, PathGuard};
use crate::types::{PdfFileEntry, ScanReport, SkippedEntry};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Service for finding PDFs on disk. Never modifies the filesystem.
pub struct PdfScanner {
    guard: PathGuard,
    logger: Arc<DebugLogger>,
}

impl PdfScanner {
    pub fn new(guard: PathGuard, logger: Arc<DebugLogger>) -> Self {
        Self { guard, logger }
    }

    /// Scan `root` for `.pdf` files (case-insensitive).
    ///
    /// Results are sorted by relative path. Fails with `InvalidPath` when the
    /// root is missing, is not a directory, or cannot be read.
    pub fn scan(&self, root: &Path, recursive: bool) -> Result<ScanReport> {
        self.validate_root(root)?;

        let mut skipped = Vec::new();
        let mut files = if recursive {
            self.scan_recursive(root, &mut skipped)?
        } else {
            self.scan_shallow(root, &mut skipped)?
        };

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        self.logger.info(format!(
            "Listed {} PDF file(s) in {} (recursive: {}, skipped: {})",
            files.len(),
            root.display(),
            recursive,
            skipped.len()
        ));

        Ok(ScanReport {
            root: root.to_path_buf(),
            recursive,
            files,
            skipped,
        })
    }

    fn validate_root(&self, root: &Path) -> Result<()> {
        let metadata = fs::metadata(root).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                CompressorError::invalid_path(root, "Directory does not exist")
            } else {
                CompressorError::invalid_path(root, format!("Cannot access directory: {}", e))
            }
        })?;

        if !metadata.is_dir() {
            return Err(CompressorError::invalid_path(root, "Path is not a directory"));
        }

        self.guard.check(root)
    }

    /// Depth-first walk of the whole subtree.
    ///
    /// Symlinks are followed. Link cycles, dangling links and links leading
    /// outside the allowed roots are reported as skipped.
    fn scan_recursive(&self, root: &Path, skipped: &mut Vec<SkippedEntry>) -> Result<Vec<PdfFileEntry>> {
        let mut files = Vec::new();
        let mut walker = WalkDir::new(root).follow_links(true).into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(CompressorError::invalid_path(
                        root,
                        format!("Cannot read directory: {}", e),
                    ));
                }
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                    let reason = match e.loop_ancestor() {
                        Some(ancestor) => format!("Symlink loop back to {}", ancestor.display()),
                        None => e.to_string(),
                    };
                    self.skip(skipped, path, reason);
                    continue;
                }
            };

            if entry.path_is_symlink() {
                if let Err(e) = self.guard.check(entry.path()) {
                    if entry.file_type().is_dir() {
                        walker.skip_current_dir();
                    }
                    self.skip(skipped, entry.path().to_path_buf(), e.to_string());
                    continue;
                }
            }

            let file_name = entry.file_name().to_string_lossy().to_string();
            if !entry.file_type().is_file() || !is_pdf_name(&file_name) {
                continue;
            }

            let full_path = entry.path().to_path_buf();
            let Ok(relative) = full_path.strip_prefix(root) else {
                continue;
            };

            files.push(PdfFileEntry {
                relative_path: to_slash_path(relative),
                directory: full_path.parent().map(Path::to_path_buf),
                full_path,
                file_name,
            });
        }

        Ok(files)
    }

    /// Immediate children of `root` only
    fn scan_shallow(&self, root: &Path, skipped: &mut Vec<SkippedEntry>) -> Result<Vec<PdfFileEntry>> {
        let entries = fs::read_dir(root).map_err(|e| {
            CompressorError::invalid_path(root, format!("Cannot read directory: {}", e))
        })?;

        let mut files = Vec::new();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.skip(skipped, root.to_path_buf(), e.to_string());
                    continue;
                }
            };

            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().to_string();
            if !is_pdf_name(&file_name) {
                continue;
            }

            match fs::metadata(&path) {
                Ok(metadata) if metadata.is_file() => files.push(PdfFileEntry {
                    relative_path: file_name.clone(),
                    full_path: path,
                    file_name,
                    directory: None,
                }),
                Ok(_) => {}
                Err(e) => self.skip(skipped, path, e.to_string()),
            }
        }

        Ok(files)
    }

    fn skip(&self, skipped: &mut Vec<SkippedEntry>, path: PathBuf, reason: String) {
        self.logger.warn(format!("Cannot access: {} - {}", path.display(), reason));
        skipped.push(SkippedEntry { path, reason });
    }
}

/// Join path components with `/` regardless of platform
fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scanner() -> PdfScanner {
        PdfScanner::new(PathGuard::default(), Arc::new(DebugLogger::new()))
    }

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"%PDF-1.4").unwrap();
    }

    fn nested_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("top.pdf"));
        touch(&root.join("UPPER.PDF"));
        touch(&root.join("notes.txt"));
        touch(&root.join("a").join("mid.pdf"));
        touch(&root.join("a").join("b").join("c").join("deep.Pdf"));
        touch(&root.join("a").join("b").join("readme.md"));
        temp_dir
    }

    fn relative_paths(report: &ScanReport) -> Vec<String> {
        report.files.iter().map(|f| f.relative_path.clone()).collect()
    }

    #[test]
    fn test_recursive_finds_all_depths() {
        let temp_dir = nested_tree();
        let report = scanner().scan(temp_dir.path(), true).unwrap();

        assert_eq!(
            relative_paths(&report),
            vec!["UPPER.PDF", "a/b/c/deep.Pdf", "a/mid.pdf", "top.pdf"]
        );
        assert!(report.skipped.is_empty());
        assert!(report.recursive);
    }

    #[test]
    fn test_recursive_entry_fields() {
        let temp_dir = nested_tree();
        let report = scanner().scan(temp_dir.path(), true).unwrap();

        let deep = report.files.iter().find(|f| f.file_name == "deep.Pdf").unwrap();
        let expected_dir = temp_dir.path().join("a").join("b").join("c");
        assert_eq!(deep.full_path, expected_dir.join("deep.Pdf"));
        assert_eq!(deep.directory.as_deref(), Some(expected_dir.as_path()));
    }

    #[test]
    fn test_shallow_only_lists_immediate_children() {
        let temp_dir = nested_tree();
        let report = scanner().scan(temp_dir.path(), false).unwrap();

        assert_eq!(relative_paths(&report), vec!["UPPER.PDF", "top.pdf"]);
        for entry in &report.files {
            assert_eq!(entry.relative_path, entry.file_name);
            assert!(entry.directory.is_none());
            assert_eq!(entry.full_path, temp_dir.path().join(&entry.file_name));
        }
    }

    #[test]
    fn test_shallow_ignores_directory_named_like_pdf() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("folder.pdf")).unwrap();
        touch(&temp_dir.path().join("real.pdf"));

        let report = scanner().scan(temp_dir.path(), false).unwrap();
        assert_eq!(relative_paths(&report), vec!["real.pdf"]);
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let report = scanner().scan(temp_dir.path(), true).unwrap();
        assert!(report.files.is_empty());
    }

    #[test]
    fn test_missing_root_is_invalid_path() {
        let temp_dir = TempDir::new().unwrap();
        let err = scanner().scan(&temp_dir.path().join("nope"), true).unwrap_err();
        assert_eq!(err.code(), "INVALID_PATH");
    }

    #[test]
    fn test_file_root_is_invalid_path() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.pdf");
        touch(&file);

        for recursive in [true, false] {
            let err = scanner().scan(&file, recursive).unwrap_err();
            assert!(matches!(err, CompressorError::InvalidPath { .. }));
        }
    }

    #[test]
    fn test_guard_rejects_root_outside_allowed() {
        let allowed = TempDir::new().unwrap();
        let other = nested_tree();
        let scanner = PdfScanner::new(
            PathGuard::new(vec![allowed.path().to_path_buf()]),
            Arc::new(DebugLogger::new()),
        );

        assert!(scanner.scan(other.path(), true).is_err());
        assert!(scanner.scan(allowed.path(), true).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_is_skipped_not_fatal() {
        let temp_dir = nested_tree();
        std::os::unix::fs::symlink(
            temp_dir.path().join("missing-target.pdf"),
            temp_dir.path().join("a").join("dangling.pdf"),
        )
        .unwrap();

        let logger = Arc::new(DebugLogger::new());
        let scanner = PdfScanner::new(PathGuard::default(), logger.clone());
        let report = scanner.scan(temp_dir.path(), true).unwrap();

        assert_eq!(report.files.len(), 4);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].path.ends_with("dangling.pdf"));
        assert!(logger.entries().iter().any(|e| e.message.contains("Cannot access")));

        let shallow = scanner.scan(&temp_dir.path().join("a"), false).unwrap();
        assert_eq!(shallow.files.len(), 1);
        assert_eq!(shallow.skipped.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_pdf_is_listed() {
        let temp_dir = nested_tree();
        std::os::unix::fs::symlink(
            temp_dir.path().join("top.pdf"),
            temp_dir.path().join("alias.pdf"),
        )
        .unwrap();

        let report = scanner().scan(temp_dir.path(), true).unwrap();
        assert!(report.files.iter().any(|f| f.relative_path == "alias.pdf"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_does_not_abort_scan() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = nested_tree();
        let locked = temp_dir.path().join("locked");
        touch(&locked.join("hidden.pdf"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still read the directory; the permission bits
        // only take effect for everyone else.
        let enforced = fs::read_dir(&locked).is_err();

        let report = scanner().scan(temp_dir.path(), true);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let report = report.unwrap();

        let paths = relative_paths(&report);
        assert!(paths.contains(&"top.pdf".to_string()));
        assert!(paths.contains(&"a/b/c/deep.Pdf".to_string()));
        if enforced {
            assert!(!paths.contains(&"locked/hidden.pdf".to_string()));
            assert_eq!(report.skipped.len(), 1);
            assert!(report.skipped[0].path.ends_with("locked"));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_subdirectory_is_walked() {
        let temp_dir = nested_tree();
        let other = TempDir::new().unwrap();
        touch(&other.path().join("linked.pdf"));
        std::os::unix::fs::symlink(other.path(), temp_dir.path().join("docs")).unwrap();

        let report = scanner().scan(temp_dir.path(), true).unwrap();

        let linked = report
            .files
            .iter()
            .find(|f| f.relative_path == "docs/linked.pdf")
            .unwrap();
        assert_eq!(linked.full_path, temp_dir.path().join("docs").join("linked.pdf"));
        assert_eq!(linked.directory.as_deref(), Some(temp_dir.path().join("docs").as_path()));
        assert!(report.skipped.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_is_skipped() {
        let temp_dir = nested_tree();
        std::os::unix::fs::symlink(temp_dir.path(), temp_dir.path().join("a").join("back")).unwrap();

        let report = scanner().scan(temp_dir.path(), true).unwrap();

        assert_eq!(
            relative_paths(&report),
            vec!["UPPER.PDF", "a/b/c/deep.Pdf", "a/mid.pdf", "top.pdf"]
        );
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].path.ends_with("back"));
        assert!(report.skipped[0].reason.contains("loop"));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_directory_link_is_reported() {
        let temp_dir = nested_tree();
        std::os::unix::fs::symlink(
            temp_dir.path().join("removed-folder"),
            temp_dir.path().join("a").join("archive"),
        )
        .unwrap();

        let logger = Arc::new(DebugLogger::new());
        let scanner = PdfScanner::new(PathGuard::default(), logger.clone());
        let report = scanner.scan(temp_dir.path(), true).unwrap();

        assert_eq!(report.files.len(), 4);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].path.ends_with("archive"));
        assert!(!report.skipped[0].reason.is_empty());
        assert_eq!(
            logger.entries().iter().filter(|e| e.message.contains("Cannot access")).count(),
            1
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_guard_skips_link_leaving_allowed_root() {
        let allowed = nested_tree();
        let outside = TempDir::new().unwrap();
        touch(&outside.path().join("private.pdf"));
        std::os::unix::fs::symlink(outside.path(), allowed.path().join("escape")).unwrap();

        let scanner = PdfScanner::new(
            PathGuard::new(vec![allowed.path().to_path_buf()]),
            Arc::new(DebugLogger::new()),
        );
        let report = scanner.scan(allowed.path(), true).unwrap();

        assert!(!relative_paths(&report).iter().any(|p| p.starts_with("escape")));
        assert_eq!(report.files.len(), 4);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].path.ends_with("escape"));
    }

    #[test]
    fn test_to_slash_path() {
        let path = Path::new("a").join("b").join("c.pdf");
        assert_eq!(to_slash_path(&path), "a/b/c.pdf");
    }
}
