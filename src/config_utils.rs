//! Configuration file utilities
//!
//! Provides helper functions for reading and writing the app configuration.
//! Config files are stored in the platform-specific config directory
//! under "pdf-compressor/".

use crate::error::{CompressorError, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "pdf-compressor";
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8080/api/v1/misc/compress-pdf";
pub const DEFAULT_STATUS_URL: &str = "http://localhost:8080/api/v1/info/status";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

pub const SERVICE_URL_ENV: &str = "PDF_COMPRESSOR_SERVICE_URL";
pub const STATUS_URL_ENV: &str = "PDF_COMPRESSOR_STATUS_URL";

/// Runtime configuration for the compressor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Compression endpoint that receives the multipart upload
    pub service_url: String,
    /// Lightweight endpoint used by `check-service`
    pub status_url: String,
    pub timeout_secs: u64,
    pub default_optimize_level: u8,
    /// Where uploads land when no destination is given
    pub fallback_dir: Option<PathBuf>,
    /// When non-empty, every accepted path must live under one of these
    pub allowed_roots: Vec<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            status_url: DEFAULT_STATUS_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_optimize_level: crate::types::OptimizeLevel::DEFAULT,
            fallback_dir: None,
            allowed_roots: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load config from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config: Option<AppConfig> = load_config_file(CONFIG_FILE_NAME)?;
        Ok(config.unwrap_or_default().with_env_overrides())
    }

    /// Apply `PDF_COMPRESSOR_SERVICE_URL` / `PDF_COMPRESSOR_STATUS_URL`
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(SERVICE_URL_ENV).ok(),
            std::env::var(STATUS_URL_ENV).ok(),
        )
    }

    fn with_overrides(mut self, service_url: Option<String>, status_url: Option<String>) -> Self {
        if let Some(url) = service_url.filter(|u| !u.trim().is_empty()) {
            self.service_url = url;
        }
        if let Some(url) = status_url.filter(|u| !u.trim().is_empty()) {
            self.status_url = url;
        }
        self
    }

    /// Directory used when an upload has no destination.
    ///
    /// Returns: the configured `fallback_dir`, otherwise
    ///          `<Downloads>/pdf-compressor`
    pub fn resolved_fallback_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.fallback_dir {
            return Some(dir.clone());
        }
        dirs::download_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
            .map(|downloads| downloads.join(APP_DIR_NAME))
    }
}

/// Get the app's config directory path.
///
/// Returns: `~/.config/pdf-compressor` (Linux)
///          `~/Library/Application Support/pdf-compressor` (macOS)
///          `C:\Users\<User>\AppData\Roaming\pdf-compressor` (Windows)
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| CompressorError::Config("Could not find config directory".to_string()))?;
    Ok(config_dir.join(APP_DIR_NAME))
}

/// Get the directory where log files and debug reports are written.
///
/// Returns: `~/.pdf-compressor/logs`
pub fn get_logs_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| CompressorError::Config("Could not find home directory".to_string()))?;
    Ok(home_dir.join(format!(".{}", APP_DIR_NAME)).join("logs"))
}

/// Get the full path to a config file.
pub fn config_file_path(filename: &str) -> Result<PathBuf> {
    Ok(get_config_dir()?.join(filename))
}

/// Save data to a config file as JSON.
///
/// # Returns
/// The path where the file was saved
pub fn save_config_file<T: Serialize>(filename: &str, data: &T) -> Result<PathBuf> {
    let config_file = config_file_path(filename)?;
    save_config_to_path(&config_file, data)?;
    Ok(config_file)
}

/// Load data from a config file.
///
/// # Returns
/// * `Ok(Some(data))` if file exists and was parsed successfully
/// * `Ok(None)` if file doesn't exist
/// * `Err(...)` if file exists but couldn't be read/parsed
pub fn load_config_file<T: DeserializeOwned>(filename: &str) -> Result<Option<T>> {
    load_config_from_path(&config_file_path(filename)?)
}

/// Write JSON to an explicit path, creating parent directories
pub fn save_config_to_path<T: Serialize>(config_file: &Path, data: &T) -> Result<()> {
    if let Some(parent) = config_file.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CompressorError::Config(format!("Failed to create config directory: {}", e)))?;
    }

    let json = serde_json::to_string_pretty(data)
        .map_err(|e| CompressorError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(config_file, json)
        .map_err(|e| CompressorError::Config(format!("Failed to write config file: {}", e)))
}

/// Read JSON from an explicit path; a missing file is `Ok(None)`
pub fn load_config_from_path<T: DeserializeOwned>(config_file: &Path) -> Result<Option<T>> {
    if !config_file.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(config_file)
        .map_err(|e| CompressorError::Config(format!("Failed to read config file: {}", e)))?;

    let data = serde_json::from_str(&contents)
        .map_err(|e| CompressorError::Config(format!("Failed to parse config file: {}", e)))?;

    Ok(Some(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_config_dir_returns_path() {
        let result = get_config_dir();
        if let Ok(path) = result {
            assert!(path.to_string_lossy().contains(APP_DIR_NAME));
        }
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.service_url, DEFAULT_SERVICE_URL);
        assert_eq!(config.default_optimize_level, 3);
        assert!(config.allowed_roots.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip_path() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("nested").join(CONFIG_FILE_NAME);
        let config = AppConfig {
            service_url: "http://example.com/compress".to_string(),
            fallback_dir: Some(PathBuf::from("/tmp/out")),
            ..AppConfig::default()
        };

        save_config_to_path(&file, &config).unwrap();
        let loaded: AppConfig = load_config_from_path(&file).unwrap().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let loaded: Option<AppConfig> =
            load_config_from_path(&temp_dir.path().join("missing.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&file, r#"{"timeout_secs": 10}"#).unwrap();

        let loaded: AppConfig = load_config_from_path(&file).unwrap().unwrap();
        assert_eq!(loaded.timeout_secs, 10);
        assert_eq!(loaded.service_url, DEFAULT_SERVICE_URL);
    }

    #[test]
    fn test_corrupt_config_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&file, "{not json").unwrap();

        let result: Result<Option<AppConfig>> = load_config_from_path(&file);
        assert!(matches!(result, Err(CompressorError::Config(_))));
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let config = AppConfig::default().with_overrides(
            Some("http://other/compress".to_string()),
            Some("  ".to_string()),
        );
        assert_eq!(config.service_url, "http://other/compress");
        assert_eq!(config.status_url, DEFAULT_STATUS_URL);
    }

    #[test]
    fn test_explicit_fallback_dir_wins() {
        let config = AppConfig {
            fallback_dir: Some(PathBuf::from("/srv/pdfs")),
            ..AppConfig::default()
        };
        assert_eq!(config.resolved_fallback_dir(), Some(PathBuf::from("/srv/pdfs")));
    }
}
