//! Configuration commands.

use crate::config_utils::{self, AppConfig, CONFIG_FILE_NAME};
use crate::error::Result;
use std::path::PathBuf;

/// The effective configuration, serialized as JSON
pub fn show_config(config: &AppConfig) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(config)
        .map_err(|e| crate::error::CompressorError::Config(format!("Failed to serialize config: {}", e)))?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert(
            "resolved_fallback_dir".to_string(),
            serde_json::json!(config.resolved_fallback_dir()),
        );
    }
    Ok(value)
}

/// Write the default configuration unless a config file already exists
pub fn init_config(force: bool) -> Result<PathBuf> {
    let config_file = config_utils::config_file_path(CONFIG_FILE_NAME)?;
    if config_file.exists() && !force {
        tracing::info!("Config already exists at {}", config_file.display());
        return Ok(config_file);
    }
    config_utils::save_config_file(CONFIG_FILE_NAME, &AppConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_config_includes_resolved_fallback() {
        let config = AppConfig {
            fallback_dir: Some(PathBuf::from("/srv/out")),
            ..AppConfig::default()
        };
        let value = show_config(&config).unwrap();
        assert_eq!(value["resolved_fallback_dir"], "/srv/out");
        assert_eq!(value["timeout_secs"], 300);
    }
}
