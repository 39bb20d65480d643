//! Version and health commands.

use crate::api_contracts::HealthResponse;
use crate::state::AppStateManager;

/// Get the current app version
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Report that the tool is up and which compression service it talks to
pub fn health(state_manager: &AppStateManager) -> HealthResponse {
    state_manager.debug_logger.debug("Health check".to_string());
    HealthResponse {
        status: "OK".to_string(),
        message: format!(
            "PDF Compressor is running (service: {})",
            state_manager.config.service_url
        ),
        version: get_version(),
    }
}
