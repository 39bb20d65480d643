//! Application state manager holding the shared services.

use crate::compression_client::StirlingClient;
use crate::config_utils::AppConfig;
use crate::debug_logger::DebugLogger;
use crate::paths::PathGuard;
use crate::services::{CompressWorkflow, Diagnostics, PdfScanner};
use std::sync::Arc;

/// Wires configuration, logging and services together for the commands
pub struct AppStateManager {
    pub config: AppConfig,
    /// API client for the compression service
    pub client: Arc<StirlingClient>,
    pub scanner: PdfScanner,
    pub workflow: CompressWorkflow,
    pub diagnostics: Diagnostics,
    /// Allowed roots for every path taken from the user
    pub guard: PathGuard,
    /// Debug logger for capturing application events
    pub debug_logger: Arc<DebugLogger>,
}

impl AppStateManager {
    pub fn new(config: AppConfig) -> Self {
        Self::with_logger(config, Arc::new(DebugLogger::new()))
    }

    pub fn with_logger(config: AppConfig, debug_logger: Arc<DebugLogger>) -> Self {
        let guard = PathGuard::new(config.allowed_roots.clone());
        let client = Arc::new(StirlingClient::from_config(&config, Some(debug_logger.clone())));

        let workflow = CompressWorkflow::new(
            client.clone(),
            config.resolved_fallback_dir(),
            guard.clone(),
            debug_logger.clone(),
        );

        Self {
            scanner: PdfScanner::new(guard.clone(), debug_logger.clone()),
            diagnostics: Diagnostics::new(guard.clone(), debug_logger.clone()),
            guard,
            workflow,
            client,
            config,
            debug_logger,
        }
    }
}
