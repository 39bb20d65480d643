//! Client for the PDF compression service
//!
//! [`PdfCompressor`] is the seam the workflow talks to; [`StirlingClient`]
//! implements it against a Stirling-PDF `compress-pdf` endpoint.

use crate::config_utils::AppConfig;
use crate::debug_logger::DebugLogger;
use crate::error::{CompressorError, Result};
use crate::types::OptimizeLevel;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Multipart field carrying the PDF
pub const FILE_FIELD: &str = "fileInput";
/// Multipart field carrying the optimization level
pub const LEVEL_FIELD: &str = "optimizeLevel";

/// Anything that can turn PDF bytes into compressed PDF bytes.
///
/// One attempt per call; implementations must not retry.
#[async_trait]
pub trait PdfCompressor: Send + Sync {
    async fn compress(
        &self,
        file_bytes: Vec<u8>,
        file_name: &str,
        level: OptimizeLevel,
    ) -> Result<Vec<u8>>;
}

/// HTTP client for a Stirling-PDF compatible compression service
pub struct StirlingClient {
    service_url: String,
    status_url: String,
    client: reqwest::Client,
    logger: Option<Arc<DebugLogger>>,
}

impl StirlingClient {
    pub fn new(service_url: String, status_url: String) -> Self {
        Self::with_logger(
            service_url,
            status_url,
            Duration::from_secs(crate::config_utils::DEFAULT_TIMEOUT_SECS),
            None,
        )
    }

    /// Create a client with an explicit timeout and optional logger
    pub fn with_logger(
        service_url: String,
        status_url: String,
        timeout: Duration,
        logger: Option<Arc<DebugLogger>>,
    ) -> Self {
        // Large scans can take minutes on the service side, so the timeout
        // is the only deadline a request has.
        let user_agent = format!("PdfCompressor/{}", env!("CARGO_PKG_VERSION"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            service_url,
            status_url,
            client,
            logger,
        }
    }

    pub fn from_config(config: &AppConfig, logger: Option<Arc<DebugLogger>>) -> Self {
        Self::with_logger(
            config.service_url.clone(),
            config.status_url.clone(),
            Duration::from_secs(config.timeout_secs),
            logger,
        )
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Ping the service status endpoint and return its body
    pub async fn check_status(&self) -> Result<String> {
        if let Some(ref logger) = self.logger {
            logger.debug(format!("Checking compression service at: {}", self.status_url));
        }

        let response = self.client
            .get(&self.status_url)
            .send()
            .await
            .map_err(|e| CompressorError::CompressionService {
                status: 0,
                body: format!("Cannot connect to compression service: {}", e),
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(CompressorError::CompressionService {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl PdfCompressor for StirlingClient {
    async fn compress(
        &self,
        file_bytes: Vec<u8>,
        file_name: &str,
        level: OptimizeLevel,
    ) -> Result<Vec<u8>> {
        if let Some(ref logger) = self.logger {
            logger.info(format!(
                "Forwarding {} ({} bytes, level {}) to {}",
                file_name,
                file_bytes.len(),
                level.value(),
                self.service_url
            ));
        }

        let part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| CompressorError::Internal(format!("Invalid multipart mime type: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .part(FILE_FIELD, part)
            .text(LEVEL_FIELD, level.value().to_string());

        let response = self.client
            .post(&self.service_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CompressorError::CompressionService {
                status: 0,
                body: format!("Network error: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            if let Some(ref logger) = self.logger {
                logger.error(format!("Compression service error {}: {}", status, error_text));
            }
            return Err(CompressorError::CompressionService {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CompressorError::CompressionService {
                status: 0,
                body: format!("Failed to read response body: {}", e),
            })?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::TestHarness;

    #[test]
    fn test_client_new() {
        let client = StirlingClient::new(
            "http://localhost:8080/api/v1/misc/compress-pdf".to_string(),
            "http://localhost:8080/api/v1/info/status".to_string(),
        );
        assert_eq!(client.service_url(), "http://localhost:8080/api/v1/misc/compress-pdf");
    }

    #[tokio::test]
    async fn test_compress_success_returns_body() {
        let mut harness = TestHarness::new().await;
        let mock = harness.mock_compress_success(b"%PDF-small");

        let client = StirlingClient::new(harness.compress_url(), harness.status_url());
        let result = client
            .compress(b"%PDF-original-content".to_vec(), "doc.pdf", OptimizeLevel::new(5))
            .await
            .unwrap();

        assert_eq!(result, b"%PDF-small");
        mock.assert();
    }

    #[tokio::test]
    async fn test_compress_sends_multipart_fields() {
        let mut harness = TestHarness::new().await;
        let mock = harness.mock_compress_expecting_fields("doc.pdf", 7, b"ok");

        let client = StirlingClient::new(harness.compress_url(), harness.status_url());
        client
            .compress(b"%PDF".to_vec(), "doc.pdf", OptimizeLevel::new(7))
            .await
            .unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn test_compress_error_surfaces_status_and_body() {
        let mut harness = TestHarness::new().await;
        let _mock = harness.mock_compress_failure(500, "engine crashed");

        let client = StirlingClient::new(harness.compress_url(), harness.status_url());
        let err = client
            .compress(b"%PDF".to_vec(), "doc.pdf", OptimizeLevel::default())
            .await
            .unwrap_err();

        match err {
            CompressorError::CompressionService { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "engine crashed");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_compress_unreachable_service() {
        // Port 9 (discard) is not expected to run an HTTP server
        let client = StirlingClient::new(
            "http://127.0.0.1:9/compress".to_string(),
            "http://127.0.0.1:9/status".to_string(),
        );
        let err = client
            .compress(b"%PDF".to_vec(), "doc.pdf", OptimizeLevel::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CompressorError::CompressionService { status: 0, .. }));
    }

    #[tokio::test]
    async fn test_check_status() {
        let mut harness = TestHarness::new().await;
        let _ok = harness.mock_status(200, r#"{"status":"UP"}"#);

        let client = StirlingClient::new(harness.compress_url(), harness.status_url());
        let body = client.check_status().await.unwrap();
        assert!(body.contains("UP"));
    }

    #[tokio::test]
    async fn test_check_status_failure() {
        let mut harness = TestHarness::new().await;
        let _down = harness.mock_status(503, "maintenance");

        let client = StirlingClient::new(harness.compress_url(), harness.status_url());
        let err = client.check_status().await.unwrap_err();
        assert!(matches!(err, CompressorError::CompressionService { status: 503, .. }));
    }
}
