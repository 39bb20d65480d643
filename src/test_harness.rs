//! Test harness for a mock compression service
//!
//! Runs the compression client and workflow against a mockito server
//! instead of a real Stirling-PDF instance.

use mockito::{Matcher, Mock, Server, ServerGuard};

pub const COMPRESS_PATH: &str = "/api/v1/misc/compress-pdf";
pub const STATUS_PATH: &str = "/api/v1/info/status";

/// A test harness that sets up a mock compression service
pub struct TestHarness {
    pub server: ServerGuard,
}

impl TestHarness {
    /// Create a new test harness with a mock server
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        Self { server }
    }

    pub fn compress_url(&self) -> String {
        format!("{}{}", self.server.url(), COMPRESS_PATH)
    }

    pub fn status_url(&self) -> String {
        format!("{}{}", self.server.url(), STATUS_PATH)
    }

    /// Mock a successful compression returning `body`
    pub fn mock_compress_success(&mut self, body: &[u8]) -> Mock {
        self.server.mock("POST", COMPRESS_PATH)
            .match_header("content-type", Matcher::Regex("multipart/form-data".to_string()))
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body(body)
            .create()
    }

    /// Mock a compression that only matches when both multipart fields are present
    pub fn mock_compress_expecting_fields(&mut self, file_name: &str, level: u8, body: &[u8]) -> Mock {
        self.server.mock("POST", COMPRESS_PATH)
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(format!(r#"name="fileInput"; filename="{}""#, regex::escape(file_name))),
                Matcher::Regex(format!("name=\"optimizeLevel\"\r\n\r\n{}\r\n", level)),
            ]))
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body(body)
            .create()
    }

    /// Mock a failing compression
    pub fn mock_compress_failure(&mut self, status: usize, error_text: &str) -> Mock {
        self.server.mock("POST", COMPRESS_PATH)
            .with_status(status)
            .with_header("content-type", "text/plain")
            .with_body(error_text)
            .create()
    }

    /// Mock a compression endpoint that must never be called
    pub fn mock_compress_never_called(&mut self) -> Mock {
        self.server.mock("POST", COMPRESS_PATH)
            .with_status(200)
            .expect(0)
            .create()
    }

    /// Mock the status endpoint
    pub fn mock_status(&mut self, status: usize, body: &str) -> Mock {
        self.server.mock("GET", STATUS_PATH)
            .with_status(status)
            .with_body(body)
            .create()
    }
}

