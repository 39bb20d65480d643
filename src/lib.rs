//! Find PDF files on disk, compress them through an external
//! Stirling-PDF compatible service and land the results safely.
//!
//! The two core pieces are [`services::PdfScanner`], which lists PDFs under a
//! directory, and [`services::CompressWorkflow`], which runs
//! read → compress → write → verify-and-delete for a single file.

pub mod api_contracts;
pub mod cli;
pub mod commands;
pub mod compression_client;
pub mod config_utils;
pub mod debug_logger;
pub mod error;
pub mod paths;
pub mod services;
pub mod state;
pub mod types;

#[cfg(test)]
mod test_harness;

pub use compression_client::{PdfCompressor, StirlingClient};
pub use config_utils::AppConfig;
pub use error::{CompressorError, Result};
pub use services::{CompressWorkflow, PdfScanner};
pub use types::{
    CompressionRequest, CompressionResult, OptimizeLevel, PdfFileEntry, PdfSource, SaveOutcome,
    ScanReport,
};
