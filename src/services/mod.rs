//! Service modules
//!
//! The scanner finds PDFs, the workflow compresses and lands them safely,
//! and diagnostics checks the environment both rely on.

pub mod compress_workflow;
pub mod diagnostics;
pub mod pdf_scanner;

pub use compress_workflow::CompressWorkflow;
pub use diagnostics::{Diagnostics, ProbeReport};
pub use pdf_scanner::PdfScanner;
