use clap::Parser;
use pdf_compressor_lib::cli::{self, Cli};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    cli::run(Cli::parse()).await
}
