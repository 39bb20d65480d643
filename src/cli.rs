//! Command-line front end.
//!
//! Parses arguments, installs logging, builds the `AppStateManager` and
//! dispatches to the command modules.

use crate::api_contracts::{ErrorResponse, UnsavedResponse};
use crate::commands::compress::CompressOutput;
use crate::commands::{compress, debug, folders, settings, version};
use crate::config_utils::{self, AppConfig};
use crate::error::{CompressorError, Result};
use crate::state::AppStateManager;
use crate::types::OptimizeLevel;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable holding the log filter (e.g. `debug`, `pdf_compressor_lib=trace`)
pub const LOG_ENV: &str = "PDF_COMPRESSOR_LOG";

/// Exit code when compression worked but the output could not be saved
const EXIT_UNSAVED: u8 = 2;

#[derive(Parser)]
#[command(
    name = "pdf-compressor",
    version,
    about = "Find PDFs and compress them through a Stirling-PDF service"
)]
pub struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Also write logs to a file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Save a JSON debug report after the command finishes
    #[arg(long, global = true)]
    debug_report: bool,

    /// Override the compression endpoint
    #[arg(long, global = true)]
    service_url: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the tool runs and show which service it uses
    Health,

    /// List PDF files in a directory
    List {
        path: String,

        /// Only look at the directory itself, not its subdirectories
        #[arg(long)]
        no_recursive: bool,
    },

    /// Compress a PDF and save the result next to it
    Compress {
        full_path: String,

        /// Name sent to the service and used for the output (defaults to the file's name)
        #[arg(long)]
        file_name: Option<String>,

        /// Optimization level 1-9
        #[arg(short = 'l', long)]
        level: Option<String>,

        /// Delete the original once the compressed file is verified
        #[arg(long)]
        delete_original: bool,
    },

    /// Compress SOURCE_DIR/FILE_NAME into DESTINATION
    CompressFrom {
        source_dir: String,
        file_name: String,
        destination: String,

        #[arg(short = 'l', long)]
        level: Option<String>,

        #[arg(long)]
        delete_original: bool,
    },

    /// Send a file's contents as an upload; the original is never touched
    Upload {
        file: String,

        /// Destination directory (defaults to <Downloads>/pdf-compressor)
        #[arg(short = 'd', long)]
        dest: Option<String>,

        #[arg(short = 'l', long)]
        level: Option<String>,
    },

    /// Open a folder in the system file manager
    Reveal { folder: String },

    /// Check that the compression service is reachable
    CheckService,

    /// Check that files can be deleted in a directory
    CheckDelete { dir: Option<String> },

    /// Copy a file uncompressed into a destination to test writing there
    TestSave { file: String, destination: String },

    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        #[arg(long)]
        force: bool,
    },
}

type BaseSubscriber = tracing_subscriber::layer::Layered<EnvFilter, tracing_subscriber::Registry>;

/// Install the tracing subscriber. The returned guard must live until exit
/// so buffered file logs are flushed.
fn init_tracing(log_json: bool, log_dir: Option<&Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let mut layers: Vec<Box<dyn Layer<BaseSubscriber> + Send + Sync>> = Vec::new();

    if log_json {
        layers.push(fmt::layer().json().with_writer(std::io::stderr).boxed());
    } else {
        layers.push(fmt::layer().with_target(false).with_writer(std::io::stderr).boxed());
    }

    let guard = log_dir.map(|dir| {
        let appender = tracing_appender::rolling::never(dir, "pdf-compressor.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        layers.push(fmt::layer().with_ansi(false).with_writer(writer).boxed());
        guard
    });

    tracing_subscriber::registry().with(filter).with(layers).init();
    guard
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let config = match &cli.config {
        Some(path) => config_utils::load_config_from_path::<AppConfig>(path)?
            .ok_or_else(|| CompressorError::Config(format!("Config file not found: {}", path.display())))?
            .with_env_overrides(),
        None => AppConfig::load()?,
    };

    Ok(match &cli.service_url {
        Some(url) => AppConfig {
            service_url: url.clone(),
            ..config
        },
        None => config,
    })
}

fn optimize_level(input: Option<&str>, config: &AppConfig) -> OptimizeLevel {
    match input {
        Some(level) => OptimizeLevel::parse(Some(level)),
        None => OptimizeLevel::new(config.default_optimize_level),
    }
}

fn format_mb(bytes: u64) -> String {
    format!("{:.2}MB", bytes as f64 / 1024.0 / 1024.0)
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to serialize output: {}", e),
    }
}

/// Parse arguments and run the selected command
pub async fn run(cli: Cli) -> ExitCode {
    let _log_guard = init_tracing(cli.log_json, cli.log_dir.as_deref());

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => return report_error(&e, cli.json),
    };

    let state_manager = AppStateManager::new(config);
    let exit = match dispatch(&cli, &state_manager).await {
        Ok(code) => code,
        Err(e) => report_error(&e, cli.json),
    };

    if cli.debug_report {
        let saved = match &cli.log_dir {
            Some(dir) => state_manager.debug_logger.save_report_to_dir(dir).map_err(CompressorError::Internal),
            None => debug::export_debug_log(&state_manager),
        };
        match saved {
            Ok(path) => eprintln!("Debug report saved to {}", path.display()),
            Err(e) => eprintln!("Failed to save debug report: {}", e),
        }
    }

    exit
}

fn report_error(err: &CompressorError, json: bool) -> ExitCode {
    if json {
        print_json(&ErrorResponse::from(err));
    } else {
        eprintln!("Error: {}", err);
    }
    ExitCode::FAILURE
}

async fn dispatch(cli: &Cli, state_manager: &AppStateManager) -> Result<ExitCode> {
    let json = cli.json;
    let config = &state_manager.config;

    match &cli.command {
        Commands::Health => {
            let response = version::health(state_manager);
            if json {
                print_json(&response);
            } else {
                println!("{} - {} (v{})", response.status, response.message, response.version);
            }
        }
        Commands::List { path, no_recursive } => {
            let response = folders::list_pdfs(state_manager, path, !no_recursive)?;
            if json {
                print_json(&response);
            } else {
                for file in &response.files {
                    println!("{}", file.relative_path);
                }
                for skipped in &response.skipped {
                    eprintln!("skipped: {} ({})", skipped.path.display(), skipped.reason);
                }
                eprintln!(
                    "{} PDF file(s) in {} (recursive: {})",
                    response.files.len(),
                    response.directory.display(),
                    response.recursive
                );
            }
        }
        Commands::Compress {
            full_path,
            file_name,
            level,
            delete_original,
        } => {
            let output = compress::compress_from_full_path(
                state_manager,
                full_path,
                file_name.as_deref(),
                optimize_level(level.as_deref(), config),
                *delete_original,
            )
            .await?;
            return Ok(print_compress_output(output, json));
        }
        Commands::CompressFrom {
            source_dir,
            file_name,
            destination,
            level,
            delete_original,
        } => {
            let output = compress::compress_from_path(
                state_manager,
                source_dir,
                file_name,
                destination,
                optimize_level(level.as_deref(), config),
                *delete_original,
            )
            .await?;
            return Ok(print_compress_output(output, json));
        }
        Commands::Upload { file, dest, level } => {
            let output = compress::compress_upload(
                state_manager,
                file,
                dest.as_deref(),
                optimize_level(level.as_deref(), config),
            )
            .await?;
            return Ok(print_compress_output(output, json));
        }
        Commands::Reveal { folder } => {
            folders::reveal_folder(state_manager, folder)?;
            if !json {
                println!("Folder opened successfully");
            }
        }
        Commands::CheckService => {
            let response = debug::check_service(state_manager).await;
            return Ok(print_probe(&response, json));
        }
        Commands::CheckDelete { dir } => {
            let response = debug::check_delete(state_manager, dir.as_deref());
            return Ok(print_probe(&response, json));
        }
        Commands::TestSave { file, destination } => {
            let response = debug::test_save(state_manager, file, destination)?;
            if json {
                print_json(&response);
            } else {
                println!("{}: {}", response.message, response.saved_path.display());
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => print_json(&settings::show_config(config)?),
            ConfigAction::Init { force } => {
                let path = settings::init_config(*force)?;
                println!("{}", path.display());
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn print_probe(response: &crate::api_contracts::ProbeResponse, json: bool) -> ExitCode {
    if json {
        print_json(response);
    } else {
        println!("{}", response.message);
        if let Some(details) = &response.details {
            println!("{}", details);
        }
    }
    if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_compress_output(output: CompressOutput, json: bool) -> ExitCode {
    match output {
        CompressOutput::Saved(response) => {
            if json {
                print_json(&response);
            } else {
                println!("Saved: {}", response.saved_path.display());
                println!(
                    "Original: {}  Compressed: {}  Savings: {}%",
                    format_mb(response.original_size),
                    format_mb(response.compressed_size),
                    response.savings
                );
                if response.original_deleted {
                    println!("Original file deleted");
                } else if let Some(reason) = &response.deletion_skipped {
                    println!("Original kept: {}", reason);
                }
            }
            ExitCode::SUCCESS
        }
        CompressOutput::Unsaved(unsaved) => {
            // stdout carries the PDF itself, so the summary goes to stderr
            if json {
                let summary = UnsavedResponse {
                    success: false,
                    message: format!("Could not save output: {}", unsaved.reason),
                    filename: unsaved.output_filename.clone(),
                    original_size: unsaved.original_size,
                    compressed_size: unsaved.compressed_size,
                    savings: unsaved.savings_percent,
                };
                match serde_json::to_string(&summary) {
                    Ok(line) => eprintln!("{}", line),
                    Err(e) => eprintln!("Error: failed to serialize output: {}", e),
                }
            } else {
                eprintln!(
                    "Could not save {}: {}. Writing compressed PDF to stdout.",
                    unsaved.output_filename, unsaved.reason
                );
            }

            let mut stdout = std::io::stdout().lock();
            if let Err(e) = stdout.write_all(&unsaved.bytes).and_then(|_| stdout.flush()) {
                eprintln!("Error: failed to write compressed PDF to stdout: {}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::from(EXIT_UNSAVED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compress_from() {
        let cli = Cli::try_parse_from([
            "pdf-compressor",
            "--json",
            "compress-from",
            "/in",
            "a.pdf",
            "/out",
            "--level",
            "5",
            "--delete-original",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::CompressFrom {
                source_dir,
                file_name,
                destination,
                level,
                delete_original,
            } => {
                assert_eq!(source_dir, "/in");
                assert_eq!(file_name, "a.pdf");
                assert_eq!(destination, "/out");
                assert_eq!(level.as_deref(), Some("5"));
                assert!(delete_original);
            }
            _ => panic!("expected compress-from"),
        }
    }

    #[test]
    fn test_optimize_level_falls_back_to_config() {
        let config = AppConfig {
            default_optimize_level: 6,
            ..AppConfig::default()
        };
        assert_eq!(optimize_level(None, &config).value(), 6);
        assert_eq!(optimize_level(Some("2"), &config).value(), 2);
        assert_eq!(optimize_level(Some("bogus"), &config).value(), 3);
    }

    #[test]
    fn test_format_mb() {
        assert_eq!(format_mb(1024 * 1024), "1.00MB");
        assert_eq!(format_mb(0), "0.00MB");
    }
}
