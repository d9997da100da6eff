// pup/src/main.rs
use std::fs;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use pup_common::config::Config;
use pup_common::error::PupError;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::SystemTime;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::CliArgs;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli_args = CliArgs::parse();

    let config = match cli_args.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            return ExitCode::from(e.exit_code());
        }
    };

    let _guard = init_logging(&config, cli_args.verbose);

    let command = cli_args.command_or_default();
    match command.run(&config).await {
        Ok(()) => {
            debug!("Command completed successfully.");
            ExitCode::SUCCESS
        }
        Err(PupError::Interrupted) => {
            warn!("pup was interrupted.");
            ExitCode::from(PupError::Interrupted.exit_code())
        }
        Err(e) => {
            error!("Command failed: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Sends log records to stderr and to the configured log file. When the log
/// file cannot be opened, logging continues on stderr alone.
fn init_logging(config: &Config, verbose: u8) -> Option<WorkerGuard> {
    let level_filter = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("PUP_LOG")
        .from_env_lossy();

    match open_log_file(config) {
        Ok(file_appender) => {
            let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr.and(non_blocking_appender))
                .with_timer(SystemTime)
                .with_target(false)
                .with_ansi(false)
                .try_init();
            debug!("Writing logs to: {}", config.log_path().display());
            Some(guard)
        }
        Err(e) => {
            eprintln!(
                "{} Failed to open log file {}: {}",
                "Warning:".yellow(),
                config.log_path().display(),
                e
            );
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_timer(SystemTime)
                .with_target(false)
                .with_ansi(false)
                .try_init();
            None
        }
    }
}

fn open_log_file(config: &Config) -> Result<RollingFileAppender, String> {
    let log_path = config.log_path();
    let file_name = log_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| "log file has no file name".to_string())?;
    let log_dir = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    fs::create_dir_all(&log_dir).map_err(|e| e.to_string())?;
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(&log_dir)
        .map_err(|e| e.to_string())
}
