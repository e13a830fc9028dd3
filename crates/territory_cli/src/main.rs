//! Command-line host for the territory planner core.
//!
//! # Responsibility
//! - Parse flags, start optional file logging, and dispatch subcommands.
//! - Map failures to a non-zero exit code with a one-line message on stderr.

mod args;
mod commands;
mod error;

use args::Cli;
use clap::Parser;
use error::CliError;
use log::{error, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use territory_core::{init_logging, LogLevel};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = start_logging(&cli) {
        eprintln!("territory: {err}");
        return ExitCode::FAILURE;
    }
    info!(
        "event=cli_start module=cli status=ok core_version={}",
        territory_core::core_version()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match commands::run(&cli, &mut out).and_then(|()| out.flush().map_err(CliError::Output)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error");
            eprintln!("territory: {err}");
            ExitCode::FAILURE
        }
    }
}

fn start_logging(cli: &Cli) -> Result<(), CliError> {
    let Some(dir) = &cli.log_dir else {
        return Ok(());
    };
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| LogLevel::default_for_build().as_str().to_string());
    init_logging(&level, &absolute_dir(dir))?;
    Ok(())
}

fn absolute_dir(dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(dir),
        Err(_) => dir.to_path_buf(),
    }
}
