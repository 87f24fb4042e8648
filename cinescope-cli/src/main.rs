//! Cinescope CLI - Command-line interface
//!
//! Terminal front end for searching and browsing the movie catalog.

mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Context;
use cinescope_core::tracing_setup::init_tracing;
use cinescope_core::{CinescopeConfig, LogLevel};
use clap::Parser;

#[derive(Parser)]
#[command(name = "cinescope")]
#[command(about = "Search and explore a movie catalog")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Remote search endpoint, overrides API_BASE
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Console log level, overrides LOG_LEVEL
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,

    /// Also write debug logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = CinescopeConfig::from_env();
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    let prepared = match &cli.api_base {
        Some(base) => config.override_api_base(base),
        None => Ok(()),
    }
    .and_then(|()| init_tracing(config.log_level, cli.log_file.as_deref()));

    if let Err(e) = prepared {
        eprintln!("{}", e.user_message());
        return Err(e.into());
    }

    for warning in &config.warnings {
        tracing::warn!("{warning}");
    }
    tracing::debug!(
        remote = config.has_remote(),
        details = config.feature_flags.enable_details_modal,
        "Configuration loaded"
    );

    commands::handle_command(cli.command, &config)
        .await
        .context("command failed")
}
