//! Repository Atlas CLI
//!
//! Catalog the git repositories below a directory, check their state and
//! restore them elsewhere from the catalog alone.

mod cli;
mod commands;
mod error;
mod render;

use std::process::ExitCode;

use atlas_core::{Atlas, AtlasConfig};
use clap::Parser;
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            e.exit_code()
        }
    }
}

/// Log to stderr: DEBUG with `--verbose`, otherwise `RUST_LOG` or WARN.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
    tracing::debug!("Verbose mode enabled");
}

async fn run(cli: Cli) -> Result<()> {
    let config = AtlasConfig::resolve(cli.config.as_deref())?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, cancelling");
            on_interrupt.cancel();
        }
    });

    let atlas = Atlas::new(config).with_cancellation(cancel);
    let cwd = std::env::current_dir()?;
    execute_command(&atlas, &cwd, cli.command).await
}

async fn execute_command(atlas: &Atlas, cwd: &std::path::Path, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Index { root, index } => commands::run_index(atlas, cwd, &root, index.as_deref()).await,
        Commands::Scan {
            root,
            index,
            discover,
            fetch,
        } => {
            let options = atlas_core::ScanOptions { discover, fetch };
            commands::run_scan(atlas, cwd, &root, index.as_deref(), options).await
        }
        Commands::List {
            root,
            index,
            json,
            plain,
        } => {
            let format = if json {
                commands::ListFormat::Json
            } else if plain {
                commands::ListFormat::Plain
            } else {
                commands::ListFormat::Table
            };
            commands::run_list(atlas, cwd, root.as_deref(), index.as_deref(), format).await
        }
        Commands::Clone {
            repository,
            all,
            root,
            index,
        } => {
            commands::run_clone(
                atlas,
                cwd,
                repository.as_deref(),
                all,
                root.as_deref(),
                index.as_deref(),
            )
            .await
        }
    }
}
