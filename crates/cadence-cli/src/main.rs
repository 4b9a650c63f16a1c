//! Cadence CLI Application
//!
//! Command-line interface for the cadence plan tracker.

mod args;
mod cli;
mod renderer;
mod session_store;

use std::path::PathBuf;

use anyhow::{Context, Result};
use args::{Args, Commands};
use cadence_core::{Settings, TrackerBuilder};
use clap::Parser;
use cli::{handle_config_command, Cli};
use log::info;
use renderer::TerminalRenderer;
use session_store::SessionStore;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        session_file,
        settings_file,
        no_color,
        command,
    } = Args::parse();

    let renderer = TerminalRenderer::new(!no_color);

    match command {
        // Settings never touch the database, so they work even when it is broken.
        Some(Config { command }) => {
            let path = match settings_file {
                Some(path) => path,
                None => Settings::default_path().context("Failed to locate the settings file")?,
            };
            handle_config_command(&renderer, &path, command)
        }
        Some(Plan { command }) => {
            build_cli(database_file, session_file, renderer)
                .await?
                .handle_plan_command(command)
                .await
        }
        Some(Run { command }) => {
            build_cli(database_file, session_file, renderer)
                .await?
                .handle_run_command(command)
                .await
        }
        Some(Stats { command }) => {
            build_cli(database_file, session_file, renderer)
                .await?
                .handle_stats_command(command)
                .await
        }
        None => {
            build_cli(database_file, session_file, renderer)
                .await?
                .overview()
                .await
        }
    }
}

async fn build_cli(
    database_file: Option<PathBuf>,
    session_file: Option<PathBuf>,
    renderer: TerminalRenderer,
) -> Result<Cli> {
    let tracker = TrackerBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize tracker")?;
    let sessions = SessionStore::new(session_file)?;

    info!(
        "Cadence started with database {} and session {}",
        tracker.database_path().display(),
        sessions.path().display()
    );

    Ok(Cli::new(tracker, sessions, renderer))
}
