use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{ConfigCommands, PlanCommands, RunCommands, StatsCommands};

/// Run AI-optimized daily plans against a countdown and review the trend
///
/// Cadence imports a plan produced by a language model, steps through its
/// tasks one at a time while a timer runs, records how long each task really
/// took and how focused you were, and rolls those records up into daily
/// statistics.
#[derive(Parser)]
#[command(version, about, name = "cadence")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/cadence/cadence.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Path to the running-session file. Defaults to
    /// $XDG_STATE_HOME/cadence/session.json
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Path to the settings file. Defaults to
    /// $XDG_CONFIG_HOME/cadence/settings.json
    #[arg(long, global = true)]
    pub settings_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Cadence CLI
///
/// - `plan`: import and browse plans and their task records
/// - `run`: execute a plan task by task
/// - `stats`: daily statistics, trend and CSV export
/// - `config`: persisted settings
#[derive(Subcommand)]
pub enum Commands {
    /// Import and browse plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Execute a plan task by task
    #[command(alias = "r")]
    Run {
        #[command(subcommand)]
        command: RunCommands,
    },
    /// Daily statistics and export
    #[command(alias = "s")]
    Stats {
        #[command(subcommand)]
        command: StatsCommands,
    },
    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}
