//! Command definitions and their handlers.
//!
//! Argument structs carry the clap attributes and convert into the core
//! parameter types with `From`, so the core stays free of CLI concerns:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Tracker
//! ```
//!
//! [`Cli`] then runs the operation and renders the markdown it displays.

use std::{
    fmt::Write as _,
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use cadence_core::{
    params::{
        AnnotateDay, CompleteTask, Id, ImportPlan, ListPlans, StartPlan, StatsWindow,
        DEFAULT_LIST_LIMIT, DEFAULT_STATS_WINDOW_DAYS,
    },
    settings::KNOWN_KEYS,
    statistics::{default_export_file_name, local_today},
    CompletionOutcome, CompletionResult, OperationStatus, Plan, Session, Settings, Tracker,
};
use clap::{Args, Subcommand};
use jiff::civil::Date;
use log::debug;

use crate::{renderer::TerminalRenderer, session_store::SessionStore};

// ============================================================================
// Plan commands
// ============================================================================

/// Import a plan payload produced by the language model
///
/// The payload is the model's JSON reply; a surrounding markdown code fence
/// is accepted. Nothing is stored when validation fails.
#[derive(Args)]
pub struct ImportPlanArgs {
    /// File holding the payload, or `-` to read standard input
    #[arg(help = "File holding the model payload, or - for standard input")]
    pub file: PathBuf,
    /// Title of the plan
    #[arg(short, long, help = "Title of the plan (defaults to \"Daily Plan\" and the current time)")]
    pub title: Option<String>,
}

#[derive(Args)]
pub struct ListPlansArgs {
    /// Maximum number of plans to show
    #[arg(short, long, default_value_t = DEFAULT_LIST_LIMIT)]
    pub limit: u32,
}

impl From<ListPlansArgs> for ListPlans {
    fn from(val: ListPlansArgs) -> Self {
        ListPlans { limit: val.limit }
    }
}

#[derive(Args)]
pub struct PlanIdArgs {
    #[arg(help = "Unique identifier of the plan")]
    pub id: u64,
}

impl From<PlanIdArgs> for Id {
    fn from(val: PlanIdArgs) -> Self {
        Id { id: val.id }
    }
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Import a plan payload produced by the language model
    #[command(alias = "i")]
    Import(ImportPlanArgs),
    /// List recent plans with their progress
    #[command(aliases = ["l", "ls"])]
    List(ListPlansArgs),
    /// Show details of a specific plan
    #[command(alias = "s")]
    Show(PlanIdArgs),
    /// Show the most recently created plan
    Latest,
    /// Show today's plan
    Today,
    /// Show the task records of a plan
    #[command(alias = "r")]
    Records(PlanIdArgs),
}

// ============================================================================
// Run commands
// ============================================================================

#[derive(Args)]
pub struct StartArgs {
    /// Plan to run; defaults to the most recent plan still in progress
    #[arg(help = "Plan to run (defaults to the latest plan in progress)")]
    pub plan_id: Option<u64>,
}

impl From<StartArgs> for StartPlan {
    fn from(val: StartArgs) -> Self {
        StartPlan {
            plan_id: val.plan_id,
        }
    }
}

/// Record the current task and move on
///
/// Actual minutes default to the time spent on the task so far, focus to
/// the task's target focus.
#[derive(Args)]
pub struct DoneArgs {
    #[arg(short, long, help = "Minutes actually spent on the task")]
    pub actual: Option<u32>,
    #[arg(short, long, help = "Focus level reached, usually 1-10")]
    pub focus: Option<i32>,
    #[arg(short, long, help = "Free-form notes about the task")]
    pub notes: Option<String>,
}

impl From<DoneArgs> for CompleteTask {
    fn from(val: DoneArgs) -> Self {
        CompleteTask {
            actual_minutes: val.actual,
            focus_level: val.focus,
            notes: val.notes,
        }
    }
}

#[derive(Subcommand)]
pub enum RunCommands {
    /// Start a plan from its first task
    Start(StartArgs),
    /// Continue a plan after its last recorded task
    Resume(StartArgs),
    /// Show the current task and timer
    #[command(alias = "st")]
    Status,
    /// Record the current task and move on
    #[command(alias = "d")]
    Done(DoneArgs),
    /// Go back to the previous task
    Back,
    /// Stop running; the plan stays in progress
    Stop,
    /// Give up the running plan
    Abandon,
}

// ============================================================================
// Stats commands
// ============================================================================

#[derive(Args)]
pub struct WindowArgs {
    /// Number of trailing days to include
    #[arg(short, long, default_value_t = DEFAULT_STATS_WINDOW_DAYS)]
    pub days: u32,
}

impl From<WindowArgs> for StatsWindow {
    fn from(val: WindowArgs) -> Self {
        StatsWindow { days: val.days }
    }
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub window: WindowArgs,
    #[arg(
        short,
        long,
        help = "Output file (defaults to cadence_stats_YYYYMMDD.csv in the current directory)"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct NoteArgs {
    /// Journal note for the day
    pub text: String,
    #[arg(long, help = "Day to annotate as YYYY-MM-DD (defaults to today)")]
    pub date: Option<String>,
}

#[derive(Subcommand)]
pub enum StatsCommands {
    /// Show per-day statistics and the trend
    Show(WindowArgs),
    /// Export per-day statistics as CSV
    Export(ExportArgs),
    /// Rewrite the cached daily logs from the task records
    Refresh(WindowArgs),
    /// Attach a journal note to a day
    Note(NoteArgs),
}

// ============================================================================
// Config commands
// ============================================================================

#[derive(Args)]
pub struct SetConfigArgs {
    pub key: String,
    pub value: String,
}

#[derive(Args)]
pub struct GetConfigArgs {
    pub key: String,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show all settings
    Show,
    /// Set a setting and save the file
    Set(SetConfigArgs),
    /// Print one setting
    Get(GetConfigArgs),
}

// ============================================================================
// Handlers
// ============================================================================

/// Runs commands against a tracker and renders their results.
pub struct Cli {
    tracker: Tracker,
    sessions: SessionStore,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(tracker: Tracker, sessions: SessionStore, renderer: TerminalRenderer) -> Self {
        Self {
            tracker,
            sessions,
            renderer,
        }
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Import(args) => self.import_plan(args).await,
            PlanCommands::List(args) => self.list_plans(&args.into()).await,
            PlanCommands::Show(args) => {
                let plan = self.tracker.require_plan(&args.into()).await?;
                self.renderer.render(&plan.to_string())
            }
            PlanCommands::Latest => {
                let plan = self.tracker.latest_plan().await?;
                self.render_optional_plan(plan, "No plans found.")
            }
            PlanCommands::Today => {
                let plan = self.tracker.plan_for_date(local_today()).await?;
                self.render_optional_plan(plan, "No plan for today.")
            }
            PlanCommands::Records(args) => {
                let records = self.tracker.list_records(&args.into()).await?;
                self.renderer.render(&records.to_string())
            }
        }
    }

    pub async fn handle_run_command(&self, command: RunCommands) -> Result<()> {
        let mut session = self.sessions.load()?;
        let outcome = self.run(command, &mut session).await;
        // Persist whatever state the operation reached, even on failure.
        self.sessions.save(&session)?;
        outcome
    }

    pub async fn handle_stats_command(&self, command: StatsCommands) -> Result<()> {
        match command {
            StatsCommands::Show(args) => {
                let window = StatsWindow::from(args);
                let days = self.tracker.daily_statistics(&window).await?;
                let mut output = format!("# Last {} day(s)\n\n{days}", window.days);
                if let Some(trend) = self.tracker.trend_summary(&window).await? {
                    output.push('\n');
                    output.push_str(&trend.to_string());
                }
                self.renderer.render(&output)
            }
            StatsCommands::Export(args) => {
                let path = args
                    .output
                    .unwrap_or_else(|| PathBuf::from(default_export_file_name(local_today())));
                let rows = self
                    .tracker
                    .export_statistics_to(&args.window.into(), path.clone())
                    .await?;
                self.render_status(&OperationStatus::success(format!(
                    "Exported {rows} day(s) to {}",
                    path.display()
                )))
            }
            StatsCommands::Refresh(args) => {
                let rows = self.tracker.refresh_daily_logs(&args.into()).await?;
                self.render_status(&OperationStatus::success(format!(
                    "Refreshed {rows} daily log(s)"
                )))
            }
            StatsCommands::Note(args) => {
                let date = args
                    .date
                    .map(|d| {
                        d.parse::<Date>()
                            .with_context(|| format!("Invalid date '{d}', expected YYYY-MM-DD"))
                    })
                    .transpose()?;
                let day = self
                    .tracker
                    .annotate_day(&AnnotateDay {
                        date,
                        notes: args.text,
                    })
                    .await?;
                self.render_status(&OperationStatus::success(format!("Noted {day}")))
            }
        }
    }

    /// Default view: the running task, or the plan list when idle.
    pub async fn overview(&self) -> Result<()> {
        let session = self.sessions.load()?;
        if session.is_running() {
            self.render_snapshot(&session)
        } else {
            self.list_plans(&ListPlans::default()).await
        }
    }

    pub async fn list_plans(&self, params: &ListPlans) -> Result<()> {
        let plans = self.tracker.list_plan_summaries(params).await?;
        let title = if plans.is_empty() { "" } else { "# Recent Plans\n\n" };
        self.renderer.render(&format!("{title}{plans}"))
    }

    async fn import_plan(&self, args: ImportPlanArgs) -> Result<()> {
        let payload = read_payload(&args.file)?;
        let params = ImportPlan {
            payload,
            title: args.title,
        };

        match self.tracker.import_plan(&params).await {
            Ok(imported) => self.renderer.render(&imported.to_string()),
            Err(e) => {
                if let Some(raw) = e.raw_payload() {
                    self.renderer
                        .render_error(&format!("Raw payload as received:\n{raw}"));
                }
                Err(e.into())
            }
        }
    }

    async fn run(&self, command: RunCommands, session: &mut Session) -> Result<()> {
        match command {
            RunCommands::Start(args) => {
                let plan = self.tracker.start(session, &args.into()).await?;
                debug!("Started plan {}", plan.id);
                self.render_snapshot(session)
            }
            RunCommands::Resume(args) => {
                let plan = self.tracker.resume(session, &args.into()).await?;
                if session.is_running() {
                    self.render_snapshot(session)
                } else {
                    self.render_status(&OperationStatus::notice(format!(
                        "Every task of plan {} is already recorded; marked it completed",
                        plan.id
                    )))
                }
            }
            RunCommands::Status => {
                if session.is_running() {
                    self.render_snapshot(session)
                } else {
                    self.renderer.render(&session.to_string())
                }
            }
            RunCommands::Done(args) => {
                let completion = self
                    .tracker
                    .complete_current(session, &args.into())
                    .await?;
                self.renderer
                    .render(&CompletionResult(&completion).to_string())?;
                if let CompletionOutcome::Advanced { .. } = completion.outcome {
                    self.renderer.render("\n")?;
                    self.render_snapshot(session)?;
                }
                Ok(())
            }
            RunCommands::Back => {
                self.tracker.go_back(session)?;
                self.render_snapshot(session)
            }
            RunCommands::Stop => match self.tracker.stop(session) {
                Some(id) => self.render_status(&OperationStatus::success(format!(
                    "Stopped plan {id}; resume it with `cadence run resume`"
                ))),
                None => self.render_status(&OperationStatus::notice("No plan is running")),
            },
            RunCommands::Abandon => {
                let id = self.tracker.abandon(session).await?;
                self.render_status(&OperationStatus::success(format!("Abandoned plan {id}")))
            }
        }
    }

    fn render_snapshot(&self, session: &Session) -> Result<()> {
        let snapshot = self.tracker.snapshot(session)?;
        self.renderer.render(&snapshot.to_string())
    }

    fn render_optional_plan(
        &self,
        plan: Option<Plan>,
        empty_message: &str,
    ) -> Result<()> {
        match plan {
            Some(plan) => self.renderer.render(&plan.to_string()),
            None => self.render_status(&OperationStatus::notice(empty_message)),
        }
    }

    fn render_status(&self, status: &OperationStatus) -> Result<()> {
        self.renderer.render(&status.to_string())
    }
}

/// Settings commands; they need neither the database nor a session.
pub fn handle_config_command(
    renderer: &TerminalRenderer,
    path: &Path,
    command: ConfigCommands,
) -> Result<()> {
    let mut settings = Settings::load(path);
    match command {
        ConfigCommands::Show => {
            let mut output = format!("# Settings\n\n- File: {}\n", path.display());
            for key in KNOWN_KEYS {
                let value = if key == "api_key" {
                    settings.masked_api_key()
                } else {
                    settings.get(key)
                };
                writeln!(output, "- {key}: {}", value.as_deref().unwrap_or("(not set)"))?;
            }
            for (key, value) in &settings.extra {
                writeln!(output, "- {key}: {value}")?;
            }
            renderer.render(&output)
        }
        ConfigCommands::Set(SetConfigArgs { key, value }) => {
            settings.set(&key, &value)?;
            settings.save(path)?;
            renderer.render(&OperationStatus::success(format!("Saved {key}")).to_string())
        }
        ConfigCommands::Get(GetConfigArgs { key }) => match settings.get(&key) {
            Some(value) => renderer.render(&format!("{value}\n")),
            None => bail!("Setting '{key}' is not set"),
        },
    }
}

fn read_payload(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut payload = String::new();
        std::io::stdin()
            .read_to_string(&mut payload)
            .context("Failed to read payload from standard input")?;
        return Ok(payload);
    }
    std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read payload file {}", file.display()))
}
