//! `taskquest` command-line front end.
//!
//! # Responsibility
//! - Map subcommands onto `TaskService` use-cases over a SQLite file.
//! - Score standalone JSON task exports without touching the database.
//! - Print JSON on stdout; diagnostics go to the optional log directory.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use taskquest_core::scoring::level_progress;
use taskquest_core::wire::{decode_tasks_from_reader, parse_optional_timestamp};
use taskquest_core::{
    compute_breakdown, compute_stats, default_log_level, encode_stats, encode_tasks,
    init_logging, Category, Clock, FixedClock, NewTask, Priority, SqliteTaskRepository,
    SystemClock, TaskId, TaskListQuery, TaskPatch, TaskService,
};

#[derive(Debug, Parser)]
#[command(name = "taskquest", version, about = "Task tracking with points, levels and streaks")]
struct Cli {
    #[command(flatten)]
    config: CliConfig,

    #[command(subcommand)]
    command: Command,
}

/// Runtime settings shared by every subcommand.
#[derive(Debug, Args)]
struct CliConfig {
    /// SQLite database file.
    #[arg(long, global = true, env = "TASKQUEST_DB", default_value = "taskquest.sqlite3")]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true, env = "TASKQUEST_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, global = true, env = "TASKQUEST_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a task.
    Add(AddArgs),
    /// Edit fields of an existing task.
    Update(UpdateArgs),
    /// Mark a task completed now.
    Complete { id: String },
    /// Mark a task open again.
    Reopen { id: String },
    /// Flip a task's completion state.
    Toggle { id: String },
    /// Permanently delete a task.
    Delete { id: String },
    /// Show one task.
    Show { id: String },
    /// List tasks, newest first.
    List(ListArgs),
    /// Points, level, streak and achievements for stored tasks.
    Stats {
        /// Include category/priority breakdown and level progress.
        #[arg(long)]
        detailed: bool,
    },
    /// Score a JSON array of task documents (`-` reads stdin).
    Score {
        #[arg(long, short)]
        input: PathBuf,
        /// Evaluate as of this RFC 3339 instant instead of the system clock.
        /// Its offset decides where local days begin for the streak.
        #[arg(long, value_parser = parse_now)]
        now: Option<DateTime<FixedOffset>>,
    },
}

#[derive(Debug, Args)]
struct AddArgs {
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, value_parser = parse_category, default_value = "personal")]
    category: Category,
    #[arg(long, value_parser = parse_priority, default_value = "medium")]
    priority: Priority,
    /// RFC 3339 timestamp or YYYY-MM-DD.
    #[arg(long, value_parser = parse_due)]
    due: Option<DateTime<Utc>>,
    #[arg(long)]
    completed: bool,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    id: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, value_parser = parse_category)]
    category: Option<Category>,
    #[arg(long, value_parser = parse_priority)]
    priority: Option<Priority>,
    /// RFC 3339 timestamp or YYYY-MM-DD.
    #[arg(long, value_parser = parse_due, conflicts_with = "clear_due")]
    due: Option<DateTime<Utc>>,
    #[arg(long)]
    clear_due: bool,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[arg(long, value_parser = parse_category)]
    category: Option<Category>,
    #[arg(long, value_parser = parse_priority)]
    priority: Option<Priority>,
    #[arg(long, conflicts_with = "done")]
    pending: bool,
    #[arg(long)]
    done: bool,
    /// Case-insensitive title filter.
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long, default_value_t = 0)]
    offset: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_cli_logging(&cli.config)?;
    info!("event=cli_command module=cli status=start command={}", cli.command.name());

    match cli.command {
        Command::Score { input, now } => score_file(&input, now),
        command => run_with_store(&cli.config, command),
    }
}

fn init_cli_logging(config: &CliConfig) -> Result<()> {
    let Some(log_dir) = config.log_dir.as_deref() else {
        return Ok(());
    };
    let level = config.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, log_dir).context("failed to initialize logging")
}

fn run_with_store(config: &CliConfig, command: Command) -> Result<()> {
    let conn = taskquest_core::db::open_db(&config.db)
        .with_context(|| format!("failed to open database `{}`", config.db.display()))?;
    let service = TaskService::new(SqliteTaskRepository::new(&conn), SystemClock);

    match command {
        Command::Add(args) => {
            let task = service.create_task(NewTask {
                title: args.title,
                description: args.description,
                category: args.category,
                priority: args.priority,
                due_date: args.due,
                completed: args.completed,
            })?;
            print_json(&task)
        }
        Command::Update(args) => {
            let due_date = if args.clear_due {
                Some(None)
            } else {
                args.due.map(Some)
            };
            let task = service.update_task(
                &TaskId::new(args.id),
                TaskPatch {
                    title: args.title,
                    description: args.description,
                    category: args.category,
                    priority: args.priority,
                    due_date,
                    completed: None,
                },
            )?;
            print_json(&task)
        }
        Command::Complete { id } => print_json(&service.set_completed(&TaskId::new(id), true)?),
        Command::Reopen { id } => print_json(&service.set_completed(&TaskId::new(id), false)?),
        Command::Toggle { id } => print_json(&service.toggle_task(&TaskId::new(id))?),
        Command::Delete { id } => {
            let id = TaskId::new(id);
            service.delete_task(&id)?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        Command::Show { id } => print_json(&service.get_task(&TaskId::new(id))?),
        Command::List(args) => {
            let completed = match (args.pending, args.done) {
                (true, _) => Some(false),
                (_, true) => Some(true),
                _ => None,
            };
            let tasks = service.list_tasks(&TaskListQuery {
                category: args.category,
                priority: args.priority,
                completed,
                title_contains: args.search,
                limit: args.limit,
                offset: args.offset,
            })?;
            println!("{}", encode_tasks(&tasks)?);
            Ok(())
        }
        Command::Stats { detailed } => {
            let stats = service.user_stats()?;
            if detailed {
                let breakdown = service.stats_breakdown()?;
                print_json(&serde_json::json!({
                    "stats": stats,
                    "levelProgress": level_progress(stats.points),
                    "breakdown": breakdown,
                }))
            } else {
                println!("{}", encode_stats(&stats)?);
                Ok(())
            }
        }
        Command::Score { .. } => bail!("score does not use the task database"),
    }
}

fn score_file(input: &Path, now: Option<DateTime<FixedOffset>>) -> Result<()> {
    let reader: Box<dyn Read> = if input.as_os_str() == "-" {
        Box::new(io::stdin().lock())
    } else {
        Box::new(
            File::open(input)
                .with_context(|| format!("failed to open task export `{}`", input.display()))?,
        )
    };
    let report = match now {
        Some(now) => score_export(reader, FixedClock::new(now))?,
        None => score_export(reader, SystemClock)?,
    };
    print_json(&report)
}

fn score_export(reader: impl Read, clock: impl Clock) -> Result<serde_json::Value> {
    let tasks = decode_tasks_from_reader(reader).context("failed to decode task export")?;
    let stats = compute_stats(&tasks, clock.now());
    Ok(serde_json::json!({
        "stats": stats,
        "levelProgress": level_progress(stats.points),
        "breakdown": compute_breakdown(&tasks),
    }))
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_category(value: &str) -> Result<Category, String> {
    value.parse().map_err(|err| format!("{err}"))
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    value.parse().map_err(|err| format!("{err}"))
}

fn parse_now(value: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value.trim()).map_err(|err| format!("expected RFC 3339: {err}"))
}

fn parse_due(value: &str) -> Result<DateTime<Utc>, String> {
    parse_optional_timestamp("due", Some(value))
        .map_err(|err| err.to_string())?
        .ok_or_else(|| "due date cannot be blank".to_string())
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Update(_) => "update",
            Self::Complete { .. } => "complete",
            Self::Reopen { .. } => "reopen",
            Self::Toggle { .. } => "toggle",
            Self::Delete { .. } => "delete",
            Self::Show { .. } => "show",
            Self::List(_) => "list",
            Self::Stats { .. } => "stats",
            Self::Score { .. } => "score",
        }
    }
}
