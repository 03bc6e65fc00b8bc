//! tasktrack command-line front end.
//!
//! Each invocation loads the task file, applies one intent, and saves the file
//! again when the intent changed the list. `import` replaces the list without
//! reading the current file, so it can restore over a damaged one. Row numbers
//! are 1-based and only valid until the next mutating command.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use tasktrack_core::wire::task_file::{parse_category, parse_deadline, parse_reminder};
use tasktrack_core::{init_logging, NewTask, TaskStore, TaskTrackConfig};

#[derive(Parser)]
#[command(name = "tasktrack")]
#[command(about = "Single-user task tracker with deadlines and progress stats", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Task file to read and update (defaults to $TASKTRACK_FILE)
    #[arg(long, global = true)]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task
    Add {
        /// Task title
        title: String,

        /// Deadline, YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,

        /// Reminder time, HH:MM or HH:MM:SS
        #[arg(long)]
        reminder: Option<String>,

        /// General, Work, Study, Personal or Other
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List tasks with their status labels
    List {
        /// Reference date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Toggle the done flag of row N
    Done {
        /// Row number as shown by `list`
        row: usize,
    },

    /// Delete row N
    Delete {
        /// Row number as shown by `list`
        row: usize,
    },

    /// Remove every completed task
    ClearCompleted,

    /// Remove every task
    Reset,

    /// Show progress statistics
    Stats {
        /// Reference date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Write a copy of the task list to PATH
    Export { path: PathBuf },

    /// Replace the task list with the contents of PATH
    Import { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TaskTrackConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir)
            .map_err(|err| anyhow::anyhow!("failed to start logging: {err}"))?;
    }

    let task_file = cli.file.clone().unwrap_or(config.task_file);
    let output = run(cli.command, &task_file)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

fn run(command: Commands, task_file: &Path) -> Result<String> {
    let mut store = match &command {
        Commands::Import { .. } => TaskStore::new(),
        _ => load_store(task_file)?,
    };

    let output = match command {
        Commands::Add {
            title,
            deadline,
            reminder,
            category,
        } => {
            let input = NewTask {
                title,
                deadline: parse_deadline(deadline.as_deref()).map_err(anyhow::Error::msg)?,
                reminder: parse_reminder(reminder.as_deref()).map_err(anyhow::Error::msg)?,
                category: parse_category(category.as_deref()).map_err(anyhow::Error::msg)?,
            };
            let title = input.title.clone();
            store.add(input)?;
            save_store(&store, task_file)?;
            format!("Task '{title}' added!")
        }
        Commands::List { as_of } => render_list(&store, resolve_as_of(as_of.as_deref())?),
        Commands::Done { row } => {
            let done = store.toggle_at(row_to_position(row)?)?;
            save_store(&store, task_file)?;
            if done {
                format!("Row {row} marked done.")
            } else {
                format!("Row {row} marked pending.")
            }
        }
        Commands::Delete { row } => {
            let removed = store.delete_at(row_to_position(row)?)?;
            save_store(&store, task_file)?;
            format!("Deleted '{}'.", removed.title)
        }
        Commands::ClearCompleted => {
            let removed = store.clear_completed();
            save_store(&store, task_file)?;
            format!("Removed {removed} completed task(s).")
        }
        Commands::Reset => {
            let removed = store.clear_all();
            save_store(&store, task_file)?;
            format!("Removed {removed} task(s).")
        }
        Commands::Stats { as_of } => render_stats(&store, resolve_as_of(as_of.as_deref())?),
        Commands::Export { path } => {
            store
                .export_to_path(&path)
                .with_context(|| format!("failed to export to `{}`", path.display()))?;
            format!("Exported {} task(s) to {}.", store.len(), path.display())
        }
        Commands::Import { path } => {
            let count = store
                .import_from_path(&path)
                .with_context(|| format!("failed to import `{}`", path.display()))?;
            save_store(&store, task_file)?;
            format!("Imported {count} task(s).")
        }
    };
    Ok(output)
}

/// Missing task file means a first run with an empty list.
fn load_store(task_file: &Path) -> Result<TaskStore> {
    let mut store = TaskStore::new();
    if task_file.exists() {
        store
            .import_from_path(task_file)
            .with_context(|| format!("failed to load task file `{}`", task_file.display()))?;
    }
    Ok(store)
}

fn save_store(store: &TaskStore, task_file: &Path) -> Result<()> {
    store
        .export_to_path(task_file)
        .with_context(|| format!("failed to save task file `{}`", task_file.display()))?;
    info!("event=cli_save module=cli status=ok total={}", store.len());
    Ok(())
}

fn row_to_position(row: usize) -> Result<usize> {
    if row == 0 {
        bail!("row numbers start at 1");
    }
    Ok(row - 1)
}

fn resolve_as_of(raw: Option<&str>) -> Result<NaiveDate> {
    Ok(parse_deadline(raw)
        .map_err(anyhow::Error::msg)?
        .unwrap_or_else(|| Local::now().date_naive()))
}

fn render_list(store: &TaskStore, as_of: NaiveDate) -> String {
    if store.is_empty() {
        return "No tasks yet. Add one with `tasktrack add`.".to_string();
    }
    store
        .rows(as_of)
        .iter()
        .map(|row| {
            format!(
                "{:>3}. [{}] {}  deadline={} reminder={} category={} ({})",
                row.position + 1,
                if row.done { "x" } else { " " },
                row.title,
                row.deadline,
                row.reminder,
                row.category,
                row.label.as_str()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_stats(store: &TaskStore, as_of: NaiveDate) -> String {
    let stats = store.stats(as_of);
    [
        stats.summary_line(),
        format!(
            "{} tasks pending ({:.1}%)",
            stats.pending, stats.percent_pending
        ),
        format!(
            "{} tasks overdue ({:.1}%)",
            stats.overdue, stats.percent_overdue
        ),
        format!("{} tasks due today", stats.due_today),
    ]
    .join("\n")
}
