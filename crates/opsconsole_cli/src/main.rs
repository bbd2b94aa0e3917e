//! Command-line probe for the console core.
//!
//! # Responsibility
//! - Render the task board and a calendar week from demo or fixture data.
//! - Replay a single card move so ordering can be checked by hand.

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::{debug, info};
use opsconsole_core::{
    core_version, demo_board_seed, demo_calendar_seed, init_stderr_logging, parse_date_key, ping,
    BoardColumn, BoardSeed, BucketStore, CalendarEntry, CalendarSeed, CalendarService,
    ConsoleConfig, ItemId, TaskBoardService, TaskCard, TaskStatus, WeekView,
};
use std::path::PathBuf;

type Board = TaskBoardService<BucketStore<TaskCard>>;
type Calendar = CalendarService<BucketStore<CalendarEntry>>;

#[derive(Parser, Debug)]
#[command(name = "opsconsole", version, about = "Agency operations console core")]
struct Cli {
    /// JSON config file (defaults to $OPSCONSOLE_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "OPSCONSOLE_LOG", default_value = "warn")]
    log_level: String,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check core linkage
    Ping,
    /// Show the task board
    Board {
        /// Board fixture; the demo board is used when omitted
        #[arg(long)]
        seed: Option<PathBuf>,
    },
    /// Show one calendar week
    Calendar {
        /// Calendar fixture; the demo week is used when omitted
        #[arg(long)]
        seed: Option<PathBuf>,
        /// Any day of the week to show (YYYY-MM-DD); defaults to today
        #[arg(long)]
        week: Option<String>,
    },
    /// Move one card and show the resulting board
    MoveTask {
        #[arg(long)]
        task: String,
        /// Destination status key, e.g. EM_REVISAO
        #[arg(long)]
        to: String,
        /// Card to land in front of; appends when omitted
        #[arg(long)]
        before: Option<String>,
        #[arg(long)]
        seed: Option<PathBuf>,
    },
    /// Show the demo board and the current demo week
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_stderr_logging(&cli.log_level)?;

    let config = match &cli.config {
        Some(path) => ConsoleConfig::from_path(path)?,
        None => ConsoleConfig::load()?,
    };
    debug!("event=cli_start module=cli command={:?}", cli.command);

    match cli.command {
        Commands::Ping => {
            println!("opsconsole_core ping={}", ping());
            println!("opsconsole_core version={}", core_version());
        }
        Commands::Board { seed } => {
            let board = load_board(&config, seed)?;
            print_board(&board.board(), cli.json)?;
        }
        Commands::Calendar { seed, week } => {
            let day = match week {
                Some(raw) => parse_day(&raw)?,
                None => Local::now().date_naive(),
            };
            let calendar = load_calendar(&config, seed, day)?;
            print_week(&calendar.week(day), cli.json)?;
        }
        Commands::MoveTask {
            task,
            to,
            before,
            seed,
        } => {
            let mut board = load_board(&config, seed)?;
            let status = TaskStatus::from_key(&to)
                .ok_or_else(|| anyhow!("unknown status `{to}`; expected one of {}", status_keys()))?;
            let id = ItemId::from(task.trim());
            let before = before.map(|raw| ItemId::from(raw.trim()));
            board
                .move_task(&id, status, before.as_ref())
                .with_context(|| format!("cannot move task `{id}`"))?;
            info!("event=task_moved module=cli task={} to={}", id, status.as_key());
            print_board(&board.board(), cli.json)?;
        }
        Commands::Demo => {
            let today = Local::now().date_naive();
            let board = load_board(&config, None)?;
            let calendar = load_calendar(&config, None, today)?;
            if cli.json {
                let week = calendar.week(today);
                let doc = serde_json::json!({ "board": board.board(), "calendar": week });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                print_board(&board.board(), false)?;
                println!();
                print_week(&calendar.week(today), false)?;
            }
        }
    }
    Ok(())
}

fn load_board(config: &ConsoleConfig, seed: Option<PathBuf>) -> Result<Board> {
    let seed = match seed {
        Some(path) => BoardSeed::from_path(&path)?,
        None => demo_board_seed(),
    };
    let mut board = TaskBoardService::from_config(BucketStore::new(), &config.board);
    seed.load_into(&mut board)?;
    Ok(board)
}

fn load_calendar(
    config: &ConsoleConfig,
    seed: Option<PathBuf>,
    day: NaiveDate,
) -> Result<Calendar> {
    let mut calendar = CalendarService::from_config(BucketStore::new(), &config.calendar);
    let seed = match seed {
        Some(path) => CalendarSeed::from_path(&path)?,
        None => demo_calendar_seed(calendar.week_start().week_of(day)),
    };
    seed.load_into(&mut calendar)?;
    Ok(calendar)
}

fn parse_day(raw: &str) -> Result<NaiveDate> {
    parse_date_key(raw).ok_or_else(|| anyhow!("invalid date `{raw}`; expected YYYY-MM-DD"))
}

fn status_keys() -> String {
    TaskStatus::ALL
        .iter()
        .map(|status| status.as_key())
        .collect::<Vec<_>>()
        .join("|")
}

fn print_board(columns: &[BoardColumn], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(columns)?);
        return Ok(());
    }
    for column in columns {
        println!(
            "{} [{}] ({})",
            column.label,
            column.status.as_key(),
            column.tasks.len()
        );
        for task in &column.tasks {
            let client = task.payload.client.as_deref().unwrap_or("-");
            println!(
                "  {}. {} • {} • {} • {}",
                task.order,
                task.id,
                task.payload.title,
                client,
                task.payload.priority.as_key()
            );
        }
    }
    Ok(())
}

fn print_week(week: &WeekView, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(week)?);
        return Ok(());
    }
    println!("Week of {} ({} entries)", week.start, week.entry_count());
    for day in &week.days {
        println!("{} {}", day.date.format("%a"), day.date);
        for entry in &day.entries {
            println!(
                "  {}. {} • {} • {}",
                entry.order,
                entry.id,
                entry.payload.title,
                entry.payload.channel.as_key()
            );
        }
    }
    Ok(())
}
