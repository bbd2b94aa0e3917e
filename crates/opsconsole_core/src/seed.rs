//! Mock data fixtures for the console views.
//!
//! # Responsibility
//! - Parse board and calendar fixtures from JSON.
//! - Load fixtures into view adapters in file order.
//! - Provide a built-in agency demo data set.
//!
//! # Invariants
//! - File order becomes rank order inside each bucket.
//! - A fixture is checked in full before the first item is inserted, so a
//!   rejected fixture leaves the target store untouched.

use crate::model::event::CalendarEntry;
use crate::model::event::Channel;
use crate::model::item::ItemId;
use crate::model::task::{TaskCard, TaskPriority, TaskStatus};
use crate::service::board_service::{BoardError, TaskBoardService};
use crate::service::calendar_service::{CalendarError, CalendarService};
use crate::store::facade::BucketFacade;
use chrono::{Days, NaiveDate};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid seed json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("seed id `{0}` is used more than once or already exists")]
    DuplicateId(ItemId),
    #[error("seed entry #{0} has a blank title")]
    BlankTitle(usize),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// Task board fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSeed {
    #[serde(default)]
    pub tasks: Vec<TaskSeed>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSeed {
    /// Fixed id; generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    pub status: TaskStatus,
    #[serde(flatten)]
    pub card: TaskCard,
}

/// Operations calendar fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSeed {
    #[serde(default)]
    pub entries: Vec<EntrySeed>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySeed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub entry: CalendarEntry,
}

impl BoardSeed {
    pub fn from_json_str(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        Self::from_json_str(&read_seed(path.as_ref())?)
    }

    /// Inserts every task into `board`. Returns the number of tasks loaded.
    pub fn load_into<S: BucketFacade<TaskCard>>(
        &self,
        board: &mut TaskBoardService<S>,
    ) -> Result<usize, SeedError> {
        check_fixture(
            self.tasks
                .iter()
                .map(|task| (task.id.as_ref(), task.card.title.as_str())),
            |id| board.task(id).is_some(),
        )?;

        for task in &self.tasks {
            match &task.id {
                Some(id) => board.insert_task(id.clone(), task.status, task.card.clone())?,
                None => board.create_task(task.status, task.card.clone())?,
            };
        }
        info!(
            "event=seed_loaded module=seed view=board tasks={}",
            self.tasks.len()
        );
        Ok(self.tasks.len())
    }
}

impl CalendarSeed {
    pub fn from_json_str(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        Self::from_json_str(&read_seed(path.as_ref())?)
    }

    /// Inserts every entry into `calendar`. Returns the number loaded.
    pub fn load_into<S: BucketFacade<CalendarEntry>>(
        &self,
        calendar: &mut CalendarService<S>,
    ) -> Result<usize, SeedError> {
        check_fixture(
            self.entries
                .iter()
                .map(|entry| (entry.id.as_ref(), entry.entry.title.as_str())),
            |id| calendar.entry(id).is_some(),
        )?;

        for seed in &self.entries {
            match &seed.id {
                Some(id) => calendar.insert_entry(id.clone(), seed.date, seed.entry.clone())?,
                None => calendar.schedule(seed.date, seed.entry.clone())?,
            };
        }
        info!(
            "event=seed_loaded module=seed view=calendar entries={}",
            self.entries.len()
        );
        Ok(self.entries.len())
    }
}

fn read_seed(path: &Path) -> Result<String, SeedError> {
    std::fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn check_fixture<'a>(
    rows: impl Iterator<Item = (Option<&'a ItemId>, &'a str)>,
    exists: impl Fn(&ItemId) -> bool,
) -> Result<(), SeedError> {
    let mut seen = HashSet::new();
    for (index, (id, title)) in rows.enumerate() {
        if title.trim().is_empty() {
            return Err(SeedError::BlankTitle(index));
        }
        if let Some(id) = id {
            if !seen.insert(id) || exists(id) {
                return Err(SeedError::DuplicateId(id.clone()));
            }
        }
    }
    Ok(())
}

/// Small agency board used by the CLI `demo` command and host previews.
pub fn demo_board_seed() -> BoardSeed {
    let task = |id: &str, status, title: &str, client: &str, priority| TaskSeed {
        id: Some(ItemId::from(id)),
        status,
        card: TaskCard {
            client: Some(client.to_string()),
            priority,
            ..TaskCard::new(title)
        },
    };

    BoardSeed {
        tasks: vec![
            task(
                "T1",
                TaskStatus::Todo,
                "Draft Q3 content calendar",
                "Acme Foods",
                TaskPriority::High,
            ),
            task(
                "T2",
                TaskStatus::Todo,
                "Collect product shots",
                "Acme Foods",
                TaskPriority::Medium,
            ),
            task(
                "T3",
                TaskStatus::InProgress,
                "Landing page copy",
                "Northwind",
                TaskPriority::Urgent,
            ),
            task(
                "T4",
                TaskStatus::Review,
                "Newsletter #42",
                "Northwind",
                TaskPriority::Medium,
            ),
            task(
                "T5",
                TaskStatus::Done,
                "Monthly ads report",
                "Globex",
                TaskPriority::Low,
            ),
        ],
    }
}

/// Demo calendar for the week starting at `week_start`.
pub fn demo_calendar_seed(week_start: NaiveDate) -> CalendarSeed {
    let day = |offset: u64| week_start.checked_add_days(Days::new(offset));
    let rows = [
        ("E1", 0, "Instagram carousel", Channel::Social, "Acme Foods"),
        ("E2", 0, "Kickoff call", Channel::Meeting, "Northwind"),
        ("E3", 2, "Newsletter send", Channel::Email, "Northwind"),
        ("E4", 3, "Blog: summer recipes", Channel::Blog, "Acme Foods"),
        ("E5", 4, "Search ads refresh", Channel::Ads, "Globex"),
    ];

    CalendarSeed {
        entries: rows
            .into_iter()
            .filter_map(|(id, offset, title, channel, client)| {
                Some(EntrySeed {
                    id: Some(ItemId::from(id)),
                    date: day(offset)?,
                    entry: CalendarEntry {
                        client: Some(client.to_string()),
                        ..CalendarEntry::new(title, channel)
                    },
                })
            })
            .collect(),
    }
}
