//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the task board and operations calendar to Dart via FRB.
//! - Keep error semantics simple: action calls return an envelope with
//!   `ok` and a message instead of throwing.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Ids, statuses, channels and dates cross the boundary as strings.
//! - Each `OpsConsole` owns its own stores; nothing is process-global except
//!   logging.
//! - Hosts learn about mutations by polling `drain_changes` (or comparing
//!   `revision`); the feed keeps at most `MAX_PENDING_CHANGES` events.

use chrono::{Local, NaiveDate};
use log::{info, warn};
use opsconsole_core::{
    core_version as core_version_inner, date_key, demo_board_seed, demo_calendar_seed,
    init_logging as init_logging_inner, parse_date_key, ping as ping_inner, CalendarEntry,
    CalendarService, Channel, ConsoleConfig, Item, ItemId, SharedBucketStore, TaskBoardService,
    StoreChange, TaskCard, TaskCardPatch, TaskStatus,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// Oldest events are dropped past this many undrained changes.
pub const MAX_PENDING_CHANGES: usize = 512;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Id of the created or affected item.
    pub item_id: Option<String>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl ConsoleActionResponse {
    fn success(message: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            ok: true,
            item_id: Some(item_id.into()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item_id: None,
            message: message.into(),
        }
    }
}

/// Task card as rendered by a board column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTaskItem {
    pub task_id: String,
    pub title: String,
    /// Zero-based rank in the column.
    pub order: u32,
    /// `low|medium|high|urgent`.
    pub priority: String,
    pub assignee: Option<String>,
    pub client: Option<String>,
    /// ISO date (`YYYY-MM-DD`).
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumnView {
    /// Status key (`A_FAZER|EM_ANDAMENTO|EM_REVISAO|CONCLUIDO`).
    pub status: String,
    pub label: String,
    pub tasks: Vec<BoardTaskItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEntryItem {
    pub entry_id: String,
    pub title: String,
    pub order: u32,
    /// `social|email|blog|ads|meeting|other`.
    pub channel: String,
    pub client: Option<String>,
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDayView {
    pub date: String,
    pub entries: Vec<CalendarEntryItem>,
}

/// Week response envelope; `days` is empty when `ok` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarWeekResponse {
    pub ok: bool,
    pub start: String,
    pub days: Vec<CalendarDayView>,
    pub message: String,
}

/// One committed mutation of either view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleChangeEvent {
    /// `board|calendar`.
    pub view: String,
    /// `added|updated|removed|moved`.
    pub kind: String,
    pub item_id: String,
    /// Status key or date the item ended up in; `None` for updates.
    pub bucket: Option<String>,
    /// Revision of the view's store after the change.
    pub revision: u64,
}

type ChangeFeed = Arc<Mutex<VecDeque<ConsoleChangeEvent>>>;

/// One console session: a task board and an operations calendar.
///
/// Stores are shared so the host may call from several isolates; every
/// mutation is serialized inside the store.
#[flutter_rust_bridge::frb(opaque)]
pub struct OpsConsole {
    config: ConsoleConfig,
    board: Arc<SharedBucketStore<TaskCard>>,
    calendar: Arc<SharedBucketStore<CalendarEntry>>,
    changes: ChangeFeed,
}

/// Opens an empty console using the config named by `OPSCONSOLE_CONFIG`.
///
/// # FFI contract
/// - Never panics. An unreadable config is logged and defaults are used.
#[flutter_rust_bridge::frb(sync)]
pub fn console_open() -> OpsConsole {
    let config = ConsoleConfig::load().unwrap_or_else(|err| {
        warn!("event=console_open module=ffi status=config_fallback error={err}");
        ConsoleConfig::default()
    });
    OpsConsole::with_config(config)
}

/// Opens a console pre-filled with the demo board and the current week's
/// demo calendar.
#[flutter_rust_bridge::frb(sync)]
pub fn console_open_demo() -> OpsConsole {
    let console = console_open();
    let today = Local::now().date_naive();
    let week_start = console.config.calendar.week_start.week_of(today);

    if let Err(err) = demo_board_seed().load_into(&mut console.board_service()) {
        warn!("event=console_open_demo module=ffi view=board status=error error={err}");
    }
    if let Err(err) = demo_calendar_seed(week_start).load_into(&mut console.calendar_service()) {
        warn!("event=console_open_demo module=ffi view=calendar status=error error={err}");
    }
    info!(
        "event=console_open_demo module=ffi status=ok week_start={}",
        week_start
    );
    console
}

impl OpsConsole {
    fn with_config(config: ConsoleConfig) -> Self {
        let changes: ChangeFeed = Arc::new(Mutex::new(VecDeque::new()));
        let board = Arc::new(SharedBucketStore::new());
        let calendar = Arc::new(SharedBucketStore::new());

        let feed = Arc::clone(&changes);
        board.subscribe(move |change| push_change(&feed, "board", change));
        let feed = Arc::clone(&changes);
        calendar.subscribe(move |change| push_change(&feed, "calendar", change));

        Self {
            config,
            board,
            calendar,
            changes,
        }
    }

    fn board_service(&self) -> TaskBoardService<Arc<SharedBucketStore<TaskCard>>> {
        TaskBoardService::from_config(Arc::clone(&self.board), &self.config.board)
    }

    fn calendar_service(&self) -> CalendarService<Arc<SharedBucketStore<CalendarEntry>>> {
        CalendarService::from_config(Arc::clone(&self.calendar), &self.config.calendar)
    }

    /// Appends a task to the `status` column.
    #[flutter_rust_bridge::frb(sync)]
    pub fn board_create_task(&self, status: String, title: String) -> ConsoleActionResponse {
        let Some(status) = TaskStatus::from_key(&status) else {
            return ConsoleActionResponse::failure(format!("unknown status `{status}`"));
        };
        match self
            .board_service()
            .create_task(status, TaskCard::new(title))
        {
            Ok(item) => ConsoleActionResponse::success("Task created.", item.id.to_string()),
            Err(err) => ConsoleActionResponse::failure(format!("board_create_task failed: {err}")),
        }
    }

    /// Moves a task to `status`, before `before_task_id` or at the bottom.
    ///
    /// A drop onto the task itself succeeds without changing anything.
    #[flutter_rust_bridge::frb(sync)]
    pub fn board_move_task(
        &self,
        task_id: String,
        status: String,
        before_task_id: Option<String>,
    ) -> ConsoleActionResponse {
        let Some(status) = TaskStatus::from_key(&status) else {
            return ConsoleActionResponse::failure(format!("unknown status `{status}`"));
        };
        let id = ItemId::from(task_id.trim());
        let before = normalize_optional_id(before_task_id);
        match self
            .board_service()
            .move_task(&id, status, before.as_ref())
        {
            Ok(()) => ConsoleActionResponse::success("Task moved.", id.to_string()),
            Err(err) => ConsoleActionResponse::failure(format!("board_move_task failed: {err}")),
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn board_update_title(&self, task_id: String, title: String) -> ConsoleActionResponse {
        let id = ItemId::from(task_id.trim());
        match self
            .board_service()
            .update_task(&id, TaskCardPatch::title(title))
        {
            Ok(item) => ConsoleActionResponse::success("Task updated.", item.id.to_string()),
            Err(err) => {
                ConsoleActionResponse::failure(format!("board_update_title failed: {err}"))
            }
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn board_delete_task(&self, task_id: String) -> ConsoleActionResponse {
        let id = ItemId::from(task_id.trim());
        match self.board_service().delete_task(&id) {
            Ok(item) => ConsoleActionResponse::success("Task deleted.", item.id.to_string()),
            Err(err) => ConsoleActionResponse::failure(format!("board_delete_task failed: {err}")),
        }
    }

    /// Every configured column, empty ones included.
    #[flutter_rust_bridge::frb(sync)]
    pub fn board_columns(&self) -> Vec<BoardColumnView> {
        self.board_service()
            .board()
            .into_iter()
            .map(|column| BoardColumnView {
                status: column.status.as_key().to_string(),
                label: column.label.to_string(),
                tasks: column.tasks.into_iter().map(to_board_task_item).collect(),
            })
            .collect()
    }

    /// Adds an entry at the end of `date` (`YYYY-MM-DD`).
    #[flutter_rust_bridge::frb(sync)]
    pub fn calendar_schedule(
        &self,
        date: String,
        title: String,
        channel: String,
    ) -> ConsoleActionResponse {
        let Some(date) = parse_date_key(&date) else {
            return ConsoleActionResponse::failure(format!("invalid date `{date}`"));
        };
        let channel = Channel::from_key(&channel).unwrap_or_default();
        match self
            .calendar_service()
            .schedule(date, CalendarEntry::new(title, channel))
        {
            Ok(item) => ConsoleActionResponse::success("Entry scheduled.", item.id.to_string()),
            Err(err) => ConsoleActionResponse::failure(format!("calendar_schedule failed: {err}")),
        }
    }

    /// Moves an entry to `date`, before `before_entry_id` or at the end.
    #[flutter_rust_bridge::frb(sync)]
    pub fn calendar_move_entry(
        &self,
        entry_id: String,
        date: String,
        before_entry_id: Option<String>,
    ) -> ConsoleActionResponse {
        let Some(date) = parse_date_key(&date) else {
            return ConsoleActionResponse::failure(format!("invalid date `{date}`"));
        };
        let id = ItemId::from(entry_id.trim());
        let before = normalize_optional_id(before_entry_id);
        match self
            .calendar_service()
            .reschedule(&id, date, before.as_ref())
        {
            Ok(()) => ConsoleActionResponse::success("Entry moved.", id.to_string()),
            Err(err) => {
                ConsoleActionResponse::failure(format!("calendar_move_entry failed: {err}"))
            }
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn calendar_cancel_entry(&self, entry_id: String) -> ConsoleActionResponse {
        let id = ItemId::from(entry_id.trim());
        match self.calendar_service().cancel_entry(&id) {
            Ok(item) => ConsoleActionResponse::success("Entry cancelled.", item.id.to_string()),
            Err(err) => {
                ConsoleActionResponse::failure(format!("calendar_cancel_entry failed: {err}"))
            }
        }
    }

    /// The week containing `date`.
    #[flutter_rust_bridge::frb(sync)]
    pub fn calendar_week(&self, date: String) -> CalendarWeekResponse {
        let Some(date) = parse_date_key(&date) else {
            return CalendarWeekResponse {
                ok: false,
                start: String::new(),
                days: Vec::new(),
                message: format!("invalid date `{date}`"),
            };
        };
        let week = self.calendar_service().week(date);
        let entries = week.entry_count();
        CalendarWeekResponse {
            ok: true,
            start: format_date(week.start),
            days: week
                .days
                .into_iter()
                .map(|day| CalendarDayView {
                    date: format_date(day.date),
                    entries: day.entries.into_iter().map(to_calendar_entry_item).collect(),
                })
                .collect(),
            message: format!("{entries} entries"),
        }
    }

    /// Takes every change committed since the previous call, oldest first.
    #[flutter_rust_bridge::frb(sync)]
    pub fn drain_changes(&self) -> Vec<ConsoleChangeEvent> {
        self.changes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    /// Sum of both store revisions; changes whenever either view changed.
    #[flutter_rust_bridge::frb(sync)]
    pub fn revision(&self) -> u64 {
        self.board
            .revision()
            .saturating_add(self.calendar.revision())
    }
}

fn push_change(feed: &ChangeFeed, view: &str, change: &StoreChange) {
    let (kind, bucket) = match change {
        StoreChange::Added { bucket_key, .. } => ("added", Some(bucket_key.clone())),
        StoreChange::Updated { .. } => ("updated", None),
        StoreChange::Removed { bucket_key, .. } => ("removed", Some(bucket_key.clone())),
        StoreChange::Moved { to_bucket, .. } => ("moved", Some(to_bucket.clone())),
    };
    let mut pending = feed.lock().unwrap_or_else(PoisonError::into_inner);
    if pending.len() >= MAX_PENDING_CHANGES {
        pending.pop_front();
    }
    pending.push_back(ConsoleChangeEvent {
        view: view.to_string(),
        kind: kind.to_string(),
        item_id: change.item_id().to_string(),
        bucket,
        revision: change.revision(),
    });
}

fn normalize_optional_id(value: Option<String>) -> Option<ItemId> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(ItemId::from)
}

fn format_date(date: NaiveDate) -> String {
    date_key(date)
}

fn to_rank(order: usize) -> u32 {
    u32::try_from(order).unwrap_or(u32::MAX)
}

fn to_board_task_item(item: Item<TaskCard>) -> BoardTaskItem {
    BoardTaskItem {
        task_id: item.id.to_string(),
        order: to_rank(item.order),
        priority: item.payload.priority.as_key().to_string(),
        due_date: item.payload.due_date.map(format_date),
        title: item.payload.title,
        assignee: item.payload.assignee,
        client: item.payload.client,
    }
}

fn to_calendar_entry_item(item: Item<CalendarEntry>) -> CalendarEntryItem {
    CalendarEntryItem {
        entry_id: item.id.to_string(),
        order: to_rank(item.order),
        channel: item.payload.channel.as_key().to_string(),
        title: item.payload.title,
        client: item.payload.client,
        owner: item.payload.owner,
    }
}
