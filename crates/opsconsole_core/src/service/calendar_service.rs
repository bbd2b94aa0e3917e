//! Weekly operations calendar view adapter.
//!
//! Entries live in one bucket per day, keyed by ISO date. Rescheduling an
//! entry, whether to another day or to another slot on the same day, is a
//! store move.

use crate::config::{CalendarConfig, WeekStart};
use crate::error::StoreError;
use crate::model::event::{date_key, parse_date_key, CalendarEntry, CalendarEntryPatch};
use crate::model::item::{Item, ItemId};
use crate::service::drag::DropRequest;
use crate::store::bucket_store::MoveTarget;
use crate::store::facade::BucketFacade;
use chrono::{Days, NaiveDate};
use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

const DAYS_PER_WEEK: u64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("calendar entry title must not be blank")]
    InvalidTitle,
    #[error("calendar entry not found: {0}")]
    EntryNotFound(ItemId),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for CalendarError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::EntryNotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Entries of one day, in render order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub entries: Vec<Item<CalendarEntry>>,
}

/// Seven consecutive day columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekView {
    pub start: NaiveDate,
    pub days: Vec<DayColumn>,
}

impl WeekView {
    pub fn entry_count(&self) -> usize {
        self.days.iter().map(|day| day.entries.len()).sum()
    }
}

/// Operations calendar over a calendar-entry bucket store.
pub struct CalendarService<S> {
    store: S,
    week_start: WeekStart,
}

impl<S: BucketFacade<CalendarEntry>> CalendarService<S> {
    pub fn new(store: S) -> Self {
        Self::with_week_start(store, WeekStart::default())
    }

    pub fn with_week_start(store: S, week_start: WeekStart) -> Self {
        Self { store, week_start }
    }

    pub fn from_config(store: S, config: &CalendarConfig) -> Self {
        Self::with_week_start(store, config.week_start)
    }

    /// Adds an entry at the end of `date`.
    pub fn schedule(
        &mut self,
        date: NaiveDate,
        mut entry: CalendarEntry,
    ) -> Result<Item<CalendarEntry>, CalendarError> {
        entry.title = normalize_title(&entry.title)?;
        Ok(self.store.add(&date_key(date), entry))
    }

    /// Like `schedule`, with a caller-chosen id (mock data).
    pub fn insert_entry(
        &mut self,
        id: ItemId,
        date: NaiveDate,
        mut entry: CalendarEntry,
    ) -> Result<Item<CalendarEntry>, CalendarError> {
        entry.title = normalize_title(&entry.title)?;
        Ok(self.store.insert(id, &date_key(date), entry)?)
    }

    /// Moves an entry to `date`, in front of `before` or at the end of the day.
    pub fn reschedule(
        &mut self,
        id: &ItemId,
        date: NaiveDate,
        before: Option<&ItemId>,
    ) -> Result<(), CalendarError> {
        let target = MoveTarget::from(before.cloned());
        Ok(self.store.move_to(id, &date_key(date), target)?)
    }

    pub fn update_entry(
        &mut self,
        id: &ItemId,
        mut patch: CalendarEntryPatch,
    ) -> Result<Item<CalendarEntry>, CalendarError> {
        if let Some(title) = patch.title.take() {
            patch.title = Some(normalize_title(&title)?);
        }
        Ok(self.store.update(id, patch)?)
    }

    pub fn cancel_entry(&mut self, id: &ItemId) -> Result<Item<CalendarEntry>, CalendarError> {
        Ok(self.store.remove(id)?)
    }

    /// Applies a finished drag gesture. Returns `false` when nothing moved.
    pub fn apply_drop(&mut self, request: &DropRequest) -> bool {
        let Some(date) = parse_date_key(&request.bucket_key) else {
            warn!(
                "event=drop_ignored module=calendar reason=invalid_date day={}",
                request.bucket_key
            );
            return false;
        };

        let before_revision = self.store.revision();
        match self.reschedule(&request.item_id, date, request.before.as_ref()) {
            Ok(()) => self.store.revision() != before_revision,
            Err(err) => {
                debug!(
                    "event=drop_ignored module=calendar reason=not_found entry={} error={}",
                    request.item_id, err
                );
                false
            }
        }
    }

    pub fn day(&self, date: NaiveDate) -> Vec<Item<CalendarEntry>> {
        self.store.query(&date_key(date))
    }

    pub fn entry(&self, id: &ItemId) -> Option<Item<CalendarEntry>> {
        self.store.get(id)
    }

    pub fn date_of(&self, id: &ItemId) -> Option<NaiveDate> {
        self.store
            .get(id)
            .and_then(|item| parse_date_key(&item.bucket_key))
    }

    /// The week containing `date`, starting on the configured week start.
    pub fn week(&self, date: NaiveDate) -> WeekView {
        let start = self.week_start.week_of(date);
        let days = (0..DAYS_PER_WEEK)
            .filter_map(|offset| start.checked_add_days(Days::new(offset)))
            .map(|day| DayColumn {
                date: day,
                entries: self.day(day),
            })
            .collect();
        WeekView { start, days }
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

fn normalize_title(value: &str) -> Result<String, CalendarError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CalendarError::InvalidTitle);
    }
    Ok(trimmed.to_string())
}
