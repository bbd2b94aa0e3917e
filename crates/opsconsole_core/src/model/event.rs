//! Operations calendar payload model.
//!
//! Calendar entries are bucketed by their due date; the date itself lives in
//! the bucket key, not in the payload, so rescheduling is always a move.

use crate::model::item::Payload;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used for calendar bucket keys.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Formats a date as a calendar bucket key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parses a calendar bucket key. Returns `None` for anything that is not a
/// valid ISO calendar date.
pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_KEY_FORMAT).ok()
}

/// Delivery channel of a calendar entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Social,
    Email,
    Blog,
    Ads,
    Meeting,
    #[default]
    Other,
}

impl Channel {
    pub fn as_key(self) -> &'static str {
        match self {
            Self::Social => "social",
            Self::Email => "email",
            Self::Blog => "blog",
            Self::Ads => "ads",
            Self::Meeting => "meeting",
            Self::Other => "other",
        }
    }

    /// Case-insensitive inverse of `as_key`.
    pub fn from_key(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "social" => Some(Self::Social),
            "email" => Some(Self::Email),
            "blog" => Some(Self::Blog),
            "ads" => Some(Self::Ads),
            "meeting" => Some(Self::Meeting),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Calendar entry payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarEntry {
    pub title: String,
    pub client: Option<String>,
    pub channel: Channel,
    pub owner: Option<String>,
    pub notes: Option<String>,
}

impl CalendarEntry {
    pub fn new(title: impl Into<String>, channel: Channel) -> Self {
        Self {
            title: title.into(),
            channel,
            ..Self::default()
        }
    }
}

/// Partial update for a calendar entry. `Some(None)` clears a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarEntryPatch {
    pub title: Option<String>,
    pub client: Option<Option<String>>,
    pub channel: Option<Channel>,
    pub owner: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl Payload for CalendarEntry {
    type Patch = CalendarEntryPatch;

    fn apply_patch(&mut self, patch: Self::Patch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(client) = patch.client {
            self.client = client;
        }
        if let Some(channel) = patch.channel {
            self.channel = channel;
        }
        if let Some(owner) = patch.owner {
            self.owner = owner;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}
