//! Task board payload model.
//!
//! # Responsibility
//! - Define status columns used as task board bucket keys.
//! - Define the task card payload and its partial-update shape.
//!
//! # Invariants
//! - `TaskStatus::as_key()` and `TaskStatus::from_key()` round-trip.
//! - Bucket keys use the persisted status names (`A_FAZER`, ...).

use crate::model::item::Payload;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kanban column a task sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Not started.
    #[serde(rename = "A_FAZER")]
    Todo,
    /// Someone is working on it.
    #[serde(rename = "EM_ANDAMENTO")]
    InProgress,
    /// Waiting for client or lead review.
    #[serde(rename = "EM_REVISAO")]
    Review,
    /// Delivered.
    #[serde(rename = "CONCLUIDO")]
    Done,
}

impl TaskStatus {
    /// Every status in default board order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];

    /// Bucket key used by the board store.
    pub fn as_key(self) -> &'static str {
        match self {
            Self::Todo => "A_FAZER",
            Self::InProgress => "EM_ANDAMENTO",
            Self::Review => "EM_REVISAO",
            Self::Done => "CONCLUIDO",
        }
    }

    /// Parses a bucket key back into a status. Accepts surrounding whitespace
    /// and lowercase input from CLI callers.
    pub fn from_key(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A_FAZER" => Some(Self::Todo),
            "EM_ANDAMENTO" => Some(Self::InProgress),
            "EM_REVISAO" => Some(Self::Review),
            "CONCLUIDO" => Some(Self::Done),
            _ => None,
        }
    }

    /// Column header shown by the board view.
    pub fn label(self) -> &'static str {
        match self {
            Self::Todo => "To do",
            Self::InProgress => "In progress",
            Self::Review => "In review",
            Self::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn as_key(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// Task card payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskCard {
    pub title: String,
    pub description: Option<String>,
    /// Team member responsible for the task.
    pub assignee: Option<String>,
    /// Client account the task belongs to.
    pub client: Option<String>,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub tags: Vec<String>,
}

impl TaskCard {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update for a task card.
///
/// Outer `None` leaves a field untouched; `Some(None)` clears an optional
/// field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskCardPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub assignee: Option<Option<String>>,
    pub client: Option<Option<String>>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub tags: Option<Vec<String>>,
}

impl TaskCardPatch {
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: Some(value.into()),
            ..Self::default()
        }
    }
}

impl Payload for TaskCard {
    type Patch = TaskCardPatch;

    fn apply_patch(&mut self, patch: Self::Patch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(assignee) = patch.assignee {
            self.assignee = assignee;
        }
        if let Some(client) = patch.client {
            self.client = client;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskCard, TaskCardPatch, TaskPriority, TaskStatus};
    use crate::model::item::Payload;

    #[test]
    fn status_keys_round_trip() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::from_key(status.as_key()), Some(status));
        }
        assert_eq!(TaskStatus::from_key(" concluido "), Some(TaskStatus::Done));
        assert_eq!(TaskStatus::from_key("DONE"), None);
    }

    #[test]
    fn status_serializes_with_bucket_key_names() {
        let encoded = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(encoded, "\"EM_ANDAMENTO\"");
    }

    #[test]
    fn patch_only_touches_provided_fields() {
        let mut card = TaskCard::new("Draft newsletter");
        card.assignee = Some("rita".to_string());
        card.client = Some("Acme".to_string());

        card.apply_patch(TaskCardPatch {
            priority: Some(TaskPriority::Urgent),
            client: Some(None),
            ..TaskCardPatch::default()
        });

        assert_eq!(card.title, "Draft newsletter");
        assert_eq!(card.assignee.as_deref(), Some("rita"));
        assert_eq!(card.client, None);
        assert_eq!(card.priority, TaskPriority::Urgent);
    }
}
