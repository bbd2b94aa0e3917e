//! Task board view adapter.
//!
//! # Responsibility
//! - Map task statuses to bucket keys and columns to ordered task lists.
//! - Translate card drops into store moves.
//!
//! # Invariants
//! - Any status is a legal drop target; no transition rules are enforced.
//! - Task titles are stored trimmed and never blank.
//! - A drop that references a missing task is a silent no-op.

use crate::config::BoardConfig;
use crate::error::StoreError;
use crate::model::item::{Item, ItemId};
use crate::model::task::{TaskCard, TaskCardPatch, TaskStatus};
use crate::service::drag::DropRequest;
use crate::store::bucket_store::MoveTarget;
use crate::store::facade::BucketFacade;
use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("task title must not be blank")]
    InvalidTitle,
    #[error("task not found: {0}")]
    TaskNotFound(ItemId),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for BoardError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::TaskNotFound(id),
            other => Self::Store(other),
        }
    }
}

/// One rendered board column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardColumn {
    pub status: TaskStatus,
    pub label: &'static str,
    pub tasks: Vec<Item<TaskCard>>,
}

/// Kanban board over a task-card bucket store.
pub struct TaskBoardService<S> {
    store: S,
    columns: Vec<TaskStatus>,
}

impl<S: BucketFacade<TaskCard>> TaskBoardService<S> {
    /// Board showing every status in default order.
    pub fn new(store: S) -> Self {
        Self::with_columns(store, TaskStatus::ALL.to_vec())
    }

    pub fn with_columns(store: S, columns: Vec<TaskStatus>) -> Self {
        Self { store, columns }
    }

    pub fn from_config(store: S, config: &BoardConfig) -> Self {
        Self::with_columns(store, config.columns.clone())
    }

    /// Appends a new card to the `status` column.
    pub fn create_task(
        &mut self,
        status: TaskStatus,
        mut card: TaskCard,
    ) -> Result<Item<TaskCard>, BoardError> {
        card.title = normalize_title(&card.title)?;
        Ok(self.store.add(status.as_key(), card))
    }

    /// Like `create_task`, with a caller-chosen id (mock data).
    pub fn insert_task(
        &mut self,
        id: ItemId,
        status: TaskStatus,
        mut card: TaskCard,
    ) -> Result<Item<TaskCard>, BoardError> {
        card.title = normalize_title(&card.title)?;
        Ok(self.store.insert(id, status.as_key(), card)?)
    }

    pub fn update_task(
        &mut self,
        id: &ItemId,
        mut patch: TaskCardPatch,
    ) -> Result<Item<TaskCard>, BoardError> {
        if let Some(title) = patch.title.take() {
            patch.title = Some(normalize_title(&title)?);
        }
        Ok(self.store.update(id, patch)?)
    }

    pub fn delete_task(&mut self, id: &ItemId) -> Result<Item<TaskCard>, BoardError> {
        Ok(self.store.remove(id)?)
    }

    /// Moves a card to `status`, in front of `before` or at the bottom.
    ///
    /// Dropping a card onto itself leaves the board untouched.
    pub fn move_task(
        &mut self,
        id: &ItemId,
        status: TaskStatus,
        before: Option<&ItemId>,
    ) -> Result<(), BoardError> {
        if before == Some(id) {
            return match self.store.get(id) {
                Some(_) => Ok(()),
                None => Err(BoardError::TaskNotFound(id.clone())),
            };
        }
        let target = MoveTarget::from(before.cloned());
        Ok(self.store.move_to(id, status.as_key(), target)?)
    }

    /// Applies a finished drag gesture.
    ///
    /// Returns `false` when the drop changed nothing: unknown column key, self
    /// drop, a drop back into the same slot, or a task id that is no longer
    /// on the board.
    pub fn apply_drop(&mut self, request: &DropRequest) -> bool {
        let Some(status) = TaskStatus::from_key(&request.bucket_key) else {
            warn!(
                "event=drop_ignored module=board reason=unknown_column column={}",
                request.bucket_key
            );
            return false;
        };
        if request.is_self_drop() {
            return false;
        }

        let before_revision = self.store.revision();
        match self.move_task(&request.item_id, status, request.before.as_ref()) {
            Ok(()) => self.store.revision() != before_revision,
            Err(err) => {
                debug!(
                    "event=drop_ignored module=board reason=not_found task={} error={}",
                    request.item_id, err
                );
                false
            }
        }
    }

    /// Ordered cards of one column.
    pub fn column(&self, status: TaskStatus) -> Vec<Item<TaskCard>> {
        self.store.query(status.as_key())
    }

    pub fn task(&self, id: &ItemId) -> Option<Item<TaskCard>> {
        self.store.get(id)
    }

    pub fn status_of(&self, id: &ItemId) -> Option<TaskStatus> {
        self.store
            .get(id)
            .and_then(|item| TaskStatus::from_key(&item.bucket_key))
    }

    /// Every configured column in order, empty ones included.
    pub fn board(&self) -> Vec<BoardColumn> {
        self.columns
            .iter()
            .map(|status| BoardColumn {
                status: *status,
                label: status.label(),
                tasks: self.column(*status),
            })
            .collect()
    }

    pub fn columns(&self) -> &[TaskStatus] {
        &self.columns
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

fn normalize_title(value: &str) -> Result<String, BoardError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BoardError::InvalidTitle);
    }
    Ok(trimmed.to_string())
}
