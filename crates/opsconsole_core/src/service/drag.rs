//! Drag gesture state shared by the board and calendar views.
//!
//! A gesture either finishes with exactly one `DropRequest` or is abandoned
//! without producing anything.

use crate::model::item::ItemId;
use crate::store::bucket_store::MoveTarget;
use serde::{Deserialize, Serialize};

/// Where the pointer was released: a bucket and optionally the card under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    pub bucket_key: String,
    /// Card the dragged item should land in front of. `None` appends.
    pub before: Option<ItemId>,
}

impl DropTarget {
    pub fn append(bucket_key: impl Into<String>) -> Self {
        Self {
            bucket_key: bucket_key.into(),
            before: None,
        }
    }

    pub fn before(bucket_key: impl Into<String>, item: ItemId) -> Self {
        Self {
            bucket_key: bucket_key.into(),
            before: Some(item),
        }
    }
}

/// Completed gesture, ready to be applied by a view adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropRequest {
    pub item_id: ItemId,
    pub bucket_key: String,
    pub before: Option<ItemId>,
}

impl DropRequest {
    /// Dropped onto its own card.
    pub fn is_self_drop(&self) -> bool {
        self.before.as_ref() == Some(&self.item_id)
    }

    pub fn move_target(&self) -> MoveTarget {
        MoveTarget::from(self.before.clone())
    }
}

/// In-flight drag gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragSession {
    dragged: Option<ItemId>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts dragging `item`. A drag that was still in flight is dropped.
    pub fn start(&mut self, item: ItemId) {
        self.dragged = Some(item);
    }

    pub fn dragged(&self) -> Option<&ItemId> {
        self.dragged.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.dragged.is_some()
    }

    /// Abandons the gesture.
    pub fn cancel(&mut self) {
        self.dragged = None;
    }

    /// Ends the gesture on `target`. Returns `None` if nothing was dragged.
    pub fn finish(&mut self, target: DropTarget) -> Option<DropRequest> {
        let item_id = self.dragged.take()?;
        Some(DropRequest {
            item_id,
            bucket_key: target.bucket_key,
            before: target.before,
        })
    }
}
