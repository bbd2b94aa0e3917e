//! Change notification for bucket stores.
//!
//! Views subscribe once and re-render whenever a listener fires. Listeners
//! run synchronously, in subscription order, after the mutation is fully
//! applied; they must not call back into the store that notifies them.

use crate::model::item::ItemId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

/// Handle returned by `subscribe`, used to unsubscribe.
pub type ListenerId = u64;

/// Committed mutation, as seen by subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreChange {
    Added {
        id: ItemId,
        bucket_key: String,
        order: usize,
        revision: u64,
    },
    Updated {
        id: ItemId,
        revision: u64,
    },
    Removed {
        id: ItemId,
        bucket_key: String,
        order: usize,
        revision: u64,
    },
    Moved {
        id: ItemId,
        from_bucket: String,
        from_order: usize,
        to_bucket: String,
        to_order: usize,
        revision: u64,
    },
}

impl StoreChange {
    /// Store revision after this change was applied.
    pub fn revision(&self) -> u64 {
        match self {
            Self::Added { revision, .. }
            | Self::Updated { revision, .. }
            | Self::Removed { revision, .. }
            | Self::Moved { revision, .. } => *revision,
        }
    }

    pub fn item_id(&self) -> &ItemId {
        match self {
            Self::Added { id, .. }
            | Self::Updated { id, .. }
            | Self::Removed { id, .. }
            | Self::Moved { id, .. } => id,
        }
    }
}

type Listener = Box<dyn FnMut(&StoreChange) + Send>;

/// Ordered listener registry.
pub struct ChangeNotifier {
    next_id: ListenerId,
    listeners: BTreeMap<ListenerId, Listener>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            listeners: BTreeMap::new(),
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&StoreChange) + Send + 'static,
    {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        self.listeners.insert(id, Box::new(listener));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn emit(&mut self, change: &StoreChange) {
        for listener in self.listeners.values_mut() {
            listener(change);
        }
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for ChangeNotifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeNotifier, StoreChange};
    use crate::model::item::ItemId;
    use std::sync::{Arc, Mutex};

    fn updated(revision: u64) -> StoreChange {
        StoreChange::Updated {
            id: ItemId::from("a"),
            revision,
        }
    }

    #[test]
    fn listeners_fire_in_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = ChangeNotifier::new();
        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            notifier.subscribe(move |change| {
                seen.lock().unwrap().push((tag, change.revision()));
            });
        }

        notifier.emit(&updated(7));

        assert_eq!(*seen.lock().unwrap(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Arc::new(Mutex::new(0));
        let mut notifier = ChangeNotifier::new();
        let counter = Arc::clone(&count);
        let id = notifier.subscribe(move |_| *counter.lock().unwrap() += 1);

        notifier.emit(&updated(1));
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.emit(&updated(2));

        assert_eq!(*count.lock().unwrap(), 1);
        assert!(notifier.is_empty());
    }

    #[test]
    fn change_serializes_with_kind_tag() {
        let value = serde_json::to_value(updated(3)).unwrap();
        assert_eq!(value["kind"], "updated");
        assert_eq!(value["id"], "a");
    }
}
