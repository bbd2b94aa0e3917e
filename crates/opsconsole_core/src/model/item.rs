//! Item record shared by every bucket store instantiation.
//!
//! # Responsibility
//! - Define the canonical `Item` shape (`id`, `bucket_key`, `order`, payload).
//! - Define how caller payloads accept partial updates.
//!
//! # Invariants
//! - `id` is unique across all buckets of one store.
//! - `order` is a dense zero-based rank inside `bucket_key` only.
//! - Payload patches never touch `bucket_key` or `order`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable item identifier.
///
/// Ids are plain strings so drag payloads from the host UI and mock data
/// fixtures can use their own naming. Generated ids are UUIDv4 strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wraps an existing id string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Creates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Caller-owned data carried by an item.
///
/// `Patch` is the partial-update shape accepted by `update`; applying it must
/// only merge fields into the payload.
pub trait Payload: Clone {
    /// Partial update accepted by the store `update` operation.
    type Patch;

    /// Merges `patch` into this payload.
    fn apply_patch(&mut self, patch: Self::Patch);
}

/// Dynamic payload: shallow key merge, `null` removes a key.
impl Payload for Map<String, Value> {
    type Patch = Map<String, Value>;

    fn apply_patch(&mut self, patch: Self::Patch) {
        for (key, value) in patch {
            if value.is_null() {
                self.remove(&key);
            } else {
                self.insert(key, value);
            }
        }
    }
}

/// One record in a bucket store.
///
/// Values handed out by the store are detached copies; editing them has no
/// effect on the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item<P> {
    /// Globally unique id.
    pub id: ItemId,
    /// Bucket membership (calendar date or task status).
    pub bucket_key: String,
    /// Dense zero-based rank inside `bucket_key`.
    pub order: usize,
    /// Caller fields.
    pub payload: P,
}

#[cfg(test)]
mod tests {
    use super::{ItemId, Payload};
    use serde_json::{json, Map, Value};

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(ItemId::generate(), ItemId::generate());
    }

    #[test]
    fn item_id_serializes_as_plain_string() {
        let encoded = serde_json::to_string(&ItemId::from("T1")).unwrap();
        assert_eq!(encoded, "\"T1\"");
    }

    #[test]
    fn json_payload_merges_and_removes_keys() {
        let mut payload: Map<String, Value> = json!({"title": "Post", "client": "Acme"})
            .as_object()
            .cloned()
            .unwrap();
        let patch = json!({"title": "Reel", "client": null, "channel": "social"})
            .as_object()
            .cloned()
            .unwrap();

        payload.apply_patch(patch);

        assert_eq!(payload.get("title"), Some(&json!("Reel")));
        assert_eq!(payload.get("channel"), Some(&json!("social")));
        assert!(!payload.contains_key("client"));
    }
}
