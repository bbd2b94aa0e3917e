use opsconsole_core::{BucketStore, ItemId, MoveTarget, StoreChange, StoreError};
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};

type JsonStore = BucketStore<Map<String, Value>>;

fn payload(title: &str) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("title".to_string(), json!(title));
    map
}

fn store_with(bucket: &str, names: &[&str]) -> JsonStore {
    let mut store = JsonStore::new();
    fill(&mut store, bucket, names);
    store
}

fn fill(store: &mut JsonStore, bucket: &str, names: &[&str]) {
    for name in names {
        store
            .insert(ItemId::from(*name), bucket, payload(name))
            .unwrap();
    }
}

fn ranks(store: &JsonStore, bucket: &str) -> Vec<(String, usize)> {
    store
        .query(bucket)
        .into_iter()
        .map(|item| (item.id.to_string(), item.order))
        .collect()
}

fn ranked(names: &[&str]) -> Vec<(String, usize)> {
    names
        .iter()
        .enumerate()
        .map(|(order, name)| (name.to_string(), order))
        .collect()
}

#[test]
fn move_before_earlier_item_in_same_day() {
    let mut store = store_with("2024-06-01", &["X", "Y", "Z"]);

    store
        .move_to(
            &ItemId::from("Z"),
            "2024-06-01",
            MoveTarget::Before(ItemId::from("Y")),
        )
        .unwrap();

    assert_eq!(ranks(&store, "2024-06-01"), ranked(&["X", "Z", "Y"]));
    store.verify().unwrap();
}

#[test]
fn move_to_other_column_appends_and_closes_gap() {
    let mut store = store_with("A_FAZER", &["T1", "T2"]);
    fill(&mut store, "CONCLUIDO", &["T3"]);

    store
        .move_to(&ItemId::from("T1"), "CONCLUIDO", MoveTarget::End)
        .unwrap();

    assert_eq!(ranks(&store, "A_FAZER"), ranked(&["T2"]));
    assert_eq!(ranks(&store, "CONCLUIDO"), ranked(&["T3", "T1"]));

    store.remove(&ItemId::from("T2")).unwrap();
    assert!(store.query("A_FAZER").is_empty());
    assert_eq!(store.bucket_len("A_FAZER"), 0);
    assert!(!store.bucket_keys().contains(&"A_FAZER".to_string()));
    store.verify().unwrap();
}

#[test]
fn moving_unknown_id_is_not_found_and_changes_nothing() {
    let mut store = store_with("A", &["a1", "a2"]);
    fill(&mut store, "B", &["b1"]);
    let before = store.snapshot();

    let err = store
        .move_to(&ItemId::from("ghost-id"), "X", MoveTarget::End)
        .unwrap_err();

    assert_eq!(err, StoreError::NotFound(ItemId::from("ghost-id")));
    assert_eq!(store.snapshot(), before);
    assert!(store.query("X").is_empty());
}

#[test]
fn self_drop_keeps_bucket_order() {
    let mut store = store_with("col", &["A", "B"]);
    let revision = store.revision();

    store
        .move_to(&ItemId::from("A"), "col", MoveTarget::Before(ItemId::from("A")))
        .unwrap();

    assert_eq!(ranks(&store, "col"), ranked(&["A", "B"]));
    assert_eq!(store.revision(), revision);
}

#[test]
fn moving_later_in_same_bucket_lands_before_target() {
    let mut store = store_with("col", &["A", "B", "C", "D"]);

    store
        .move_to(&ItemId::from("A"), "col", MoveTarget::Before(ItemId::from("D")))
        .unwrap();

    assert_eq!(ranks(&store, "col"), ranked(&["B", "C", "A", "D"]));
}

#[test]
fn moving_last_item_to_end_of_own_bucket_is_noop() {
    let mut store = store_with("col", &["A", "B"]);
    let before = store.snapshot();

    store
        .move_to(&ItemId::from("B"), "col", MoveTarget::End)
        .unwrap();

    assert_eq!(store.snapshot(), before);
}

#[test]
fn moving_only_item_empties_source_bucket() {
    let mut store = store_with("2024-06-03", &["solo"]);

    store
        .move_to(&ItemId::from("solo"), "2024-06-04", MoveTarget::End)
        .unwrap();

    assert!(store.query("2024-06-03").is_empty());
    assert_eq!(ranks(&store, "2024-06-04"), ranked(&["solo"]));
    assert_eq!(store.bucket_keys(), vec!["2024-06-04".to_string()]);
}

#[test]
fn target_missing_from_destination_falls_back_to_append() {
    let mut store = store_with("A", &["a1", "a2"]);
    fill(&mut store, "B", &["b1", "b2"]);

    store
        .move_to(
            &ItemId::from("a1"),
            "B",
            MoveTarget::Before(ItemId::from("a2")),
        )
        .unwrap();
    assert_eq!(ranks(&store, "B"), ranked(&["b1", "b2", "a1"]));

    store
        .move_to(
            &ItemId::from("b1"),
            "B",
            MoveTarget::Before(ItemId::from("never-added")),
        )
        .unwrap();
    assert_eq!(ranks(&store, "B"), ranked(&["b2", "a1", "b1"]));
}

#[test]
fn move_to_empty_bucket_lands_at_rank_zero() {
    let mut store = store_with("A", &["a1"]);

    store
        .move_to(&ItemId::from("a1"), "B", MoveTarget::Index(7))
        .unwrap();

    assert_eq!(ranks(&store, "B"), ranked(&["a1"]));
}

#[test]
fn move_away_and_back_restores_both_buckets() {
    let mut store = store_with("A", &["a1", "a2", "a3"]);
    fill(&mut store, "B", &["b1", "b2"]);
    let original_a = ranks(&store, "A");
    let original_b = ranks(&store, "B");

    store
        .move_to(
            &ItemId::from("a2"),
            "B",
            MoveTarget::Before(ItemId::from("b2")),
        )
        .unwrap();
    assert_eq!(ranks(&store, "B"), ranked(&["b1", "a2", "b2"]));

    store
        .move_to(
            &ItemId::from("a2"),
            "A",
            MoveTarget::Before(ItemId::from("a3")),
        )
        .unwrap();

    assert_eq!(ranks(&store, "A"), original_a);
    assert_eq!(ranks(&store, "B"), original_b);
}

#[test]
fn add_then_remove_restores_other_items() {
    let mut store = store_with("A", &["a1", "a2"]);
    fill(&mut store, "B", &["b1"]);
    let before = store.snapshot();

    let added = store.add("A", payload("temp"));
    assert_eq!(added.order, 2);
    store.remove(&added.id).unwrap();

    let after = store.snapshot();
    for key in ["A", "B"] {
        assert_eq!(after.query(key), before.query(key));
    }
}

#[test]
fn query_is_repeatable_and_detached() {
    let mut store = store_with("A", &["a1", "a2"]);

    let first = store.query("A");
    let second = store.query("A");
    assert_eq!(first, second);
    assert!(store.query("unknown").is_empty());

    store.remove(&ItemId::from("a1")).unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first[1].order, 1);
}

#[test]
fn update_merges_payload_without_moving() {
    let mut store = store_with("A", &["a1", "a2"]);
    let mut patch = Map::new();
    patch.insert("owner".to_string(), json!("dana"));
    patch.insert("title".to_string(), Value::Null);

    let updated = store.update(&ItemId::from("a2"), patch).unwrap();

    assert_eq!(updated.order, 1);
    assert_eq!(updated.bucket_key, "A");
    assert_eq!(updated.payload.get("owner"), Some(&json!("dana")));
    assert!(!updated.payload.contains_key("title"));

    let err = store.update(&ItemId::from("nope"), Map::new()).unwrap_err();
    assert_eq!(err, StoreError::NotFound(ItemId::from("nope")));
}

#[test]
fn remove_unknown_id_reports_not_found() {
    let mut store = store_with("A", &["a1"]);
    let revision = store.revision();

    let err = store.remove(&ItemId::from("missing")).unwrap_err();

    assert_eq!(err, StoreError::NotFound(ItemId::from("missing")));
    assert_eq!(store.revision(), revision);
    assert_eq!(store.len(), 1);
}

#[test]
fn listeners_hear_every_committed_mutation_in_order() {
    let mut store = store_with("A", &["a1", "a2"]);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let listener = store.subscribe(move |change| sink.lock().unwrap().push(change.clone()));

    store
        .move_to(&ItemId::from("a2"), "A", MoveTarget::Index(0))
        .unwrap();
    store
        .move_to(&ItemId::from("a2"), "A", MoveTarget::Index(0))
        .unwrap();
    let _ = store.remove(&ItemId::from("ghost"));
    store.remove(&ItemId::from("a1")).unwrap();

    let seen_now = seen.lock().unwrap().clone();
    assert_eq!(seen_now.len(), 2);
    assert_eq!(
        seen_now[0],
        StoreChange::Moved {
            id: ItemId::from("a2"),
            from_bucket: "A".to_string(),
            from_order: 1,
            to_bucket: "A".to_string(),
            to_order: 0,
            revision: 3,
        }
    );
    assert_eq!(
        seen_now[1],
        StoreChange::Removed {
            id: ItemId::from("a1"),
            bucket_key: "A".to_string(),
            order: 1,
            revision: 4,
        }
    );

    assert!(store.unsubscribe(listener));
    store.add("A", payload("late"));
    assert_eq!(seen.lock().unwrap().len(), 2);
}
