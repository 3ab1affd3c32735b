use chrono::TimeZone;

use super::*;

fn new_msg(name: &str) -> NewMessageRecord {
    NewMessageRecord {
        name: name.to_string(),
        message: format!("hello from {name}"),
        sender_ip: "203.0.113.7".to_string(),
        user_agent: "test-agent".to_string(),
    }
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

#[test]
fn list_is_newest_first_and_paginated() {
    let mut store = MemoryMessageStore::new();
    for i in 0..25 {
        store.insert_at(new_msg(&format!("n{i}")), at(i));
    }

    let first = store.list(0, 10).unwrap();
    assert_eq!(first.len(), 10);
    assert_eq!(first[0].name, "n24");
    assert_eq!(first[9].name, "n15");

    let last = store.list(2, 10).unwrap();
    assert_eq!(last.len(), 5);
    assert_eq!(last[4].name, "n0");

    assert!(store.list(3, 10).unwrap().is_empty());
    assert!(store.list(0, 0).is_err());
}

#[test]
fn equal_timestamps_fall_back_to_id_order() {
    let mut store = MemoryMessageStore::new();
    store.insert_at(new_msg("a"), at(0));
    store.insert_at(new_msg("b"), at(0));
    let names: Vec<_> = store.list(0, 10).unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn deleted_messages_are_hidden_and_not_counted() {
    let mut store = MemoryMessageStore::new();
    let a = store.insert(new_msg("a")).unwrap();
    store.insert(new_msg("b")).unwrap();
    assert_eq!(store.count().unwrap(), 2);

    store.delete(a.id).unwrap();
    assert_eq!(store.count().unwrap(), 1);
    assert!(store.list(0, 10).unwrap().iter().all(|r| r.id != a.id));
    assert!(matches!(store.delete(a.id), Err(TwibbonError::NotFound(_))));
}

#[test]
fn json_snapshot_round_trip_keeps_ids_moving_forward() {
    let dir = std::path::PathBuf::from("target").join("message_store");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("messages.json");

    let mut store = MemoryMessageStore::new();
    store.insert_at(new_msg("a"), at(1));
    store.insert_at(new_msg("b"), at(2));
    store.save_json(&path).unwrap();

    let mut loaded = MemoryMessageStore::load_json(&path).unwrap();
    assert_eq!(loaded.count().unwrap(), 2);
    let c = loaded.insert(new_msg("c")).unwrap();
    assert_eq!(c.id, 3);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("2023-11-14T22:13:21Z"));
}
