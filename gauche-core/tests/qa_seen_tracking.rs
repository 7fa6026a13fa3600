//! QA tests for device-local seen tracking.
//!
//! These tests verify that ideas are remembered by digest only, that marking
//! is idempotent and that storage trouble never reaches the caller.
//! Run with: `cargo test -p gauche-core --test qa_seen_tracking`

use gauche_core::{
    hash_idea_id, is_idea_hash, FailingStorage, FileStorage, KeyValueStorage, MemoryStorage,
    SeenIdeas, SEEN_IDEAS_KEY,
};
use tempfile::TempDir;

fn stored_entries(storage: &impl KeyValueStorage) -> Vec<String> {
    let raw = storage
        .get(SEEN_IDEAS_KEY)
        .expect("storage should be readable")
        .expect("seen set should be stored");
    serde_json::from_str(&raw).expect("seen set should be a JSON array")
}

// =============================================================================
// Hash determinism
// =============================================================================

#[test]
fn test_hash_is_deterministic() {
    for id in ["1", "abc", "idée-42", ""] {
        assert_eq!(hash_idea_id(id), hash_idea_id(id));
        assert!(is_idea_hash(&hash_idea_id(id)));
    }
    assert_ne!(hash_idea_id("1"), hash_idea_id("2"));
}

#[test]
fn test_hash_survives_restart() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    {
        let seen = SeenIdeas::new(FileStorage::new(temp_dir.path()));
        seen.mark_seen("persisted-idea");
    }

    // A new store over the same directory stands in for a new process
    let seen = SeenIdeas::new(FileStorage::new(temp_dir.path()));
    assert!(seen.has_seen("persisted-idea"));
    assert!(!seen.has_seen("other-idea"));
    assert_eq!(seen.seen_count(), 1);
}

// =============================================================================
// No raw identifiers on disk
// =============================================================================

#[test]
fn test_raw_id_never_persisted() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let storage = FileStorage::new(temp_dir.path());
    let seen = SeenIdeas::new(storage.clone());

    let ids = ["liberté-ZZ", "Quota-Xyz", "sécurité sociale"];
    for id in ids {
        seen.mark_seen(id);
    }

    let on_disk = std::fs::read_to_string(storage.path_for(SEEN_IDEAS_KEY))
        .expect("seen file should exist");
    for id in ids {
        assert!(!on_disk.contains(id), "raw id {id:?} leaked to disk");
    }

    let entries = stored_entries(&storage);
    assert_eq!(entries.len(), ids.len());
    for id in ids {
        assert!(entries.contains(&hash_idea_id(id)));
    }
    assert!(entries.iter().all(|e| is_idea_hash(e)));
}

// =============================================================================
// Idempotent marking
// =============================================================================

#[test]
fn test_marking_twice_keeps_one_entry() {
    let storage = MemoryStorage::new();
    let seen = SeenIdeas::new(storage.clone());

    seen.mark_seen("7");
    seen.mark_seen("7");

    let entries = stored_entries(&storage);
    assert_eq!(entries, vec![hash_idea_id("7")]);
    assert_eq!(seen.seen_count(), 1);
}

// =============================================================================
// Reset
// =============================================================================

#[test]
fn test_clear_forgets_everything() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let seen = SeenIdeas::new(FileStorage::new(temp_dir.path()));

    let ids: Vec<String> = (0..10).map(|i| format!("idea-{i}")).collect();
    for id in &ids {
        seen.mark_seen(id);
    }
    assert_eq!(seen.seen_count(), 10);

    seen.clear_seen();

    for id in &ids {
        assert!(!seen.has_seen(id));
    }
    assert!(seen.get_seen().is_empty());

    // Clearing an already empty store is harmless
    seen.clear_seen();
    assert_eq!(seen.seen_count(), 0);
}

// =============================================================================
// Storage failures
// =============================================================================

#[test]
fn test_failing_writes_do_not_panic() {
    let seen = SeenIdeas::new(FailingStorage::new());

    seen.mark_seen("1");
    seen.mark_seen("2");
    seen.clear_seen();

    assert_eq!(seen.storage().write_attempts(), 2);
    assert!(!seen.has_seen("1"));
}

#[test]
fn test_failed_write_keeps_stored_set() {
    let stored = serde_json::to_string(&vec![hash_idea_id("1")]).expect("serializable");
    let seen = SeenIdeas::new(FailingStorage::with_value(stored));

    seen.mark_seen("2");

    assert_eq!(seen.storage().write_attempts(), 1);
    assert_eq!(stored_entries(seen.storage()), vec![hash_idea_id("1")]);
    assert!(seen.has_seen("1"));
    assert!(!seen.has_seen("2"));
    assert_eq!(seen.seen_count(), 1);
}

#[test]
fn test_unreadable_storage_is_left_alone() {
    let seen = SeenIdeas::new(FailingStorage::unreadable());

    seen.mark_seen("1");

    assert_eq!(seen.storage().write_attempts(), 0);
    assert!(seen.get_seen().is_empty());
}

#[test]
fn test_malformed_set_reads_empty_and_is_replaced() {
    let storage = MemoryStorage::new();
    storage
        .set(SEEN_IDEAS_KEY, "{not json")
        .expect("memory storage accepts writes");
    let seen = SeenIdeas::new(storage.clone());

    assert!(seen.get_seen().is_empty());

    seen.mark_seen("1");
    assert_eq!(stored_entries(&storage), vec![hash_idea_id("1")]);
}

#[test]
fn test_invalid_entries_are_ignored() {
    let storage = MemoryStorage::new();
    let valid = hash_idea_id("1");
    let raw = serde_json::to_string(&vec![valid.clone(), "raw-id".to_string()])
        .expect("serializable");
    storage
        .set(SEEN_IDEAS_KEY, &raw)
        .expect("memory storage accepts writes");

    let seen = SeenIdeas::new(storage);
    let set = seen.get_seen();
    assert_eq!(set.len(), 1);
    assert!(set.contains(&valid));
}
