//! The seen-ideas store.
//!
//! Keeps the set of hashed idea ids already shown on this device under a
//! single storage key, as a JSON array. Every operation is best effort:
//! storage problems are logged and never reach the caller.

use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::hashing::{hash_idea_id, is_idea_hash};
use crate::storage::{KeyValueStorage, StorageError};

/// Storage key holding the seen set.
pub const SEEN_IDEAS_KEY: &str = "gauche-ou-droite-seen-ideas";

/// Why the stored set could not be loaded.
#[derive(Debug, Error)]
enum LoadError {
    #[error("storage read failed: {0}")]
    Storage(#[from] StorageError),

    #[error("malformed seen set: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Device-local set of hashed idea ids.
#[derive(Debug, Clone)]
pub struct SeenIdeas<K> {
    storage: K,
}

impl<K: KeyValueStorage> SeenIdeas<K> {
    pub fn new(storage: K) -> Self {
        Self { storage }
    }

    /// Access the underlying storage.
    pub fn storage(&self) -> &K {
        &self.storage
    }

    /// Read the seen set. Missing, unreadable or malformed data yields an empty set.
    pub fn get_seen(&self) -> BTreeSet<String> {
        match self.load() {
            Ok(seen) => seen,
            Err(e) => {
                warn!("Failed to read seen ideas, starting empty: {e}");
                BTreeSet::new()
            }
        }
    }

    /// Record an idea as seen and persist the whole set.
    pub fn mark_seen(&self, idea_id: &str) {
        let mut seen = match self.load() {
            Ok(seen) => seen,
            // Overwrite garbage with a fresh set
            Err(LoadError::Malformed(e)) => {
                warn!("Replacing malformed seen ideas: {e}");
                BTreeSet::new()
            }
            // Writing now would clobber a set we could not read
            Err(LoadError::Storage(e)) => {
                error!("Failed to save seen ideas: {e}");
                return;
            }
        };

        if !seen.insert(hash_idea_id(idea_id)) {
            return;
        }

        if let Err(e) = self.store(&seen) {
            error!("Failed to save seen ideas: {e}");
        }
    }

    /// Whether an idea has been seen on this device.
    pub fn has_seen(&self, idea_id: &str) -> bool {
        self.get_seen().contains(&hash_idea_id(idea_id))
    }

    /// Forget every seen idea.
    pub fn clear_seen(&self) {
        if let Err(e) = self.storage.remove(SEEN_IDEAS_KEY) {
            error!("Failed to clear seen ideas: {e}");
        }
    }

    /// Number of ideas seen so far.
    pub fn seen_count(&self) -> usize {
        self.get_seen().len()
    }

    fn load(&self) -> Result<BTreeSet<String>, LoadError> {
        let Some(raw) = self.storage.get(SEEN_IDEAS_KEY)? else {
            return Ok(BTreeSet::new());
        };

        let entries: Vec<String> = serde_json::from_str(&raw)?;
        let total = entries.len();
        let seen: BTreeSet<String> = entries.into_iter().filter(|h| is_idea_hash(h)).collect();

        if seen.len() < total {
            debug!(dropped = total - seen.len(), "Ignoring invalid seen entries");
        }

        Ok(seen)
    }

    fn store(&self, seen: &BTreeSet<String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string(seen)
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        self.storage.set(SEEN_IDEAS_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::testing::FailingStorage;

    fn store() -> (SeenIdeas<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::new();
        (SeenIdeas::new(storage.clone()), storage)
    }

    #[test]
    fn test_empty_by_default() {
        let (seen, _) = store();
        assert!(seen.get_seen().is_empty());
        assert!(!seen.has_seen("1"));
        assert_eq!(seen.seen_count(), 0);
    }

    #[test]
    fn test_mark_and_check() {
        let (seen, _) = store();
        seen.mark_seen("1");
        assert!(seen.has_seen("1"));
        assert!(!seen.has_seen("2"));
        assert_eq!(seen.seen_count(), 1);
    }

    #[test]
    fn test_persisted_as_json_array_of_hashes() {
        let (seen, storage) = store();
        seen.mark_seen("idea-1");

        let raw = storage.get(SEEN_IDEAS_KEY).unwrap().unwrap();
        let parsed: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, vec![hash_idea_id("idea-1")]);
        assert!(!raw.contains("idea-1"));
    }

    #[test]
    fn test_malformed_reads_as_empty_and_is_replaced() {
        let (seen, storage) = store();
        storage.set(SEEN_IDEAS_KEY, "{not json").unwrap();
        assert!(seen.get_seen().is_empty());

        seen.mark_seen("1");
        assert!(seen.has_seen("1"));
        assert_eq!(seen.seen_count(), 1);
    }

    #[test]
    fn test_invalid_entries_dropped() {
        let (seen, storage) = store();
        let valid = hash_idea_id("1");
        storage
            .set(SEEN_IDEAS_KEY, &format!("[\"{valid}\", \"raw-id\", \"\"]"))
            .unwrap();

        let set = seen.get_seen();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&valid));
    }

    #[test]
    fn test_clear() {
        let (seen, storage) = store();
        seen.mark_seen("1");
        seen.clear_seen();
        assert!(!seen.has_seen("1"));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_failing_storage_never_panics() {
        let seen = SeenIdeas::new(FailingStorage::new());
        seen.mark_seen("1");
        seen.clear_seen();
        assert!(!seen.has_seen("1"));
    }

    #[test]
    fn test_unreadable_storage_does_not_clobber() {
        let seen = SeenIdeas::new(FailingStorage::unreadable());
        seen.mark_seen("1");
        assert_eq!(seen.storage().write_attempts(), 0);
    }
}
