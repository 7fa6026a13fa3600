//! Testing utilities.
//!
//! This module provides test doubles for integration testing:
//! - `MockSource` for a scripted catalog without network access
//! - `FailingStorage` for simulating quota or availability failures
//! - `sample_catalog` for quick fixtures

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::idea::{IdeaDocument, TEXT_FIELD};
use crate::source::{IdeaSource, SourceError};
use crate::storage::{KeyValueStorage, StorageError};

/// Build `count` documents with ids `"1"..="count"` and text `"Idée <id>"`.
pub fn sample_catalog(count: usize) -> Vec<IdeaDocument> {
    (1..=count)
        .map(|i| IdeaDocument::new(i.to_string()).with_field(TEXT_FIELD, format!("Idée {i}")))
        .collect()
}

#[derive(Debug, Default)]
struct MockState {
    catalog: Vec<IdeaDocument>,
    failure: Option<String>,
}

/// An idea source returning a scripted catalog.
///
/// Clones share state, so a test can keep a handle and change the catalog
/// after handing the source to a repository.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    state: Arc<Mutex<MockState>>,
    calls: Arc<AtomicUsize>,
}

impl MockSource {
    /// Create a source serving the given documents.
    pub fn new(catalog: Vec<IdeaDocument>) -> Self {
        let source = Self::default();
        source.set_catalog(catalog);
        source
    }

    /// Create a source whose every fetch fails.
    pub fn failing(reason: impl Into<String>) -> Self {
        let source = Self::default();
        source.set_failure(Some(&reason.into()));
        source
    }

    /// Replace the catalog.
    pub fn set_catalog(&self, catalog: Vec<IdeaDocument>) {
        if let Ok(mut state) = self.state.lock() {
            state.catalog = catalog;
        }
    }

    /// Make fetches fail (`Some`) or succeed again (`None`).
    pub fn set_failure(&self, reason: Option<&str>) {
        if let Ok(mut state) = self.state.lock() {
            state.failure = reason.map(str::to_string);
        }
    }

    /// Number of fetches so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdeaSource for MockSource {
    async fn fetch_all(&self) -> Result<Vec<IdeaDocument>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let state = self
            .state
            .lock()
            .map_err(|_| SourceError::Unavailable("mock state poisoned".to_string()))?;

        match &state.failure {
            Some(reason) => Err(SourceError::Unavailable(reason.clone())),
            None => Ok(state.catalog.clone()),
        }
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

/// Storage whose writes and removes always fail.
#[derive(Debug, Default)]
pub struct FailingStorage {
    stored: Option<String>,
    unreadable: bool,
    writes: AtomicUsize,
}

impl FailingStorage {
    /// Reads find nothing; writes fail with `QuotaExceeded`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads return `raw`; writes fail.
    pub fn with_value(raw: impl Into<String>) -> Self {
        Self {
            stored: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Reads fail as well.
    pub fn unreadable() -> Self {
        Self {
            unreadable: true,
            ..Self::default()
        }
    }

    /// Number of attempted `set` calls.
    pub fn write_attempts(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStorage for FailingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        if self.unreadable {
            return Err(StorageError::Unavailable("storage disabled".to_string()));
        }
        Ok(self.stored.clone())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::QuotaExceeded)
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }
}
