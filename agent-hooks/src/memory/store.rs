//! Resume store trait and the in-memory implementation.

use crate::errors::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Number of hyphens in the line separating two entries of a record.
pub const RECORD_SEPARATOR_WIDTH: usize = 40;

/// Separator written between two entries of the same record.
pub static RECORD_SEPARATOR: LazyLock<String> =
    LazyLock::new(|| format!("\n\n{}\n\n", "-".repeat(RECORD_SEPARATOR_WIDTH)));

/// Append-only text persistence keyed by persistence key.
///
/// Implementations must be thread-safe (Send + Sync) as they are shared
/// between the hooks of every agent.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Appends `text` to the record for `key`, creating it if needed.
    ///
    /// A separator is inserted first when the record already has content.
    async fn save(&self, key: &str, text: &str) -> Result<()>;

    /// Returns the whole record for `key`, or an empty string if none exists.
    async fn load(&self, key: &str) -> Result<String>;

    /// Whether the store can currently be used.
    fn is_available(&self) -> bool {
        true
    }
}

/// Appends an entry to a record in the on-disk format.
pub(crate) fn append_entry(record: &mut String, text: &str) {
    if !record.is_empty() {
        record.push_str(&RECORD_SEPARATOR);
    }
    record.push_str(text);
}

/// In-memory implementation of ResumeStore.
///
/// Records are lost when the process exits. Suitable for tests and for
/// running with persistence disabled.
#[derive(Default)]
pub struct InMemoryResumeStore {
    records: RwLock<HashMap<String, String>>,
}

impl InMemoryResumeStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one record.
    pub fn with_record(key: impl Into<String>, record: impl Into<String>) -> Self {
        let store = Self::new();
        store.records.write().insert(key.into(), record.into());
        store
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl ResumeStore for InMemoryResumeStore {
    async fn save(&self, key: &str, text: &str) -> Result<()> {
        let mut records = self.records.write();
        append_entry(records.entry(key.to_string()).or_default(), text);
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<String> {
        Ok(self.records.read().get(key).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_format() {
        assert_eq!(RECORD_SEPARATOR.len(), 44);
        assert!(RECORD_SEPARATOR.starts_with("\n\n-"));
        assert!(RECORD_SEPARATOR.ends_with("-\n\n"));
    }

    #[tokio::test]
    async fn test_in_memory_append_and_load() {
        let store = InMemoryResumeStore::new();
        store.save("k", "A").await.unwrap();
        store.save("k", "B").await.unwrap();

        let expected = format!("A\n\n{}\n\nB", "-".repeat(40));
        assert_eq!(store.load("k").await.unwrap(), expected);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_missing_key() {
        let store = InMemoryResumeStore::new();
        assert_eq!(store.load("nobody").await.unwrap(), "");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_with_record() {
        let store = InMemoryResumeStore::with_record("u1", "Jane Doe, Engineer");
        assert_eq!(store.load("u1").await.unwrap(), "Jane Doe, Engineer");
        assert!(store.is_available());
    }
}
