//! File-backed resume store.
//!
//! Each persistence key maps to `{root}/{escaped_key}.txt` holding the raw
//! record text. Keys are percent-encoded before they touch the filesystem,
//! so `../x` or `a/b` can never leave the root and two distinct keys never
//! share a file. Encoded keys too long for a file name are shortened to a
//! prefix plus the SHA-256 of the full key.

use super::store::{RECORD_SEPARATOR, ResumeStore};
use crate::errors::{HookError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Extension of record files.
const RECORD_EXTENSION: &str = "txt";

/// Longest encoded key used verbatim as a file stem.
const MAX_STEM_LEN: usize = 200;

/// Encoded bytes kept in front of the digest of a shortened stem.
const SHORTENED_PREFIX_LEN: usize = 120;

/// Durable resume store writing one text file per key.
pub struct FileResumeStore {
    root: PathBuf,
    /// Serializes appends to the same key within this process
    write_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl FileResumeStore {
    /// Creates a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            write_locks: DashMap::new(),
        })
    }

    /// Directory holding the record files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record file for a key.
    pub fn record_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            return Err(HookError::invalid_key(key));
        }
        Ok(self
            .root
            .join(format!("{}.{RECORD_EXTENSION}", escape_key(key))))
    }

    fn write_lock(&self, key: &str) -> Arc<Mutex<()>> {
        self.write_locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[async_trait]
impl ResumeStore for FileResumeStore {
    async fn save(&self, key: &str, text: &str) -> Result<()> {
        let path = self.record_path(key)?;
        let lock = self.write_lock(key);
        let result = {
            let _guard = lock.lock().await;
            append_entry_to(&path, text).await
        };
        drop(lock);
        self.write_locks
            .remove_if(key, |_, lock| Arc::strong_count(lock) == 1);

        let bytes = result?;
        debug!(key, path = %path.display(), bytes, "Appended resume entry");
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<String> {
        let path = self.record_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(record) => Ok(record),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn is_available(&self) -> bool {
        self.root.is_dir()
    }
}

/// Appends one entry to a record file, returning the bytes written.
async fn append_entry_to(path: &Path, text: &str) -> Result<usize> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;

    let mut entry = String::with_capacity(RECORD_SEPARATOR.len() + text.len());
    if file.metadata().await?.len() != 0 {
        entry.push_str(&RECORD_SEPARATOR);
    }
    entry.push_str(text);

    file.write_all(entry.as_bytes()).await?;
    file.flush().await?;
    Ok(entry.len())
}

/// Percent-encodes everything except ASCII alphanumerics and `-_.~`.
///
/// Long results keep an encoded prefix followed by `%%` and the hex SHA-256
/// of the key. The encoder never emits `%%`, so shortened stems cannot
/// collide with verbatim ones.
fn escape_key(key: &str) -> String {
    let encoded = urlencoding::encode(key);
    if encoded.len() <= MAX_STEM_LEN {
        return encoded.into_owned();
    }

    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!(
        "{}%%{:x}",
        &encoded[..SHORTENED_PREFIX_LEN],
        hasher.finalize()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_escape_key() {
        assert_eq!(escape_key("user-123_abc"), "user-123_abc");
        assert_eq!(escape_key("a/b"), "a%2Fb");
        assert_eq!(escape_key("../etc/passwd"), "..%2Fetc%2Fpasswd");
        assert_eq!(escape_key("jane doe"), "jane%20doe");
    }

    #[test]
    fn test_long_keys_are_shortened() {
        let a = escape_key(&"张".repeat(30));
        let b = escape_key(&format!("{}x", "张".repeat(30)));
        assert_eq!(a.len(), SHORTENED_PREFIX_LEN + 2 + 64);
        assert!(a.contains("%%"));
        assert_ne!(a, b);
        assert_eq!(escape_key(&"a".repeat(MAX_STEM_LEN)), "a".repeat(MAX_STEM_LEN));
    }

    #[tokio::test]
    async fn test_non_ascii_key_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileResumeStore::new(dir.path()).unwrap();
        let key = "张".repeat(30);

        store.save(&key, "resume").await.unwrap();
        store.save(&key, "again").await.unwrap();

        let expected = format!("resume{}again", *RECORD_SEPARATOR);
        assert_eq!(store.load(&key).await.unwrap(), expected);
        assert_eq!(store.load(&"张".repeat(31)).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_write_locks_released_after_save() {
        let dir = TempDir::new().unwrap();
        let store = FileResumeStore::new(dir.path()).unwrap();

        store.save("a", "1").await.unwrap();
        store.save("b", "2").await.unwrap();

        assert!(store.write_locks.is_empty());
    }

    #[test]
    fn test_distinct_keys_get_distinct_files() {
        let dir = TempDir::new().unwrap();
        let store = FileResumeStore::new(dir.path()).unwrap();

        let a = store.record_path("a/b").unwrap();
        let b = store.record_path("a_b").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.parent().unwrap(), dir.path());
    }

    #[test]
    fn test_empty_key_rejected() {
        let dir = TempDir::new().unwrap();
        let store = FileResumeStore::new(dir.path()).unwrap();
        assert!(matches!(
            store.record_path(""),
            Err(HookError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_round_trip_with_separator() {
        let dir = TempDir::new().unwrap();
        let store = FileResumeStore::new(dir.path()).unwrap();

        store.save("k", "A").await.unwrap();
        store.save("k", "B").await.unwrap();

        let expected = format!("A\n\n{}\n\nB", "-".repeat(40));
        assert_eq!(store.load("k").await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_missing_record_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileResumeStore::new(dir.path()).unwrap();
        assert_eq!(store.load("nobody").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_creates_root_directory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("nested").join("resumes");
        let store = FileResumeStore::new(&root).unwrap();
        assert!(store.is_available());
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn test_path_unsafe_key_stays_in_root() {
        let dir = TempDir::new().unwrap();
        let store = FileResumeStore::new(dir.path()).unwrap();

        store.save("../escape", "secret").await.unwrap();

        assert!(!dir.path().parent().unwrap().join("escape.txt").exists());
        assert_eq!(store.load("../escape").await.unwrap(), "secret");
    }
}
