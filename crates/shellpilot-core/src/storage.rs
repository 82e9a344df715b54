//! Session-scoped key/value storage.
//!
//! Values live only as long as the client session they are keyed under:
//! relaunching with the same session identifier sees them again, a new
//! session starts empty. The file backend writes one file per key inside a
//! per-session directory; the in-memory backend is used for tests and
//! ephemeral runs.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key contains characters that cannot be mapped to a file name.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// String key/value store scoped to one client session.
pub trait SessionStorage: Send {
    /// Returns the stored value, or `None` when the key was never written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

/// File-backed storage: `<root>/<session-id>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    session_dir: PathBuf,
}

impl FileSessionStorage {
    /// Opens (creating if needed) the directory for `session_id` under `root`.
    pub fn open(root: &Path, session_id: &str) -> StorageResult<Self> {
        validate_segment(session_id)?;
        let session_dir = root.join(session_id);
        fs::create_dir_all(&session_dir)?;
        debug!(dir = %session_dir.display(), "Opened session storage");
        Ok(Self { session_dir })
    }

    /// Directory holding this session's files.
    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    fn key_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_segment(key)?;
        Ok(self.session_dir.join(format!("{key}.json")))
    }

    /// Writes through a temporary file so a crash never leaves a torn value.
    fn atomic_write(&self, path: &Path, content: &str) -> StorageResult<()> {
        let temp_path = self
            .session_dir
            .join(format!(".{}.tmp", Uuid::new_v4()));

        if let Err(e) = fs::write(&temp_path, content) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.key_path(key)?;
        self.atomic_write(&path, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keys and session ids become path segments, so keep them to a safe set.
fn validate_segment(segment: &str) -> StorageResult<()> {
    let valid = !segment.is_empty()
        && !segment.starts_with('.')
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid { Ok(()) } else { Err(StorageError::InvalidKey(segment.to_string())) }
}

/// In-process storage that disappears with the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = FileSessionStorage::open(temp_dir.path(), "session-1").unwrap();

        assert_eq!(storage.get("history").unwrap(), None);
        storage.set("history", "[\"ls\"]").unwrap();
        assert_eq!(storage.get("history").unwrap().as_deref(), Some("[\"ls\"]"));

        storage.remove("history").unwrap();
        assert_eq!(storage.get("history").unwrap(), None);
        // Removing twice is fine
        storage.remove("history").unwrap();
    }

    #[test]
    fn test_file_storage_is_scoped_per_session() {
        let temp_dir = TempDir::new().unwrap();
        let mut first = FileSessionStorage::open(temp_dir.path(), "first").unwrap();
        let second = FileSessionStorage::open(temp_dir.path(), "second").unwrap();

        first.set("key", "value").unwrap();
        assert_eq!(second.get("key").unwrap(), None);

        let reopened = FileSessionStorage::open(temp_dir.path(), "first").unwrap();
        assert_eq!(reopened.get("key").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_file_storage_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::open(temp_dir.path(), "s").unwrap();
        assert!(matches!(storage.get("../escape"), Err(StorageError::InvalidKey(_))));
        assert!(FileSessionStorage::open(temp_dir.path(), "a/b").is_err());
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
    }
}
