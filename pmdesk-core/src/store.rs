//! Client-local key/value storage.
//!
//! The session token and saved dashboard layouts live in a
//! [`KeyValueStore`]. Callers inject the store they want: an in-process
//! [`MemoryStore`] for tests and short-lived tools, or a [`FileStore`] that
//! survives restarts.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Error during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// String key/value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove a value. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

/// In-memory store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// A missing file reads as an empty store. Writes are serialised through an
/// internal lock and replace the file atomically: the new content goes to a
/// sibling temporary file which is then renamed over the target, so readers
/// never see a partially written file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store at the given file path. Nothing is touched on disk
    /// until the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> StoreResult<HashMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, entries: &HashMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        let staging = self.staging_path();
        if let Err(e) = tokio::fs::write(&staging, content).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&staging, &self.path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e.into());
        }
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        if entries.remove(key).is_some() {
            self.write_all(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("pmdesk_store_{}", uuid::Uuid::new_v4().simple()))
            .join(name)
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("missing").await.unwrap().is_none());

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        store.set("k", "w").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("w"));
        assert_eq!(store.len(), 1);

        store.remove("k").await.unwrap();
        assert!(store.is_empty());
        store.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_data() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("shared", "yes").await.unwrap();
        assert_eq!(other.get("shared").await.unwrap().as_deref(), Some("yes"));
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_empty() {
        let store = FileStore::new(temp_file("absent.json"));
        assert!(store.get("anything").await.unwrap().is_none());
        store.remove("anything").await.unwrap();
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let path = temp_file("session.json");

        let store = FileStore::new(&path);
        store.set("access_token", "abc").await.unwrap();
        store.set("token_type", "bearer").await.unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get("access_token").await.unwrap().as_deref(),
            Some("abc")
        );

        reopened.remove("access_token").await.unwrap();
        assert!(store.get("access_token").await.unwrap().is_none());
        assert_eq!(store.get("token_type").await.unwrap().as_deref(), Some("bearer"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_file_store_reads_during_writes_see_whole_file() {
        let path = temp_file("session.json");
        let store = Arc::new(FileStore::new(&path));
        store.set("access_token", "abc").await.unwrap();

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                let layout = "x".repeat(200 * 1024);
                for _ in 0..100 {
                    store.set("dashboard_layout_admin", &layout).await.unwrap();
                }
            })
        };

        while !writer.is_finished() {
            assert_eq!(
                store.get("access_token").await.unwrap().as_deref(),
                Some("abc")
            );
        }
        writer.await.unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "session.json")
            .collect();
        assert!(leftovers.is_empty());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_file() {
        let path = temp_file("corrupt.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        let err = store.get("k").await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
