use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io failure: {0}")]
    Io(String),
    #[error("stored value for `{key}` is corrupt: {source}")]
    Corrupt { key: String, source: serde_json::Error },
}

/// Key-value persistence collaborator for local state: tokens, the offline
/// write queue, notification preferences. The format behind a key belongs to
/// the implementation, not to callers.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
    async fn put(&self, key: &str, value: Value) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Volatile storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Single-file JSON map. Every write rewrites the file; the state is small
/// (tokens, a short queue, preference toggles).
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, Value>>,
}

impl FileStorage {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries = match tokio::fs::read(&path).await {
            Ok(raw) => serde_json::from_slice(&raw).map_err(|source| StorageError::Corrupt {
                key: path.display().to_string(),
                source,
            })?,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(error) => return Err(StorageError::Io(error.to_string())),
        };
        Ok(Self { path, entries: Mutex::new(entries) })
    }

    async fn flush(&self, entries: &HashMap<String, Value>) -> Result<(), StorageError> {
        let raw = serde_json::to_vec_pretty(entries)
            .map_err(|error| StorageError::Io(error.to_string()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|error| StorageError::Io(error.to_string()))
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value);
        self.flush(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;
        if entries.remove(key).is_some() {
            self.flush(&entries).await?;
        }
        Ok(())
    }
}
