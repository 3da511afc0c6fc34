//! JSON file persistence for the durable tables.

use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// File-backed table storage with atomic writes.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a file store for the given table path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Save a table to disk.
    ///
    /// Writes atomically using temp file + rename so a crash mid-write
    /// cannot leave a truncated table behind.
    pub async fn save<T: Serialize>(&self, table: &T) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(table)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &data).await?;
        fs::rename(&temp_path, &self.path).await?;

        debug!("Saved table ({} bytes) to {:?}", data.len(), self.path);
        Ok(())
    }

    /// Load a table from disk.
    ///
    /// Returns the empty table if the file doesn't exist yet.
    pub async fn load<T: DeserializeOwned + Default>(&self) -> Result<T, StoreError> {
        if !self.path.exists() {
            info!(
                "Table file not found at {:?}, starting with empty table",
                self.path
            );
            return Ok(T::default());
        }

        let data = fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&data)?)
    }
}

/// In-memory store for tests and ephemeral runs.
///
/// Keeps the serialized table so a later load returns whatever was last
/// saved, matching the file store's reload behavior without touching
/// disk.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<Option<Vec<u8>>>,
}

impl MemoryStore {
    /// Save a table into memory.
    pub async fn save<T: Serialize>(&self, table: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(table)?;
        *self.data.write().await = Some(bytes);
        Ok(())
    }

    /// Load the last saved table, or the empty table if nothing was saved.
    pub async fn load<T: DeserializeOwned + Default>(&self) -> Result<T, StoreError> {
        match self.data.read().await.as_deref() {
            Some(bytes) => Ok(serde_json::from_slice(bytes)?),
            None => Ok(T::default()),
        }
    }
}

/// Storage backend for one durable table.
pub enum Store {
    /// JSON file storage
    File(FileStore),
    /// In-memory only (no persistence)
    Memory(MemoryStore),
}

impl Store {
    /// File-backed storage at the given path.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Store::File(FileStore::new(path.into()))
    }

    /// In-memory storage.
    pub fn memory() -> Self {
        Store::Memory(MemoryStore::default())
    }

    /// Save the table.
    pub async fn save<T: Serialize>(&self, table: &T) -> Result<(), StoreError> {
        match self {
            Store::File(s) => s.save(table).await,
            Store::Memory(s) => s.save(table).await,
        }
    }

    /// Load the table.
    pub async fn load<T: DeserializeOwned + Default>(&self) -> Result<T, StoreError> {
        match self {
            Store::File(s) => s.load().await,
            Store::Memory(s) => s.load().await,
        }
    }
}
