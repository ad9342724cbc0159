use std::path::PathBuf;
use std::sync::Arc;

use redis::{AsyncCommands, Client};
use tokio::sync::Mutex;

use crate::{
    error::AppResult,
    models::SavedMovie,
    services::selection::Selection,
};

/// A durable key-value slot holding one serialized value
#[async_trait::async_trait]
pub trait SlotStorage: Send + Sync {
    /// Reads the raw slot contents, `None` when nothing was ever written
    async fn read(&self) -> AppResult<Option<String>>;

    /// Replaces the slot contents
    async fn write(&self, value: &str) -> AppResult<()>;

    /// Storage name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Slot backed by a JSON file on disk
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl SlotStorage for FileSlot {
    async fn read(&self) -> AppResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, value: &str) -> AppResult<()> {
        // Replace atomically via a sibling temp file
        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, value).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Slot backed by a single Redis key
pub struct RedisSlot {
    redis_client: Client,
    key: String,
}

impl RedisSlot {
    pub fn new(redis_client: Client, key: String) -> Self {
        Self { redis_client, key }
    }
}

#[async_trait::async_trait]
impl SlotStorage for RedisSlot {
    async fn read(&self) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(&self.key).await?;
        Ok(value)
    }

    async fn write(&self, value: &str) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(&self.key, value).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

/// Slot kept in process memory
#[derive(Default)]
pub struct MemorySlot {
    value: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-filled with `value`
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
        }
    }
}

#[async_trait::async_trait]
impl SlotStorage for MemorySlot {
    async fn read(&self) -> AppResult<Option<String>> {
        Ok(self.value.lock().await.clone())
    }

    async fn write(&self, value: &str) -> AppResult<()> {
        *self.value.lock().await = Some(value.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Loads and saves the user's selection as a JSON array of saved movies
#[derive(Clone)]
pub struct SelectionStore {
    slot: Arc<dyn SlotStorage>,
}

impl SelectionStore {
    pub fn new(slot: Arc<dyn SlotStorage>) -> Self {
        Self { slot }
    }

    /// Loads the stored selection.
    ///
    /// Missing, unreadable or corrupt data yields an empty selection.
    pub async fn load(&self) -> Selection {
        let raw = match self.slot.read().await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::info!(storage = self.slot.name(), "No saved selection found");
                return Selection::new();
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    storage = self.slot.name(),
                    "Failed to read saved selection, starting empty"
                );
                return Selection::new();
            }
        };

        match serde_json::from_str::<Vec<SavedMovie>>(&raw) {
            Ok(saved) => {
                let selection = Selection::from_saved(saved);
                tracing::info!(
                    storage = self.slot.name(),
                    count = selection.len(),
                    "Loaded saved selection"
                );
                selection
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    storage = self.slot.name(),
                    "Saved selection is corrupt, starting empty"
                );
                Selection::new()
            }
        }
    }

    /// Persists the whole selection
    pub async fn save(&self, selection: &Selection) -> AppResult<()> {
        let json = serde_json::to_string(selection.movies())?;
        self.slot.write(&json).await?;

        tracing::debug!(
            storage = self.slot.name(),
            count = selection.len(),
            "Saved selection"
        );

        Ok(())
    }
}
