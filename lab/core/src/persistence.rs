//! Store Persistence
//!
//! Collections are mirrored to a key-value store as JSON arrays, one key per
//! collection. Loading is forgiving: a missing key, unreadable value or
//! non-array yields an empty collection, and array elements that fail to
//! deserialize are dropped individually.
//!
//! Writes go through [`PersistenceWriter`], a single background task fed by
//! an unbounded channel, so they are applied in the order they were queued
//! and never block the caller.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::types::{DiaryEntry, EntryId, JokeBit};

/// Key holding saved bits
pub const JOKES_KEY: &str = "comedia-lab-jokes";

/// Key holding diary entries
pub const DIARY_KEY: &str = "comedia-lab-diary";

/// Key holding selected diary entry IDs
pub const SELECTION_KEY: &str = "comedia-lab-selected-diary-ids";

/// Storage failure
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded
    #[error("could not serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value storage capability
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never written
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace a value
    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

// =============================================================================
// File Store
// =============================================================================

/// One JSON file per key inside a data directory
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at a directory (created on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-process map, for tests and headless use
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with values
    #[must_use]
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: Mutex::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Current value of a key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Decode a JSON array element by element, dropping malformed elements
///
/// Returns the decoded items and the number dropped, or `None` when the
/// value is not a JSON array at all.
pub fn decode_collection<T: DeserializeOwned>(raw: &str) -> Option<(Vec<T>, usize)> {
    let Ok(serde_json::Value::Array(items)) = serde_json::from_str::<serde_json::Value>(raw)
    else {
        return None;
    };
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    let dropped = total - decoded.len();
    Some((decoded, dropped))
}

/// Read one collection, degrading to empty on any failure
pub async fn load_collection<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    let raw = match store.read(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "No persisted value");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read persisted value");
            return Vec::new();
        }
    };

    let Some((items, dropped)) = decode_collection(&raw) else {
        tracing::warn!(key, "Persisted value is not a JSON array, ignoring it");
        return Vec::new();
    };
    if dropped > 0 {
        tracing::warn!(key, dropped, kept = items.len(), "Dropped malformed persisted items");
    }
    tracing::debug!(key, count = items.len(), "Loaded persisted collection");
    items
}

/// Everything the lab persists
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersistedState {
    /// Saved bits, newest first
    pub bits: Vec<JokeBit>,
    /// Diary entries, newest first
    pub diary: Vec<DiaryEntry>,
    /// Selected diary entry IDs (not yet pruned)
    pub selected: Vec<EntryId>,
}

/// Load all three collections
pub async fn load_state(store: &dyn KeyValueStore) -> PersistedState {
    PersistedState {
        bits: load_collection(store, JOKES_KEY).await,
        diary: load_collection(store, DIARY_KEY).await,
        selected: load_collection(store, SELECTION_KEY).await,
    }
}

// =============================================================================
// Writer
// =============================================================================

enum WriteCommand {
    Write { key: &'static str, value: String },
    Flush(oneshot::Sender<()>),
}

/// Ordered, fire-and-forget writer over a [`KeyValueStore`]
#[derive(Clone, Debug)]
pub struct PersistenceWriter {
    tx: mpsc::UnboundedSender<WriteCommand>,
}

impl std::fmt::Debug for WriteCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Write { key, .. } => write!(f, "Write({key})"),
            Self::Flush(_) => write!(f, "Flush"),
        }
    }
}

impl PersistenceWriter {
    /// Spawn the writer task on the current tokio runtime
    #[must_use]
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<WriteCommand>();

        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    WriteCommand::Write { key, value } => {
                        if let Err(e) = store.write(key, &value).await {
                            tracing::warn!(key, error = %e, "Failed to persist collection");
                        }
                    }
                    WriteCommand::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            tracing::debug!("Persistence writer stopped");
        });

        Self { tx }
    }

    fn enqueue<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) {
        let value = match serde_json::to_string(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to serialize collection");
                return;
            }
        };
        if self.tx.send(WriteCommand::Write { key, value }).is_err() {
            tracing::warn!(key, "Persistence writer is gone, dropping write");
        }
    }

    /// Queue a snapshot of the bit store
    pub fn save_bits(&self, bits: &[JokeBit]) {
        self.enqueue(JOKES_KEY, bits);
    }

    /// Queue a snapshot of the diary
    pub fn save_diary(&self, entries: &[DiaryEntry]) {
        self.enqueue(DIARY_KEY, entries);
    }

    /// Queue a snapshot of the selection (sorted for stable output)
    pub fn save_selection<'a>(&self, selected: impl IntoIterator<Item = &'a EntryId>) {
        let mut ids: Vec<&EntryId> = selected.into_iter().collect();
        ids.sort();
        self.enqueue(SELECTION_KEY, &ids);
    }

    /// Wait until every write queued so far has been applied
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WriteCommand::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}
