// ── Countdown persistence adapters ──
//
// The store writes through on every mutation and rehydrates on startup.
// Only the countdown map is durable; no other client state persists.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::model::OrderCountdown;

/// Persistence failure. Surfaced to the store, which logs and degrades
/// rather than propagating -- a broken disk must not break the countdown.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable backing for the countdown map.
///
/// Implementations must be whole-document: `save` replaces everything,
/// `load` returns everything. The store never issues partial writes.
pub trait CountdownStorage: Send + Sync {
    fn load(&self) -> Result<HashMap<String, OrderCountdown>, StorageError>;
    fn save(&self, entries: &HashMap<String, OrderCountdown>) -> Result<(), StorageError>;
}

/// The single namespaced document written to disk.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedCountdowns {
    order_countdowns: HashMap<String, OrderCountdown>,
}

/// JSON-file storage under the platform data directory.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl CountdownStorage for JsonFileStorage {
    fn load(&self) -> Result<HashMap<String, OrderCountdown>, StorageError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let doc: PersistedCountdowns = serde_json::from_str(&raw)?;
        Ok(doc.order_countdowns)
    }

    fn save(&self, entries: &HashMap<String, OrderCountdown>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let doc = PersistedCountdowns {
            order_countdowns: entries.clone(),
        };
        let raw = serde_json::to_string_pretty(&doc)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// In-memory storage for tests and ephemeral consumers.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, OrderCountdown>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CountdownStorage for MemoryStorage {
    fn load(&self) -> Result<HashMap<String, OrderCountdown>, StorageError> {
        Ok(self.entries.lock().expect("storage lock poisoned").clone())
    }

    fn save(&self, entries: &HashMap<String, OrderCountdown>) -> Result<(), StorageError> {
        *self.entries.lock().expect("storage lock poisoned") = entries.clone();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(order_id: &str) -> OrderCountdown {
        OrderCountdown {
            order_id: order_id.into(),
            expire_at: Utc::now(),
            last_known_remaining_secs: 42,
            last_update_time: Utc::now(),
        }
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("countdowns.json"));

        let mut entries = HashMap::new();
        entries.insert("o1".to_owned(), entry("o1"));
        storage.save(&entries).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded, entries);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nope.json"));
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countdowns.json");
        std::fs::write(&path, "{ not json").unwrap();

        let storage = JsonFileStorage::new(path);
        assert!(matches!(
            storage.load(),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("deep/nested/countdowns.json"));
        storage.save(&HashMap::new()).unwrap();
        assert!(storage.path().exists());
    }

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        let mut entries = HashMap::new();
        entries.insert("o2".to_owned(), entry("o2"));

        storage.save(&entries).unwrap();
        assert_eq!(storage.load().unwrap(), entries);
    }
}
