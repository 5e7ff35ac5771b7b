use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

pub const BEST_KEY: &str = "jellySnakeBest";
pub const SETTINGS_KEY: &str = "jellySnakeSettings";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("save file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save data is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("value under {key:?} is not a score: {value:?}")]
    Parse { key: String, value: String },
}

/// String key-value persistence, in the shape of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// All keys live in one pretty-printed JSON object on disk, rewritten on
/// every `set`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let values = if Path::new(&path).exists() {
            let text = fs::read_to_string(&path)?;
            serde_json::from_str(&text)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

/// Opens the save file, or falls back to a session-only store when it cannot
/// be read.
pub fn open_store(path: &Path) -> Box<dyn KeyValueStore> {
    match JsonFileStore::open(path) {
        Ok(store) => {
            info!("using save file {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            warn!("save file {} unavailable ({e}), scores will not persist", path.display());
            Box::new(MemoryStore::new())
        }
    }
}

/// Player records backed by a [`KeyValueStore`]: the high score plus any
/// JSON-encoded preferences.
///
/// The in-memory best score is authoritative for the session; write failures
/// are logged and otherwise ignored.
pub struct Profile {
    store: Box<dyn KeyValueStore>,
    best: u32,
}

impl Profile {
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let best = match read_score(store.as_ref()) {
            Ok(best) => best,
            Err(e) => {
                warn!("could not read high score: {e}");
                0
            }
        };
        Self { store, best }
    }

    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStore::new()))
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Stores `score` if it beats the current best. Returns whether it did.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        if let Err(e) = self.store.set(BEST_KEY, &score.to_string()) {
            warn!("high score {score} kept in memory only: {e}");
        }
        true
    }

    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = match self.store.get(key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!("could not read {key}: {e}");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("ignoring malformed {key}: {e}");
                None
            }
        }
    }

    pub fn save_json<T: Serialize>(&mut self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|text| self.store.set(key, &text));
        if let Err(e) = result {
            warn!("could not save {key}: {e}");
        }
    }
}

fn read_score(store: &dyn KeyValueStore) -> Result<u32, StorageError> {
    match store.get(BEST_KEY)? {
        None => Ok(0),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| StorageError::Parse { key: BEST_KEY.to_string(), value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(std::io::Error::other("storage disabled").into())
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("storage disabled").into())
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("jelly_snake_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn missing_best_reads_as_zero() {
        assert_eq!(Profile::in_memory().best(), 0);
    }

    #[test]
    fn record_only_writes_improvements() {
        let mut profile = Profile::in_memory();
        assert!(profile.record(40));
        assert!(!profile.record(40));
        assert!(!profile.record(15));
        assert!(profile.record(41));
        assert_eq!(profile.best(), 41);
    }

    #[test]
    fn garbage_best_falls_back_to_zero() {
        let mut store = MemoryStore::new();
        store.set(BEST_KEY, "lots").unwrap();
        assert_eq!(Profile::load(Box::new(store)).best(), 0);
    }

    #[test]
    fn broken_storage_degrades_to_memory() {
        let mut profile = Profile::load(Box::new(BrokenStore));
        assert_eq!(profile.best(), 0);
        assert!(profile.record(120));
        assert_eq!(profile.best(), 120);
        assert_eq!(profile.load_json::<u32>(SETTINGS_KEY), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let path = temp_path("reopen");
        let _ = fs::remove_file(&path);
        {
            let mut profile = Profile::load(Box::new(JsonFileStore::open(&path).unwrap()));
            profile.record(75);
            profile.save_json(SETTINGS_KEY, &vec![1, 2]);
        }
        let profile = Profile::load(Box::new(JsonFileStore::open(&path).unwrap()));
        assert_eq!(profile.best(), 75);
        assert_eq!(profile.load_json::<Vec<u8>>(SETTINGS_KEY), Some(vec![1, 2]));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_falls_back_to_memory_store() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ not json").unwrap();
        assert!(JsonFileStore::open(&path).is_err());
        let mut store = open_store(&path);
        store.set(BEST_KEY, "5").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
        let _ = fs::remove_file(&path);
    }
}
