//! Best-effort key/value persistence
//!
//! Storage never fails gameplay: reads that go wrong return `None`, writes
//! that go wrong are logged and dropped.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// String storage keyed by name
pub trait ScoreStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str);
}

/// One file per key under a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ScoreStore for FileStore {
    fn load(&self, key: &str) -> Option<String> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) => {
                log::debug!("No stored {} at {}: {}", key, path.display(), e);
                None
            }
        }
    }

    fn save(&mut self, key: &str, value: &str) {
        let path = self.path(key);
        if let Err(e) = fs::create_dir_all(&self.dir).and_then(|_| fs::write(&path, value)) {
            log::warn!("Failed to save {} to {}: {}", key, path.display(), e);
        }
    }
}

/// In-memory store for tests and sessions without a disk
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load("scores"), None);
        store.save("scores", "[1,2]");
        assert_eq!(store.load("scores").as_deref(), Some("[1,2]"));
    }

    #[test]
    fn test_file_store_missing_and_written() {
        let dir = std::env::temp_dir().join(format!("cannon_rush_store_{}", std::process::id()));
        let mut store = FileStore::new(&dir);
        assert_eq!(store.load("nothing_here"), None);
        store.save("scores", "[30]");
        assert_eq!(store.load("scores").as_deref(), Some("[30]"));
        let _ = fs::remove_dir_all(&dir);
    }
}
