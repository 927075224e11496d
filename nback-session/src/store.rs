//! Persistence of the level reached, keyed by session identifier.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;

pub trait LevelStore {
    fn load(&self, session_id: &str) -> Result<Option<u32>>;
    fn save(&mut self, session_id: &str, n_interval: u32) -> Result<()>;

    /// Saved level, or `default` when none is stored or the store is unreadable.
    fn load_or(&self, session_id: &str, default: u32) -> u32 {
        match self.load(session_id) {
            Ok(level) => level.unwrap_or(default),
            Err(err) => {
                warn!(session_id, %err, "could not read saved level, using default");
                default
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryLevelStore {
    levels: HashMap<String, u32>,
}

impl MemoryLevelStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LevelStore for MemoryLevelStore {
    fn load(&self, session_id: &str) -> Result<Option<u32>> {
        Ok(self.levels.get(session_id).copied())
    }

    fn save(&mut self, session_id: &str, n_interval: u32) -> Result<()> {
        self.levels.insert(session_id.to_string(), n_interval);
        Ok(())
    }
}

/// Levels kept as one JSON object, `{ "<session>": n, ... }`.
#[derive(Debug, Clone)]
pub struct JsonLevelStore {
    path: PathBuf,
}

impl JsonLevelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, u32>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }
}

impl LevelStore for JsonLevelStore {
    fn load(&self, session_id: &str) -> Result<Option<u32>> {
        Ok(self.read_all()?.get(session_id).copied())
    }

    fn save(&mut self, session_id: &str, n_interval: u32) -> Result<()> {
        let mut levels = self.read_all()?;
        levels.insert(session_id.to_string(), n_interval);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        // Replaced via rename; readers never see a partial file.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(&levels)?)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(session_id, n_interval, path = %self.path.display(), "saved level");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;
    use tempfile::TempDir;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryLevelStore::new();
        assert_eq!(store.load("alice").unwrap(), None);
        store.save("alice", 4).unwrap();
        assert_eq!(store.load("alice").unwrap(), Some(4));
        assert_eq!(store.load_or("bob", 2), 2);
    }

    #[test]
    fn json_store_keeps_other_sessions() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonLevelStore::new(dir.path().join("nested/levels.json"));
        store.save("alice", 3).unwrap();
        store.save("bob", 5).unwrap();
        store.save("alice", 4).unwrap();

        let reopened = JsonLevelStore::new(store.path());
        assert_eq!(reopened.load("alice").unwrap(), Some(4));
        assert_eq!(reopened.load("bob").unwrap(), Some(5));
        assert_eq!(reopened.load("carol").unwrap(), None);
    }

    #[test]
    fn corrupt_file_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("levels.json");
        std::fs::write(&path, "not json").unwrap();
        let store = JsonLevelStore::new(&path);
        assert!(matches!(store.load("alice"), Err(SessionError::Json(_))));
        assert_eq!(store.load_or("alice", 2), 2);
    }
}
