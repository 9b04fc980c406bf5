use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::snapshot::AgentSnapshot;
use crate::error::PersistenceError;

/// Storage boundary for agent snapshots, addressed by name.
pub trait TableStore {
    /// `Ok(None)` when nothing has been saved under `name` yet.
    fn load(&self, name: &str) -> Result<Option<AgentSnapshot>, PersistenceError>;

    fn save(&mut self, name: &str, snapshot: &AgentSnapshot) -> Result<(), PersistenceError>;
}

/// Stores each snapshot as `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonFileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl TableStore for JsonFileStore {
    fn load(&self, name: &str) -> Result<Option<AgentSnapshot>, PersistenceError> {
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).map_err(|e| PersistenceError::Read {
            path: path.clone(),
            source: e,
        })?;
        let snapshot: AgentSnapshot =
            serde_json::from_str(&json).map_err(|e| PersistenceError::Parse {
                path: path.clone(),
                source: e,
            })?;
        snapshot.check()?;

        debug!(path = %path.display(), rows = snapshot.entries.len(), "loaded table");
        Ok(Some(snapshot))
    }

    fn save(&mut self, name: &str, snapshot: &AgentSnapshot) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        let final_path = self.path_for(name);
        let tmp_path = self.dir.join(format!("{name}.json.tmp"));

        let json = serde_json::to_string(snapshot)?;
        fs::write(&tmp_path, json)?;

        // Atomic rename
        fs::rename(&tmp_path, &final_path)?;

        debug!(path = %final_path.display(), rows = snapshot.entries.len(), "saved table");
        Ok(())
    }
}

/// In-process store, mostly for tests and short-lived experiments.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshots: HashMap<String, AgentSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl TableStore for MemoryStore {
    fn load(&self, name: &str) -> Result<Option<AgentSnapshot>, PersistenceError> {
        match self.snapshots.get(name) {
            Some(snapshot) => {
                snapshot.check()?;
                Ok(Some(snapshot.clone()))
            }
            None => Ok(None),
        }
    }

    fn save(&mut self, name: &str, snapshot: &AgentSnapshot) -> Result<(), PersistenceError> {
        self.snapshots.insert(name.to_string(), snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Level, QTable};
    use crate::game::{GameState, COLS};
    use tempfile::TempDir;

    fn snapshot() -> AgentSnapshot {
        let mut table = QTable::new(0.0);
        table.insert(GameState::initial().key(), [0.1; COLS], [3; COLS]);
        AgentSnapshot::from_table(&table, Level::Block, 42, 0.12)
    }

    #[test]
    fn test_save_and_load_file() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(tmp.path().join("tables"));
        store.save("agent", &snapshot()).unwrap();

        assert!(store.path_for("agent").exists());
        assert!(!tmp.path().join("tables/agent.json.tmp").exists());
        assert_eq!(store.load("agent").unwrap(), Some(snapshot()));
    }

    #[test]
    fn test_missing_file_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        assert_eq!(store.load("nobody").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        fs::write(store.path_for("broken"), "{ not json").unwrap();
        assert!(matches!(
            store.load("broken"),
            Err(PersistenceError::Parse { .. })
        ));
    }

    #[test]
    fn test_wrong_version_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(tmp.path());
        let mut old = snapshot();
        old.version = 0;
        store.save("old", &old).unwrap();
        assert!(matches!(
            store.load("old"),
            Err(PersistenceError::Version { found: 0, .. })
        ));
    }

    #[test]
    fn test_overwrite_replaces_contents() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(tmp.path());
        store.save("agent", &snapshot()).unwrap();
        let mut newer = snapshot();
        newer.games_played = 100;
        store.save("agent", &newer).unwrap();
        assert_eq!(store.load("agent").unwrap().unwrap().games_played, 100);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.load("agent").unwrap(), None);
        store.save("agent", &snapshot()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load("agent").unwrap(), Some(snapshot()));
    }
}
