use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::commands::giveaway::models::PersistedState;
use crate::error::{Error, Result};

// A flat-file storage for the bot state. The whole state is
// serialized into a single human-readable JSON file and fully
// rewritten on every save.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SettingsStore { path: path.into() }
    }

    // Reads the persisted state from the settings file. A missing file
    // is initialized with an empty state instead of failing. An existing
    // file that can't be parsed means the storage is corrupted and must
    // be reported to the operator rather than silently reset.
    pub fn load(&self) -> Result<PersistedState> {
        if !self.path.exists() {
            let state = PersistedState::default();
            self.save(&state)?;
            info!("Initialized an empty settings file at {}", self.path.display());
            return Ok(state);
        }

        let contents = fs::read_to_string(&self.path)?;
        serde_json::from_str(&contents).map_err(|err| Error::CorruptedStorage {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        })
    }

    // Overwrites the settings file with the given state.
    pub fn save(&self, state: &PersistedState) -> Result<()> {
        let contents = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use crate::commands::giveaway::models::{GiveawayRecord, PersistedState};
    use crate::error::Error;
    use crate::storage::SettingsStore;

    #[test]
    fn test_load_initializes_a_missing_settings_file() {
        let directory = tempdir().unwrap();
        let path = directory.path().join("settings.json");
        let store = SettingsStore::new(&path);

        let state = store.load().unwrap();

        assert_eq!(state, PersistedState::default());
        assert_eq!(path.exists(), true);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let directory = tempdir().unwrap();
        let store = SettingsStore::new(directory.path().join("settings.json"));

        let mut state = PersistedState::default();
        state.authorized_servers.insert(555);
        state.giveaways.push(GiveawayRecord::new(1, 2, 555, "X", 2, 10));
        store.save(&state).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_save_fully_rewrites_the_settings_file() {
        let directory = tempdir().unwrap();
        let store = SettingsStore::new(directory.path().join("settings.json"));

        let mut state = PersistedState::default();
        state.authorized_servers.insert(555);
        store.save(&state).unwrap();

        state.giveaways.push(GiveawayRecord::new(1, 2, 555, "X", 1, 1));
        store.save(&state).unwrap();
        state.giveaways.clear();
        store.save(&state).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.giveaways.is_empty(), true);
        assert_eq!(loaded.authorized_servers.as_slice(), &[555]);
    }

    #[test]
    fn test_get_error_for_a_corrupted_settings_file() {
        let directory = tempdir().unwrap();
        let path = directory.path().join("settings.json");
        fs::write(&path, "{not valid json").unwrap();
        let store = SettingsStore::new(&path);

        let result = store.load();

        assert_eq!(result.is_err(), true);
        match result.unwrap_err() {
            Error::CorruptedStorage { path: reported, .. } => {
                assert_eq!(reported, path.display().to_string());
            }
            other => panic!("Expected a CorruptedStorage error, got: {:?}", other),
        }
    }
}
