//! In-memory GameRepository for tests and ephemeral setups.

use std::collections::BTreeMap;
use std::sync::Mutex;

use tactics_core::{Overrides, PlayerData};

use crate::repository::{GameDocument, GameRepository, RepositoryError};
use crate::types::{GameKey, Linkage};

#[derive(Default)]
struct Store {
    active: BTreeMap<GameKey, GameDocument>,
    archived: Vec<(GameKey, GameDocument)>,
}

#[derive(Default)]
pub struct MemoryGameRepository {
    store: Mutex<Store>,
}

impl MemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a document for the key has been moved to the archive.
    pub fn archived(&self, key: &GameKey) -> bool {
        self.lock().archived.iter().any(|(k, _)| k == key)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Store> {
        // Repository methods never panic while holding the lock.
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn update<F>(&self, key: &GameKey, apply: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(&mut GameDocument),
    {
        let mut store = self.lock();
        let document = store
            .active
            .get_mut(key)
            .ok_or_else(|| RepositoryError::NotFound { key: key.clone() })?;
        apply(document);
        Ok(())
    }
}

impl GameRepository for MemoryGameRepository {
    fn create(&self, key: &GameKey, document: &GameDocument) -> Result<(), RepositoryError> {
        let mut store = self.lock();
        if store.active.contains_key(key) {
            return Err(RepositoryError::AlreadyExists { key: key.clone() });
        }
        store.active.insert(key.clone(), document.clone());
        Ok(())
    }

    fn load(&self, key: &GameKey) -> Result<GameDocument, RepositoryError> {
        self.lock()
            .active
            .get(key)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound { key: key.clone() })
    }

    fn save_settings(&self, key: &GameKey, settings: &Overrides) -> Result<(), RepositoryError> {
        self.update(key, |doc| doc.settings = settings.clone())
    }

    fn save_playerdata(
        &self,
        key: &GameKey,
        playerdata: &PlayerData,
    ) -> Result<(), RepositoryError> {
        self.update(key, |doc| doc.playerdata = playerdata.clone())
    }

    fn save_linkage(&self, key: &GameKey, linkage: &Linkage) -> Result<(), RepositoryError> {
        self.update(key, |doc| doc.linkage = linkage.clone())
    }

    fn list_active(&self) -> Result<Vec<GameKey>, RepositoryError> {
        Ok(self.lock().active.keys().cloned().collect())
    }

    fn archive(&self, key: &GameKey) -> Result<(), RepositoryError> {
        let mut store = self.lock();
        let document = store
            .active
            .remove(key)
            .ok_or_else(|| RepositoryError::NotFound { key: key.clone() })?;
        store.archived.push((key.clone(), document));
        Ok(())
    }

    fn exists(&self, key: &GameKey) -> bool {
        self.lock().active.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_moves_the_document_out_of_the_active_set() {
        let repo = MemoryGameRepository::new();
        let key = GameKey::new("g", "a");
        repo.create(&key, &GameDocument::default()).unwrap();

        repo.archive(&key).unwrap();
        assert!(!repo.exists(&key));
        assert!(repo.archived(&key));
        assert!(matches!(
            repo.archive(&key),
            Err(RepositoryError::NotFound { .. })
        ));
    }
}
