//! File-based GameRepository implementation.
//!
//! Layout under the base directory:
//!
//! ```text
//! active/{guild}/{name}/settings.json
//! active/{guild}/{name}/playerdata.json
//! active/{guild}/{name}/linkage.json
//! archive/{guild}/{name}-{n}/...
//! ```
//!
//! Sections are written through a temp file plus atomic rename so a crash
//! mid-write never leaves a torn section behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use tactics_core::{Overrides, PlayerData};

use crate::repository::{GameDocument, GameRepository, RepositoryError};
use crate::types::{GameKey, Linkage};

pub struct FileGameRepository {
    base_dir: PathBuf,
}

impl FileGameRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(base_dir.join("active"))?;
        fs::create_dir_all(base_dir.join("archive"))?;
        Ok(Self { base_dir })
    }

    fn active_dir(&self, key: &GameKey) -> PathBuf {
        self.base_dir.join("active").join(&key.guild).join(&key.name)
    }

    fn write_section<T: Serialize>(
        &self,
        key: &GameKey,
        section: &str,
        value: &T,
    ) -> Result<(), RepositoryError> {
        let dir = self.active_dir(key);
        if !dir.is_dir() {
            return Err(RepositoryError::NotFound { key: key.clone() });
        }
        let path = dir.join(format!("{section}.json"));
        let temp_path = dir.join(format!("{section}.json.tmp"));

        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(game = %key, section, "saved section");
        Ok(())
    }

    fn read_section<T: DeserializeOwned>(
        &self,
        key: &GameKey,
        section: &str,
    ) -> Result<T, RepositoryError> {
        let path = self.active_dir(key).join(format!("{section}.json"));
        if !path.exists() {
            return Err(RepositoryError::NotFound { key: key.clone() });
        }
        let bytes = fs::read(&path)?;
        serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Serialization(e.to_string()))
    }

    /// First free archive slot for the key. Finished games keep their name,
    /// so a guild replaying "skirmish" archives to `skirmish-1`, `-2`, ...
    fn archive_dir(&self, key: &GameKey) -> PathBuf {
        let guild_dir = self.base_dir.join("archive").join(&key.guild);
        let mut n = 0;
        loop {
            let candidate = if n == 0 {
                guild_dir.join(&key.name)
            } else {
                guild_dir.join(format!("{}-{n}", key.name))
            };
            if !candidate.exists() {
                return candidate;
            }
            n += 1;
        }
    }
}

impl GameRepository for FileGameRepository {
    fn create(&self, key: &GameKey, document: &GameDocument) -> Result<(), RepositoryError> {
        let dir = self.active_dir(key);
        if dir.exists() {
            return Err(RepositoryError::AlreadyExists { key: key.clone() });
        }
        fs::create_dir_all(&dir)?;

        self.write_section(key, "settings", &document.settings)?;
        self.write_section(key, "playerdata", &document.playerdata)?;
        self.write_section(key, "linkage", &document.linkage)?;

        tracing::info!(game = %key, "created game on disk");
        Ok(())
    }

    fn load(&self, key: &GameKey) -> Result<GameDocument, RepositoryError> {
        Ok(GameDocument {
            settings: self.read_section(key, "settings")?,
            playerdata: self.read_section(key, "playerdata")?,
            linkage: self.read_section(key, "linkage")?,
        })
    }

    fn save_settings(&self, key: &GameKey, settings: &Overrides) -> Result<(), RepositoryError> {
        self.write_section(key, "settings", settings)
    }

    fn save_playerdata(
        &self,
        key: &GameKey,
        playerdata: &PlayerData,
    ) -> Result<(), RepositoryError> {
        self.write_section(key, "playerdata", playerdata)
    }

    fn save_linkage(&self, key: &GameKey, linkage: &Linkage) -> Result<(), RepositoryError> {
        self.write_section(key, "linkage", linkage)
    }

    fn list_active(&self) -> Result<Vec<GameKey>, RepositoryError> {
        let mut keys = Vec::new();
        for guild_entry in fs::read_dir(self.base_dir.join("active"))? {
            let guild_entry = guild_entry?;
            if !guild_entry.file_type()?.is_dir() {
                continue;
            }
            let guild = guild_entry.file_name().to_string_lossy().into_owned();
            for game_entry in fs::read_dir(guild_entry.path())? {
                let game_entry = game_entry?;
                if game_entry.file_type()?.is_dir() {
                    let name = game_entry.file_name().to_string_lossy().into_owned();
                    keys.push(GameKey::new(guild.clone(), name));
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn archive(&self, key: &GameKey) -> Result<(), RepositoryError> {
        let active = self.active_dir(key);
        if !active.is_dir() {
            return Err(RepositoryError::NotFound { key: key.clone() });
        }
        let target = self.archive_dir(key);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(&active, &target)?;

        tracing::info!(game = %key, to = %target.display(), "archived game");
        Ok(())
    }

    fn exists(&self, key: &GameKey) -> bool {
        self.active_dir(key).is_dir()
    }
}
