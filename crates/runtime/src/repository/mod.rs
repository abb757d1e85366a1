//! Persistence contracts for game documents.
//!
//! A game persists as three independent sections (settings, playerdata,
//! linkage) so each mutation only rewrites the section it touched. Active
//! games live apart from archived ones; archiving moves the whole document
//! without deleting anything.

mod file;
mod memory;

use serde::{Deserialize, Serialize};

use tactics_core::{Overrides, PlayerData};

use crate::types::{GameKey, Linkage};

pub use file::FileGameRepository;
pub use memory::MemoryGameRepository;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("game {key} was not found")]
    NotFound { key: GameKey },

    #[error("game {key} already exists")]
    AlreadyExists { key: GameKey },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Everything one game persists.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameDocument {
    pub settings: Overrides,
    pub playerdata: PlayerData,
    pub linkage: Linkage,
}

/// Storage for game documents, keyed by guild and game name.
///
/// Implementations are synchronous; callers that live in async contexts
/// keep the writes small enough not to matter.
pub trait GameRepository: Send + Sync {
    /// Persist a brand-new game. Fails if the key is already taken by an
    /// active game.
    fn create(&self, key: &GameKey, document: &GameDocument) -> Result<(), RepositoryError>;

    /// Load a full active game document.
    fn load(&self, key: &GameKey) -> Result<GameDocument, RepositoryError>;

    fn save_settings(&self, key: &GameKey, settings: &Overrides) -> Result<(), RepositoryError>;

    fn save_playerdata(&self, key: &GameKey, playerdata: &PlayerData)
    -> Result<(), RepositoryError>;

    fn save_linkage(&self, key: &GameKey, linkage: &Linkage) -> Result<(), RepositoryError>;

    /// Keys of every active game, across all guilds.
    fn list_active(&self) -> Result<Vec<GameKey>, RepositoryError>;

    /// Move an active game out of the active set, keeping its document
    /// readable for posterity.
    fn archive(&self, key: &GameKey) -> Result<(), RepositoryError>;

    fn exists(&self, key: &GameKey) -> bool;
}
