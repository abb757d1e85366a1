//! Identifiers and transport linkage shared across the runtime.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of one game: the hosting community plus the game name
/// chosen at creation. Doubles as the persistence directory layout.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameKey {
    pub guild: String,
    pub name: String,
}

impl GameKey {
    pub fn new(guild: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            guild: guild.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.guild, self.name)
    }
}

/// Opaque transport-side identifiers a game holds on to: the chat roles it
/// grants (player, juror) and the channels it renders into. The runtime
/// never interprets these, it only stores them for the transport layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Linkage {
    #[serde(default)]
    pub roles: BTreeMap<String, String>,
    #[serde(default)]
    pub channels: BTreeMap<String, String>,
}

/// Chat-side role a player identity can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleKind {
    /// An alive tank owner.
    Player,
    /// An eliminated player with a jury vote.
    Juror,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_displays_as_guild_slash_name() {
        let key = GameKey::new("guild-1", "skirmish");
        assert_eq!(key.to_string(), "guild-1/skirmish");
    }

    #[test]
    fn linkage_tolerates_missing_sections() {
        let linkage: Linkage = serde_json::from_str("{}").unwrap();
        assert!(linkage.roles.is_empty());
        assert!(linkage.channels.is_empty());
    }
}
