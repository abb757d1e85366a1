//! Authoritative in-memory representation of one match.
//!
//! [`Game`] owns the settings overrides and the player data; all mutation
//! flows through the operation methods in [`crate::action`]. Runtime layers
//! clone or query this state but never reach around those entry points.

mod types;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::ColorPair;
use crate::settings::{self, Overrides};

pub use types::{Board, Extent, Player, PlayerId, Position};

/// The persisted gameplay section of a match: roster, votes, board, and the
/// started flag. Serialized as the `playerdata` document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    /// Tanks currently alive and in play. A `BTreeMap` keeps enumeration
    /// stable across persistence round-trips, which the spawn assignment
    /// relies on.
    pub alive: BTreeMap<PlayerId, Player>,
    /// One overwritable vote per juror, cleared every daily cycle.
    pub votes: BTreeMap<PlayerId, PlayerId>,
    /// Set if and only if `started`.
    pub board: Option<Board>,
    pub started: bool,
}

/// One match instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    /// Stored setting overrides; unset paths fall back to schema defaults.
    pub settings: Overrides,
    pub playerdata: PlayerData,
}

impl Game {
    pub fn new() -> Self {
        Self {
            settings: settings::empty_overrides(),
            playerdata: PlayerData::default(),
        }
    }

    /// Rebuilds a game from its persisted sections.
    pub fn from_sections(settings: Overrides, playerdata: PlayerData) -> Self {
        Self {
            settings,
            playerdata,
        }
    }

    pub fn started(&self) -> bool {
        self.playerdata.started
    }

    pub fn alive_count(&self) -> usize {
        self.playerdata.alive.len()
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.playerdata.alive.get(id)
    }

    /// The tank occupying a position, if any.
    pub fn tank_at(&self, position: Position) -> Option<&Player> {
        self.playerdata
            .alive
            .values()
            .find(|player| player.position == Some(position))
    }

    /// The tank holding a color pairing, if any.
    pub fn tank_with_color(&self, color: ColorPair) -> Option<&Player> {
        self.playerdata
            .alive
            .values()
            .find(|player| player.color == color)
    }

    /// Removes a player from the roster terminally, reporting the vacated
    /// cell when the board was live. Shared by the fatal-shot path and
    /// voluntary quit; also drops the player's own pending jury vote.
    pub(crate) fn eliminate(&mut self, id: &PlayerId) -> Option<(Position, ColorPair)> {
        let player = self.playerdata.alive.remove(id)?;
        self.playerdata.votes.remove(id);
        player.position.map(|position| (position, player.color))
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorName, ColorPair};

    fn player_at(id: &str, color: ColorPair, position: Position) -> Player {
        Player {
            id: id.into(),
            color,
            health: 3,
            action_points: 1,
            position: Some(position),
        }
    }

    #[test]
    fn tank_at_matches_exact_position() {
        let mut game = Game::new();
        let pos = Position::new(2, 1);
        game.playerdata.alive.insert(
            "alice".into(),
            player_at("alice", ColorPair::solid(ColorName::Red), pos),
        );

        assert_eq!(game.tank_at(pos).map(|p| p.id.as_str()), Some("alice"));
        assert!(game.tank_at(Position::new(1, 2)).is_none());
    }

    #[test]
    fn tank_with_color_finds_the_holder() {
        let mut game = Game::new();
        let color = ColorPair::new(ColorName::Teal, ColorName::Gold);
        game.playerdata.alive.insert(
            "bob".into(),
            player_at("bob", color, Position::ORIGIN),
        );

        assert_eq!(
            game.tank_with_color(color).map(|p| p.id.as_str()),
            Some("bob")
        );
        assert!(
            game.tank_with_color(ColorPair::solid(ColorName::Red))
                .is_none()
        );
    }

    #[test]
    fn eliminate_is_terminal_and_reports_the_vacated_cell() {
        let mut game = Game::new();
        let pos = Position::new(1, 1);
        let color = ColorPair::solid(ColorName::Blue);
        game.playerdata
            .alive
            .insert("alice".into(), player_at("alice", color, pos));
        game.playerdata
            .votes
            .insert("alice".into(), "bob".into());

        assert_eq!(game.eliminate(&"alice".into()), Some((pos, color)));
        assert!(game.playerdata.alive.is_empty());
        assert!(game.playerdata.votes.is_empty());
        assert_eq!(game.eliminate(&"alice".into()), None);
    }

    #[test]
    fn playerdata_survives_a_json_round_trip() {
        let mut game = Game::new();
        game.playerdata.alive.insert(
            "alice".into(),
            player_at(
                "alice",
                ColorPair::solid(ColorName::Red),
                Position::new(3, 2),
            ),
        );
        game.playerdata.started = true;
        game.playerdata.board = Some(Board {
            origin: Position::ORIGIN,
            size: Extent {
                width: 8,
                height: 8,
            },
        });

        let json = serde_json::to_string(&game.playerdata).unwrap();
        let restored: PlayerData = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, game.playerdata);
    }
}
