//! Tank movement: one cell per command, no diagonals.

use crate::error::ErrorKind;
use crate::state::{Game, PlayerId, Position};

/// A movement direction in board coordinates (origin top-left).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("the game has not started yet")]
    NotStarted,

    #[error("{id} is not a player in this game")]
    NotAPlayer { id: PlayerId },

    #[error("destination {destination} is outside the board")]
    OutOfBounds { destination: Position },

    #[error("another tank already occupies {destination}")]
    CellOccupied { destination: Position },
}

impl MoveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotStarted | Self::NotAPlayer { .. } => ErrorKind::State,
            Self::OutOfBounds { .. } | Self::CellOccupied { .. } => ErrorKind::RuleViolation,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub from: Position,
    pub to: Position,
}

impl Game {
    /// Moves a tank one cell. Legality is checked before any mutation, so a
    /// rejected move leaves position and action points untouched. Debits one
    /// action point on success; the router pre-checks that one is available.
    pub fn move_tank(
        &mut self,
        id: &PlayerId,
        direction: Direction,
    ) -> Result<MoveOutcome, MoveError> {
        let board = self.playerdata.board.ok_or(MoveError::NotStarted)?;
        let player = self
            .playerdata
            .alive
            .get(id)
            .ok_or_else(|| MoveError::NotAPlayer { id: id.clone() })?;
        let from = player.position.ok_or(MoveError::NotStarted)?;

        let (dx, dy) = direction.delta();
        let destination = Position::new(from.x + dx, from.y + dy);
        if !board.contains(destination) {
            return Err(MoveError::OutOfBounds { destination });
        }
        if self.tank_at(destination).is_some() {
            return Err(MoveError::CellOccupied { destination });
        }

        if let Some(player) = self.playerdata.alive.get_mut(id) {
            player.position = Some(destination);
            player.action_points = player.action_points.saturating_sub(1);
        }
        Ok(MoveOutcome {
            from,
            to: destination,
        })
    }
}
