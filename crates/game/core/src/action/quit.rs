//! Voluntary resignation.

use crate::color::ColorPair;
use crate::error::ErrorKind;
use crate::state::{Game, PlayerId, Position};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum QuitError {
    #[error("{id} is not a player in this game")]
    NotAPlayer { id: PlayerId },
}

impl QuitError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::State
    }
}

/// What `quit` produced: the vacated cell and its color when the board was
/// live, `None` for a pre-start resignation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuitOutcome {
    pub vacated: Option<(Position, ColorPair)>,
}

impl Game {
    /// Removes the player's roster entry terminally. Shares the elimination
    /// path with a fatal shot, so the board cell is vacated and the
    /// jury-role transition is signaled the same way.
    pub fn quit(&mut self, id: &PlayerId) -> Result<QuitOutcome, QuitError> {
        if !self.playerdata.alive.contains_key(id) {
            return Err(QuitError::NotAPlayer { id: id.clone() });
        }
        Ok(QuitOutcome {
            vacated: self.eliminate(id),
        })
    }
}
