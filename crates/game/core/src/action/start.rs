//! Game start and the spawn layout algorithm.
//!
//! The board is partitioned into a near-square grid of NxN "personal-space"
//! cells, one per player in roster enumeration order; each tank spawns at a
//! uniform random offset within its cell. Two tanks assigned to the same
//! cell may collide; that is an accepted rare edge case, resolved by the
//! first move.

use rand::Rng;

use crate::error::ErrorKind;
use crate::settings;
use crate::state::{Board, Extent, Game, PlayerId, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StartError {
    #[error("the game has already started")]
    AlreadyStarted,

    #[error("not enough players to start: have {have}, need {need}")]
    InsufficientPlayers { have: usize, need: usize },
}

impl StartError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyStarted => ErrorKind::State,
            Self::InsufficientPlayers { .. } => ErrorKind::ResourceExhausted,
        }
    }
}

/// What `start` produced: the board and every assigned spawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartOutcome {
    pub board: Board,
    pub spawns: Vec<(PlayerId, Position)>,
}

/// Near-square personal-space grid for `n` players: the smallest square
/// column count, rows filled as needed.
fn grid(n: usize) -> (usize, usize) {
    let mut cols = 1;
    while cols * cols < n {
        cols += 1;
    }
    (cols, n.div_ceil(cols))
}

impl Game {
    /// Starts the game: computes the board, places every tank, and sets
    /// initial health and action points atomically.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<StartOutcome, StartError> {
        if self.started() {
            return Err(StartError::AlreadyStarted);
        }
        let have = self.alive_count();
        let need = settings::int(&self.settings, &["gameplay", "minimum_players"]) as usize;
        if have < need {
            return Err(StartError::InsufficientPlayers { have, need });
        }
        Ok(self.start_unchecked(rng))
    }

    /// The start effect without the minimum-players check; the auto-start
    /// path uses this when the configured maximum is below the minimum.
    pub(crate) fn start_unchecked<R: Rng + ?Sized>(&mut self, rng: &mut R) -> StartOutcome {
        let n = self.alive_count();
        let cell = settings::int(&self.settings, &["gameplay", "personal_space_size"]).max(1) as u32;
        let initial_health =
            settings::int(&self.settings, &["gameplay", "initial_health"]).max(0) as u32;
        let initial_actions =
            settings::int(&self.settings, &["gameplay", "initial_actions"]).max(0) as u32;

        let (cols, rows) = grid(n);
        let board = Board {
            origin: Position::ORIGIN,
            size: Extent {
                width: cols as u32 * cell,
                height: rows as u32 * cell,
            },
        };

        let mut spawns = Vec::with_capacity(n);
        for (i, player) in self.playerdata.alive.values_mut().enumerate() {
            let cell_x = (i % cols) as u32 * cell;
            let cell_y = (i / cols) as u32 * cell;
            let position = Position::new(
                (cell_x + rng.gen_range(0..cell)) as i32,
                (cell_y + rng.gen_range(0..cell)) as i32,
            );
            player.position = Some(position);
            player.health = initial_health;
            player.action_points = initial_actions;
            spawns.push((player.id.clone(), position));
        }

        self.playerdata.board = Some(board);
        self.playerdata.started = true;
        StartOutcome { board, spawns }
    }
}
