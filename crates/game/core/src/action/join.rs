//! Joining the roster before the game starts.

use rand::Rng;

use crate::action::start::StartOutcome;
use crate::color::{self, ColorPair};
use crate::error::ErrorKind;
use crate::settings;
use crate::state::{Game, Player, PlayerId};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum JoinError {
    #[error("the game has already started")]
    AlreadyStarted,

    #[error("player {id} has already joined")]
    AlreadyJoined { id: PlayerId },

    #[error("`{requested}` is not a valid color or color pairing")]
    InvalidColor { requested: String },

    #[error("the color {color} is already taken")]
    ColorInUse { color: ColorPair },

    #[error("every color pairing is already in use")]
    NoColorsAvailable,
}

impl JoinError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyStarted | Self::AlreadyJoined { .. } => ErrorKind::State,
            Self::InvalidColor { .. } | Self::ColorInUse { .. } => ErrorKind::Validation,
            Self::NoColorsAvailable => ErrorKind::ResourceExhausted,
        }
    }
}

/// What `join` produced. When the roster hits the configured maximum the
/// start fires automatically; `below_minimum` flags an auto-start that was
/// forced below the configured minimum (surfaced as a warning, not an
/// error).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinOutcome {
    pub color: ColorPair,
    pub auto_start: Option<StartOutcome>,
    pub below_minimum: bool,
}

impl Game {
    /// Adds a player to the roster with a real color and placeholder stats.
    ///
    /// An explicit color request must name an unused member of the identity
    /// space (a bare color normalizes to its self-pair); an omitted request
    /// draws uniformly from the unused pool.
    pub fn join<R: Rng + ?Sized>(
        &mut self,
        id: PlayerId,
        requested_color: Option<&str>,
        rng: &mut R,
    ) -> Result<JoinOutcome, JoinError> {
        if self.started() {
            return Err(JoinError::AlreadyStarted);
        }
        if self.playerdata.alive.contains_key(&id) {
            return Err(JoinError::AlreadyJoined { id });
        }

        let color = match requested_color {
            Some(raw) => {
                let pair: ColorPair = raw.parse().map_err(|_| JoinError::InvalidColor {
                    requested: raw.to_owned(),
                })?;
                if self.tank_with_color(pair).is_some() {
                    return Err(JoinError::ColorInUse { color: pair });
                }
                pair
            }
            None => {
                let taken: Vec<ColorPair> =
                    self.playerdata.alive.values().map(|p| p.color).collect();
                color::random_unused(&taken, rng).ok_or(JoinError::NoColorsAvailable)?
            }
        };

        self.playerdata
            .alive
            .insert(id.clone(), Player::joined(id, color));

        let mut outcome = JoinOutcome {
            color,
            auto_start: None,
            below_minimum: false,
        };
        if let Some(maximum) = settings::int_opt(&self.settings, &["gameplay", "maximum_players"])
            && self.alive_count() as i64 >= maximum
        {
            let minimum = settings::int(&self.settings, &["gameplay", "minimum_players"]);
            outcome.below_minimum = (self.alive_count() as i64) < minimum;
            outcome.auto_start = Some(self.start_unchecked(rng));
        }
        Ok(outcome)
    }
}
