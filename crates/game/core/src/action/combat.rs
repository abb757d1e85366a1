//! Firing at tanks in range: attacks take health, support gifts a point.

use crate::color::ColorPair;
use crate::error::ErrorKind;
use crate::settings;
use crate::state::{Game, PlayerId, Position};

/// What a shell carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireIntent {
    /// Take one health from the target.
    Attack,
    /// Gift the target one action point.
    Support,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FireError {
    #[error("the game has not started yet")]
    NotStarted,

    #[error("{id} is not a player in this game")]
    NotAPlayer { id: PlayerId },

    #[error("you cannot fire at your own tank")]
    SelfTarget,

    #[error("{target} is not an alive player in this game")]
    InvalidTarget { target: PlayerId },

    #[error("target is out of range: distance {distance}, range {range}")]
    OutOfRange { distance: u32, range: u32 },
}

impl FireError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotStarted | Self::NotAPlayer { .. } => ErrorKind::State,
            Self::SelfTarget | Self::InvalidTarget { .. } => ErrorKind::Validation,
            Self::OutOfRange { .. } => ErrorKind::RuleViolation,
        }
    }
}

/// Outcome of a shot. A fatal hit is distinct from a non-fatal one so the
/// runtime can vacate the board cell and signal the jury-role transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FireOutcome {
    Hit {
        target: PlayerId,
        remaining_health: u32,
    },
    Fatal {
        target: PlayerId,
        vacated: Position,
        color: ColorPair,
    },
    Supported {
        target: PlayerId,
        target_points: u32,
    },
}

impl Game {
    /// Fires at a target within Chebyshev range (inclusive bound). Debits
    /// one actor action point on success regardless of intent; the router
    /// pre-checks that one is available.
    pub fn fire(
        &mut self,
        actor: &PlayerId,
        intent: FireIntent,
        target: &PlayerId,
    ) -> Result<FireOutcome, FireError> {
        if !self.started() {
            return Err(FireError::NotStarted);
        }
        if target == actor {
            return Err(FireError::SelfTarget);
        }
        let actor_state = self
            .playerdata
            .alive
            .get(actor)
            .ok_or_else(|| FireError::NotAPlayer { id: actor.clone() })?;
        let target_state = self
            .playerdata
            .alive
            .get(target)
            .ok_or_else(|| FireError::InvalidTarget {
                target: target.clone(),
            })?;
        let (actor_pos, target_pos) = match (actor_state.position, target_state.position) {
            (Some(a), Some(t)) => (a, t),
            _ => return Err(FireError::NotStarted),
        };

        let distance = actor_pos.chebyshev_distance(target_pos);
        let range = settings::int(&self.settings, &["gameplay", "fire_range"]).max(0) as u32;
        if distance > range {
            return Err(FireError::OutOfRange { distance, range });
        }

        let target_color = target_state.color;
        if let Some(actor_state) = self.playerdata.alive.get_mut(actor) {
            actor_state.action_points = actor_state.action_points.saturating_sub(1);
        }

        match intent {
            FireIntent::Support => {
                let points = self
                    .playerdata
                    .alive
                    .get_mut(target)
                    .map(|t| {
                        t.action_points += 1;
                        t.action_points
                    })
                    .unwrap_or_default();
                Ok(FireOutcome::Supported {
                    target: target.clone(),
                    target_points: points,
                })
            }
            FireIntent::Attack => {
                let remaining = self
                    .playerdata
                    .alive
                    .get_mut(target)
                    .map(|t| {
                        t.health = t.health.saturating_sub(1);
                        t.health
                    })
                    .unwrap_or_default();
                if remaining == 0 {
                    self.eliminate(target);
                    Ok(FireOutcome::Fatal {
                        target: target.clone(),
                        vacated: target_pos,
                        color: target_color,
                    })
                } else {
                    Ok(FireOutcome::Hit {
                        target: target.clone(),
                        remaining_health: remaining,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorName, ColorPair};
    use crate::settings::{SettingValue, SettingsPath};
    use crate::state::{Board, Extent, Player};

    fn combat_game(positions: &[(&str, Position)]) -> Game {
        let mut game = Game::new();
        let palette = [ColorName::Red, ColorName::Blue, ColorName::Teal];
        for (i, (id, position)) in positions.iter().enumerate() {
            let id: PlayerId = (*id).into();
            game.playerdata.alive.insert(
                id.clone(),
                Player {
                    id,
                    color: ColorPair::solid(palette[i % palette.len()]),
                    health: 2,
                    action_points: 3,
                    position: Some(*position),
                },
            );
        }
        game.playerdata.board = Some(Board {
            origin: Position::ORIGIN,
            size: Extent {
                width: 8,
                height: 8,
            },
        });
        game.playerdata.started = true;
        game
    }

    fn points(game: &Game, id: &str) -> u32 {
        game.player(&id.into()).unwrap().action_points
    }

    #[test]
    fn attack_takes_one_health_and_one_actor_point() {
        let mut game = combat_game(&[
            ("alice", Position::new(0, 0)),
            ("bob", Position::new(2, 2)),
        ]);
        let outcome = game
            .fire(&"alice".into(), FireIntent::Attack, &"bob".into())
            .unwrap();
        assert_eq!(
            outcome,
            FireOutcome::Hit {
                target: "bob".into(),
                remaining_health: 1
            }
        );
        assert_eq!(points(&game, "alice"), 2);
        assert_eq!(game.player(&"bob".into()).unwrap().health, 1);
    }

    #[test]
    fn fatal_shot_removes_the_target_exactly_once() {
        let mut game = combat_game(&[
            ("alice", Position::new(0, 0)),
            ("bob", Position::new(1, 1)),
        ]);
        let bob_color = game.player(&"bob".into()).unwrap().color;

        game.fire(&"alice".into(), FireIntent::Attack, &"bob".into())
            .unwrap();
        let outcome = game
            .fire(&"alice".into(), FireIntent::Attack, &"bob".into())
            .unwrap();
        assert_eq!(
            outcome,
            FireOutcome::Fatal {
                target: "bob".into(),
                vacated: Position::new(1, 1),
                color: bob_color,
            }
        );
        assert!(game.player(&"bob".into()).is_none());

        // The entry is gone; a third shot is an invalid target.
        assert_eq!(
            game.fire(&"alice".into(), FireIntent::Attack, &"bob".into()),
            Err(FireError::InvalidTarget {
                target: "bob".into()
            })
        );
    }

    #[test]
    fn support_gifts_a_point_and_never_touches_health() {
        let mut game = combat_game(&[
            ("alice", Position::new(0, 0)),
            ("bob", Position::new(2, 2)),
        ]);
        let outcome = game
            .fire(&"alice".into(), FireIntent::Support, &"bob".into())
            .unwrap();
        assert_eq!(
            outcome,
            FireOutcome::Supported {
                target: "bob".into(),
                target_points: 4
            }
        );
        assert_eq!(points(&game, "alice"), 2);
        assert_eq!(game.player(&"bob".into()).unwrap().health, 2);
    }

    #[test]
    fn range_bound_is_inclusive() {
        // Default range 3: Chebyshev distance 3 succeeds, 4 fails.
        let mut game = combat_game(&[
            ("alice", Position::new(0, 0)),
            ("bob", Position::new(3, 3)),
            ("carol", Position::new(4, 4)),
        ]);
        assert!(
            game.fire(&"alice".into(), FireIntent::Attack, &"bob".into())
                .is_ok()
        );
        assert_eq!(
            game.fire(&"alice".into(), FireIntent::Attack, &"carol".into()),
            Err(FireError::OutOfRange {
                distance: 4,
                range: 3
            })
        );
    }

    #[test]
    fn configured_range_is_respected() {
        let mut game = combat_game(&[
            ("alice", Position::new(0, 0)),
            ("bob", Position::new(3, 3)),
        ]);
        let path: SettingsPath = "gameplay.fire_range".parse().unwrap();
        settings::set(&mut game.settings, &path, SettingValue::Int(2));
        assert_eq!(
            game.fire(&"alice".into(), FireIntent::Attack, &"bob".into()),
            Err(FireError::OutOfRange {
                distance: 3,
                range: 2
            })
        );
    }

    #[test]
    fn self_and_unknown_targets_are_rejected() {
        let mut game = combat_game(&[("alice", Position::new(0, 0))]);
        assert_eq!(
            game.fire(&"alice".into(), FireIntent::Attack, &"alice".into()),
            Err(FireError::SelfTarget)
        );
        assert_eq!(
            game.fire(&"alice".into(), FireIntent::Attack, &"ghost".into()),
            Err(FireError::InvalidTarget {
                target: "ghost".into()
            })
        );
        // A rejected shot costs nothing.
        assert_eq!(points(&game, "alice"), 3);
    }

    #[test]
    fn firing_before_start_fails() {
        let mut game = Game::new();
        assert_eq!(
            game.fire(&"alice".into(), FireIntent::Attack, &"bob".into()),
            Err(FireError::NotStarted)
        );
    }
}
