//! Chat command grammar, authorization, and execution.
//!
//! One inbound chat message becomes a [`Command`], gets authorized against
//! a fixed contract (game-master gate, then roster membership, then action
//! points), and executes against the game to produce a reply plus side
//! effects for the event bus. Rule checks themselves live in
//! `tactics-core`; this layer only owns the contract ordering and the
//! user-facing phrasing.

use rand::Rng;

use tactics_core::{
    Board, ColorPair, CoreError, Direction, FireIntent, FireOutcome, Game, PlayerId, Position,
    SettingsPath, StartOutcome, settings,
};

use crate::error::Result;
use crate::types::RoleKind;

/// A parsed chat command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Join { color: Option<String> },
    Start,
    Move { direction: Direction },
    Fire { intent: FireIntent, target: PlayerId },
    Vote { target: PlayerId },
    Quit,
    /// Describe a setting, or change it when a value is given.
    Setting {
        path: SettingsPath,
        value: Option<String>,
    },
    Redraw,
    Help,
}

/// What a command demands before it may run. Checked strictly in the
/// order game master, then roster membership, then action points, so a
/// non-player game master is told about the membership problem rather
/// than a point problem.
#[derive(Clone, Copy, Debug, Default)]
pub struct CommandSpec {
    pub requires_gm: bool,
    pub requires_player: bool,
    pub costs_point: bool,
}

impl Command {
    pub fn spec(&self) -> CommandSpec {
        match self {
            Command::Start | Command::Redraw => CommandSpec {
                requires_gm: true,
                ..CommandSpec::default()
            },
            Command::Move { .. } | Command::Fire { .. } => CommandSpec {
                requires_player: true,
                costs_point: true,
                ..CommandSpec::default()
            },
            Command::Setting { value: Some(_), .. } => CommandSpec {
                requires_gm: true,
                ..CommandSpec::default()
            },
            Command::Join { .. }
            | Command::Vote { .. }
            | Command::Quit
            | Command::Setting { value: None, .. }
            | Command::Help => CommandSpec::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseCommandError {
    #[error("say something; try `help`")]
    Empty,

    #[error("`{verb}` is not a command; try `help`")]
    UnknownCommand { verb: String },

    #[error("`{verb}` needs a {what}")]
    MissingArgument {
        verb: &'static str,
        what: &'static str,
    },

    #[error("`{raw}` is not a direction (up, down, left or right)")]
    InvalidDirection { raw: String },
}

/// Parses one chat message into a command. Verbs are case-insensitive;
/// arguments keep their case (player names and colors care).
pub fn parse(input: &str) -> std::result::Result<Command, ParseCommandError> {
    fn target_of<'a>(
        words: &mut impl Iterator<Item = &'a str>,
        verb: &'static str,
    ) -> std::result::Result<PlayerId, ParseCommandError> {
        words
            .next()
            .map(PlayerId::from)
            .ok_or(ParseCommandError::MissingArgument {
                verb,
                what: "target player",
            })
    }

    let mut words = input.split_whitespace();
    let verb = words.next().ok_or(ParseCommandError::Empty)?;

    match verb.to_ascii_lowercase().as_str() {
        "join" => Ok(Command::Join {
            color: words.next().map(str::to_owned),
        }),
        "start" => Ok(Command::Start),
        "move" => {
            let raw = words.next().ok_or(ParseCommandError::MissingArgument {
                verb: "move",
                what: "direction",
            })?;
            let direction = raw
                .parse()
                .map_err(|_| ParseCommandError::InvalidDirection {
                    raw: raw.to_owned(),
                })?;
            Ok(Command::Move { direction })
        }
        "fire" => Ok(Command::Fire {
            intent: FireIntent::Attack,
            target: target_of(&mut words, "fire")?,
        }),
        "gift" => Ok(Command::Fire {
            intent: FireIntent::Support,
            target: target_of(&mut words, "gift")?,
        }),
        "vote" => Ok(Command::Vote {
            target: target_of(&mut words, "vote")?,
        }),
        "quit" => Ok(Command::Quit),
        "setting" | "settings" => {
            let path = match words.next() {
                // The path grammar accepts any dotted string; unknown
                // paths fail later with a proper settings error.
                Some(raw) => raw.parse().unwrap_or_default(),
                None => SettingsPath::ROOT,
            };
            Ok(Command::Setting {
                path,
                value: words.next().map(str::to_owned),
            })
        }
        "redraw" => Ok(Command::Redraw),
        "help" => Ok(Command::Help),
        other => Err(ParseCommandError::UnknownCommand {
            verb: other.to_owned(),
        }),
    }
}

/// One help line per command, in grammar order.
pub fn help_lines() -> &'static [&'static str] {
    &[
        "`join [color]` - claim a tank before the game starts",
        "`start` - begin the game (game master only)",
        "`move <up|down|left|right>` - move one cell (costs an action point)",
        "`fire <player>` - attack a tank in range (costs an action point)",
        "`gift <player>` - hand a tank in range an action point (costs an action point)",
        "`vote <player>` - as a juror, vote a survivor a bonus point",
        "`quit` - resign from the game for good",
        "`settings [path] [value]` - inspect settings, or change one (game master only)",
        "`redraw` - repaint the board (game master only)",
    ]
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("only the game master can do that")]
    GameMasterOnly,

    #[error("{id} is not a player in this game")]
    NotAPlayer { id: PlayerId },

    #[error("you have no action points left")]
    NoActionPoints,
}

/// Enforces a command's contract against the current game.
pub fn authorize(
    game: &Game,
    actor: &PlayerId,
    is_gm: bool,
    spec: CommandSpec,
) -> std::result::Result<(), AuthError> {
    if spec.requires_gm && !is_gm {
        return Err(AuthError::GameMasterOnly);
    }
    if spec.requires_player {
        let player = game
            .player(actor)
            .ok_or_else(|| AuthError::NotAPlayer { id: actor.clone() })?;
        if spec.costs_point && player.action_points == 0 {
            return Err(AuthError::NoActionPoints);
        }
    }
    Ok(())
}

/// A board or roster side effect of a successful command, still unkeyed;
/// the worker stamps the game key on and publishes.
#[derive(Clone, Debug)]
pub enum Effect {
    Announce(String),
    BoardCreated {
        board: Board,
        tanks: Vec<(Position, ColorPair)>,
    },
    CellFilled {
        position: Position,
        color: ColorPair,
    },
    CellCleared {
        position: Position,
    },
    RoleGranted {
        player: PlayerId,
        role: RoleKind,
    },
}

/// What a successful command sends back: a direct reply, bus effects, and
/// which persisted sections the command dirtied.
#[derive(Clone, Debug, Default)]
pub struct CommandReply {
    pub message: String,
    pub effects: Vec<Effect>,
    pub persist_playerdata: bool,
    pub persist_settings: bool,
}

impl CommandReply {
    fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

/// Runs one authorized command against the game.
///
/// The in-memory mutation is the source of truth; the caller persists the
/// dirtied sections afterwards and publishes the effects.
pub fn execute<R: Rng + ?Sized>(
    game: &mut Game,
    actor: &PlayerId,
    is_gm: bool,
    command: Command,
    rng: &mut R,
) -> Result<CommandReply> {
    authorize(game, actor, is_gm, command.spec())?;

    match command {
        Command::Join { color } => {
            let outcome = game
                .join(actor.clone(), color.as_deref(), rng)
                .map_err(CoreError::from)?;
            let mut reply = CommandReply {
                message: format!("Welcome to the game! Your tank is {}.", outcome.color),
                effects: vec![
                    Effect::RoleGranted {
                        player: actor.clone(),
                        role: RoleKind::Player,
                    },
                    Effect::Announce(format!("{actor} joined the game as {}.", outcome.color)),
                ],
                persist_playerdata: true,
                persist_settings: false,
            };
            if let Some(start) = outcome.auto_start {
                reply
                    .effects
                    .push(Effect::Announce("The roster is full.".to_owned()));
                if outcome.below_minimum {
                    reply.effects.push(Effect::Announce(
                        "Warning: starting below the configured minimum player count.".to_owned(),
                    ));
                }
                push_start_effects(game, &start, &mut reply.effects);
            }
            Ok(reply)
        }
        Command::Start => {
            let outcome = game.start(rng).map_err(CoreError::from)?;
            let mut reply = CommandReply {
                message: "The game has begun!".to_owned(),
                persist_playerdata: true,
                ..CommandReply::default()
            };
            push_start_effects(game, &outcome, &mut reply.effects);
            Ok(reply)
        }
        Command::Move { direction } => {
            let outcome = game.move_tank(actor, direction).map_err(CoreError::from)?;
            let mut effects = vec![Effect::CellCleared {
                position: outcome.from,
            }];
            if let Some(player) = game.player(actor) {
                effects.push(Effect::CellFilled {
                    position: outcome.to,
                    color: player.color,
                });
            }
            Ok(CommandReply {
                message: format!("Moved {direction} to {}.", outcome.to),
                effects,
                persist_playerdata: true,
                persist_settings: false,
            })
        }
        Command::Fire { intent, target } => {
            let outcome = game.fire(actor, intent, &target).map_err(CoreError::from)?;
            let mut reply = CommandReply {
                persist_playerdata: true,
                ..CommandReply::default()
            };
            match outcome {
                FireOutcome::Hit {
                    target,
                    remaining_health,
                } => {
                    reply.message =
                        format!("Direct hit on {target}! {remaining_health} health remaining.");
                    reply.effects.push(Effect::Announce(format!(
                        "{actor} fired on {target}."
                    )));
                }
                FireOutcome::Fatal {
                    target, vacated, ..
                } => {
                    reply.message = format!("{target} is out of the game.");
                    reply.effects.extend([
                        Effect::CellCleared { position: vacated },
                        Effect::RoleGranted {
                            player: target.clone(),
                            role: RoleKind::Juror,
                        },
                        Effect::Announce(format!(
                            "{target}'s tank was destroyed by {actor}. {target} joins the jury."
                        )),
                    ]);
                }
                FireOutcome::Supported {
                    target,
                    target_points,
                } => {
                    reply.message =
                        format!("Gifted an action point to {target} ({target_points} total).");
                }
            }
            Ok(reply)
        }
        Command::Vote { target } => {
            game.cast_vote(actor.clone(), target.clone())
                .map_err(CoreError::from)?;
            Ok(CommandReply {
                message: format!("Your vote for {target} is in."),
                persist_playerdata: true,
                ..CommandReply::default()
            })
        }
        Command::Quit => {
            let outcome = game.quit(actor).map_err(CoreError::from)?;
            let mut reply = CommandReply {
                message: "You are out of the game. Thanks for playing.".to_owned(),
                effects: vec![Effect::Announce(format!("{actor} left the game."))],
                persist_playerdata: true,
                persist_settings: false,
            };
            if let Some((position, _)) = outcome.vacated {
                reply.effects.extend([
                    Effect::CellCleared { position },
                    Effect::RoleGranted {
                        player: actor.clone(),
                        role: RoleKind::Juror,
                    },
                ]);
            }
            Ok(reply)
        }
        Command::Setting { path, value: None } => {
            let text = settings::describe(&game.settings, &path).map_err(CoreError::from)?;
            Ok(CommandReply::text(text))
        }
        Command::Setting {
            path,
            value: Some(raw),
        } => {
            let value = settings::parse(&path, &raw).map_err(CoreError::from)?;
            settings::set(&mut game.settings, &path, value.clone());
            Ok(CommandReply {
                message: format!("`{path}` is now {value}."),
                persist_settings: true,
                ..CommandReply::default()
            })
        }
        Command::Redraw => match game.playerdata.board {
            Some(board) => Ok(CommandReply {
                message: "Repainting the board.".to_owned(),
                effects: vec![Effect::BoardCreated {
                    board,
                    tanks: tanks(game),
                }],
                ..CommandReply::default()
            }),
            None => Ok(CommandReply::text("There is no board to repaint yet.")),
        },
        Command::Help => Ok(CommandReply::text(help_lines().join("\n"))),
    }
}

fn push_start_effects(game: &Game, outcome: &StartOutcome, effects: &mut Vec<Effect>) {
    effects.push(Effect::Announce(
        "The game has begun! Tanks are on the board.".to_owned(),
    ));
    effects.push(Effect::BoardCreated {
        board: outcome.board,
        tanks: tanks(game),
    });
}

fn tanks(game: &Game) -> Vec<(Position, ColorPair)> {
    game.playerdata
        .alive
        .values()
        .filter_map(|player| player.position.map(|position| (position, player.color)))
        .collect()
}
