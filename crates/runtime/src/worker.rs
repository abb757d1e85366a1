//! Per-game worker task.
//!
//! Each loaded game is owned by exactly one worker; every mutation flows
//! through its command channel, which is what serializes concurrent chat
//! commands without a lock. The in-memory game is the source of truth:
//! sections are persisted after the mutation, and a persistence failure is
//! logged rather than rolled back.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot};

use tactics_core::{DailySummary, Game, PlayerId};

use crate::error::Result;
use crate::events::{Event, EventBus};
use crate::handle::GameHandle;
use crate::repository::GameRepository;
use crate::router::{self, Command, CommandReply, Effect};
use crate::types::GameKey;

pub(crate) enum WorkerCommand {
    Execute {
        actor: PlayerId,
        is_gm: bool,
        command: Command,
        reply: oneshot::Sender<Result<CommandReply>>,
    },
    DailyTick {
        reply: oneshot::Sender<DailySummary>,
    },
    Snapshot {
        reply: oneshot::Sender<Box<Game>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Spawns the worker task for one game and returns its handle.
pub(crate) fn spawn(
    key: GameKey,
    game: Game,
    repository: Arc<dyn GameRepository>,
    bus: EventBus,
) -> GameHandle {
    let (command_tx, command_rx) = mpsc::channel(32);
    let worker = GameWorker {
        key,
        game,
        repository,
        bus,
        command_rx,
        rng: StdRng::from_entropy(),
    };
    tokio::spawn(worker.run());
    GameHandle::new(command_tx)
}

struct GameWorker {
    key: GameKey,
    game: Game,
    repository: Arc<dyn GameRepository>,
    bus: EventBus,
    command_rx: mpsc::Receiver<WorkerCommand>,
    rng: StdRng,
}

impl GameWorker {
    async fn run(mut self) {
        while let Some(command) = self.command_rx.recv().await {
            match command {
                WorkerCommand::Execute {
                    actor,
                    is_gm,
                    command,
                    reply,
                } => {
                    let result = self.execute(&actor, is_gm, command);
                    let _ = reply.send(result);
                }
                WorkerCommand::DailyTick { reply } => {
                    let summary = self.daily_tick();
                    let _ = reply.send(summary);
                }
                WorkerCommand::Snapshot { reply } => {
                    let _ = reply.send(Box::new(self.game.clone()));
                }
                WorkerCommand::Shutdown { reply } => {
                    let _ = reply.send(());
                    break;
                }
            }
        }
        tracing::debug!(game = %self.key, "game worker stopped");
    }

    fn execute(&mut self, actor: &PlayerId, is_gm: bool, command: Command) -> Result<CommandReply> {
        let reply = router::execute(&mut self.game, actor, is_gm, command, &mut self.rng)?;

        if reply.persist_playerdata
            && let Err(e) = self
                .repository
                .save_playerdata(&self.key, &self.game.playerdata)
        {
            // The in-memory game stays authoritative.
            tracing::error!(game = %self.key, error = %e, "failed to persist playerdata");
        }
        if reply.persist_settings
            && let Err(e) = self.repository.save_settings(&self.key, &self.game.settings)
        {
            tracing::error!(game = %self.key, error = %e, "failed to persist settings");
        }

        for effect in &reply.effects {
            self.bus.publish(self.keyed(effect));
        }
        Ok(reply)
    }

    fn daily_tick(&mut self) -> DailySummary {
        let summary = self.game.daily_tick();
        if !summary.granted.is_empty()
            && let Err(e) = self
                .repository
                .save_playerdata(&self.key, &self.game.playerdata)
        {
            tracing::error!(game = %self.key, error = %e, "failed to persist daily grant");
        }
        summary
    }

    fn keyed(&self, effect: &Effect) -> Event {
        let key = self.key.clone();
        match effect {
            Effect::Announce(text) => Event::Announcement {
                key,
                text: text.clone(),
            },
            Effect::BoardCreated { board, tanks } => Event::BoardCreated {
                key,
                board: *board,
                tanks: tanks.clone(),
            },
            Effect::CellFilled { position, color } => Event::CellFilled {
                key,
                position: *position,
                color: *color,
            },
            Effect::CellCleared { position } => Event::CellCleared {
                key,
                position: *position,
            },
            Effect::RoleGranted { player, role } => Event::RoleGranted {
                key,
                player: player.clone(),
                role: *role,
            },
        }
    }
}
