//! Cloneable client-facing handle to one game's worker.

use tokio::sync::{mpsc, oneshot};

use tactics_core::{DailySummary, Game, PlayerId};

use crate::error::{Result, RuntimeError};
use crate::router::{Command, CommandReply};
use crate::worker::WorkerCommand;

#[derive(Clone)]
pub struct GameHandle {
    command_tx: mpsc::Sender<WorkerCommand>,
}

impl GameHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<WorkerCommand>) -> Self {
        Self { command_tx }
    }

    /// Runs one chat command as `actor` and waits for the reply.
    pub async fn execute(
        &self,
        actor: PlayerId,
        is_gm: bool,
        command: Command,
    ) -> Result<CommandReply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(WorkerCommand::Execute {
            actor,
            is_gm,
            command,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Applies one daily point-grant cycle.
    pub async fn daily_tick(&self) -> Result<DailySummary> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(WorkerCommand::DailyTick { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// A point-in-time copy of the game, for rendering and inspection.
    pub async fn snapshot(&self) -> Result<Game> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(WorkerCommand::Snapshot { reply: reply_tx }).await?;
        reply_rx
            .await
            .map(|game| *game)
            .map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Stops the worker after it drains commands already in flight.
    pub async fn shutdown(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(WorkerCommand::Shutdown { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    async fn send(&self, command: WorkerCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}
