//! Runtime error type and the user-facing message policy.

use tactics_core::CoreError;
use tokio::sync::oneshot;

use crate::repository::RepositoryError;
use crate::router::{AuthError, ParseCommandError};
use crate::types::GameKey;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Game(#[from] CoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Parse(#[from] ParseCommandError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("game {key} is not loaded")]
    GameNotLoaded { key: GameKey },

    #[error("game {key} is already loaded")]
    GameAlreadyLoaded { key: GameKey },

    #[error("invalid daily cycle time {hour:02}:{minute:02}")]
    InvalidTime { hour: i64, minute: i64 },

    #[error("game worker is gone")]
    CommandChannelClosed,

    #[error("game worker dropped the reply")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),
}

impl RuntimeError {
    /// Text safe to echo back to the chat. Rule and input problems explain
    /// themselves; infrastructure failures get a generic line so internals
    /// never leak into the channel.
    pub fn user_message(&self) -> String {
        match self {
            Self::Game(e) => e.to_string(),
            Self::Auth(e) => e.to_string(),
            Self::Parse(e) => e.to_string(),
            Self::Repository(_)
            | Self::GameNotLoaded { .. }
            | Self::GameAlreadyLoaded { .. }
            | Self::InvalidTime { .. }
            | Self::CommandChannelClosed
            | Self::ReplyChannelClosed(_) => {
                "Something went wrong on our end. Please try again in a moment.".to_owned()
            }
        }
    }
}
