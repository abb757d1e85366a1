//! Shared error classification for core operations.
//!
//! Every operation returns its own error enum with structured fields; this
//! module provides the taxonomy they classify into and the umbrella type the
//! runtime router works with. All errors are recoverable and user-facing:
//! their `Display` output is suitable for direct display as a reply.

use crate::action::{FireError, JoinError, MoveError, QuitError, StartError, VoteError};
use crate::settings::SettingsError;

/// User-facing error taxonomy. Never process-fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad command argument (invalid direction, malformed color request).
    Validation,
    /// Precondition violated (not started, already joined, not a player).
    State,
    /// A finite resource ran out (no colors left, below player minimum).
    ResourceExhausted,
    /// A game rule rejected the action (out of range, cell occupied).
    RuleViolation,
    /// The actor lacks GM standing for a privileged command.
    NotAuthorized,
    /// An unknown setting path.
    NotFound,
    /// A setting value failed type, bounds, or nullability checks.
    SettingValue,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::State => "state",
            Self::ResourceExhausted => "resource-exhausted",
            Self::RuleViolation => "rule-violation",
            Self::NotAuthorized => "not-authorized",
            Self::NotFound => "not-found",
            Self::SettingValue => "setting-value",
        }
    }
}

/// Umbrella over every per-operation error, carrying its [`ErrorKind`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Join(#[from] JoinError),
    #[error(transparent)]
    Start(#[from] StartError),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Fire(#[from] FireError),
    #[error(transparent)]
    Quit(#[from] QuitError),
    #[error(transparent)]
    Vote(#[from] VoteError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Join(e) => e.kind(),
            Self::Start(e) => e.kind(),
            Self::Move(e) => e.kind(),
            Self::Fire(e) => e.kind(),
            Self::Quit(e) => e.kind(),
            Self::Vote(e) => e.kind(),
            Self::Settings(e) => match e {
                SettingsError::NotFound { .. } => ErrorKind::NotFound,
                _ => ErrorKind::SettingValue,
            },
        }
    }
}
