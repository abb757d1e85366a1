//! Async hosting layer for Tank Tactics games.
//!
//! `tactics-runtime` turns the pure rules in `tactics-core` into long-lived
//! hosted games: a worker task per game serializes mutations, a daily
//! scheduler drives the point-grant cycle, a repository persists the game
//! document, and an event bus carries announcements, board updates, and
//! role changes out to whatever transport renders them.

pub mod error;
pub mod events;
pub mod manager;
pub mod repository;
pub mod router;
pub mod scheduler;
pub mod types;

mod handle;
mod worker;

pub use error::{Result, RuntimeError};
pub use events::{Event, EventBus, Topic};
pub use handle::GameHandle;
pub use manager::GameManager;
pub use repository::{
    FileGameRepository, GameDocument, GameRepository, MemoryGameRepository, RepositoryError,
};
pub use router::{AuthError, Command, CommandReply, CommandSpec, Effect, ParseCommandError};
pub use scheduler::{DailyScheduler, Phase};
pub use types::{GameKey, Linkage, RoleKind};
