//! Deterministic Tank Tactics rules and data types.
//!
//! `tactics-core` defines the canonical game model (board, roster, votes),
//! the invariant-preserving mutation entry points (join, start, move, fire,
//! quit, vote, daily tick), the color allocator, and the schema-validated
//! settings registry. It is pure and synchronous: randomness comes in
//! through injected `Rng` handles and all I/O lives in supporting crates.

pub mod action;
pub mod color;
pub mod error;
pub mod settings;
pub mod state;

pub use action::{
    DailySummary, Direction, FireError, FireIntent, FireOutcome, JoinError, JoinOutcome,
    MoveError, MoveOutcome, QuitError, QuitOutcome, StartError, StartOutcome, VoteError,
};
pub use color::{ColorName, ColorPair, HexColor};
pub use error::{CoreError, ErrorKind};
pub use settings::{Overrides, SettingValue, SettingsError, SettingsPath, TimeOfDay};
pub use state::{Board, Extent, Game, Player, PlayerData, PlayerId, Position};
