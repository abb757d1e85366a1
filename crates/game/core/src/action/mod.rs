//! Mutation entry points for a match.
//!
//! Each operation is a method on [`crate::state::Game`] with its own error
//! enum and a typed outcome describing what changed, so the runtime can
//! translate outcomes into announcements and board updates without peeking
//! at internals. Costed operations debit their own action point; the command
//! router only pre-checks that a point is available.

mod combat;
mod join;
mod jury;
mod movement;
mod quit;
mod start;

pub use combat::{FireError, FireIntent, FireOutcome};
pub use join::{JoinError, JoinOutcome};
pub use jury::{DailySummary, VoteError};
pub use movement::{Direction, MoveError, MoveOutcome};
pub use quit::{QuitError, QuitOutcome};
pub use start::{StartError, StartOutcome};
