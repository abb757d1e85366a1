//! Jury votes and the daily point-grant cycle.
//!
//! Eliminated players form the jury. Each juror holds one overwritable vote
//! for a survivor; the daily cycle tallies the votes, grants bonus points,
//! and clears the ballot regardless of outcome.

use std::collections::BTreeMap;

use crate::error::ErrorKind;
use crate::settings;
use crate::state::{Game, PlayerId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VoteError {
    #[error("the game has not started yet")]
    NotStarted,

    #[error("{id} is still alive and cannot sit on the jury")]
    JurorIsAlive { id: PlayerId },

    #[error("{target} is not an alive player in this game")]
    TargetNotAlive { target: PlayerId },
}

impl VoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotStarted | Self::JurorIsAlive { .. } => ErrorKind::State,
            Self::TargetNotAlive { .. } => ErrorKind::Validation,
        }
    }
}

/// What one daily cycle did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DailySummary {
    /// Alive players granted the daily action points.
    pub granted: Vec<PlayerId>,
    /// Points granted to each player in `granted`.
    pub daily_amount: u32,
    /// Survivors voted in by the jury, one bonus point each.
    pub bonuses: Vec<PlayerId>,
}

impl Game {
    /// Records a juror's vote for a survivor, replacing any earlier vote
    /// from the same juror.
    pub fn cast_vote(&mut self, juror: PlayerId, target: PlayerId) -> Result<(), VoteError> {
        if !self.started() {
            return Err(VoteError::NotStarted);
        }
        if self.playerdata.alive.contains_key(&juror) {
            return Err(VoteError::JurorIsAlive { id: juror });
        }
        if !self.playerdata.alive.contains_key(&target) {
            return Err(VoteError::TargetNotAlive { target });
        }
        self.playerdata.votes.insert(juror, target);
        Ok(())
    }

    /// Applies one daily cycle: grants the configured daily action points to
    /// every alive player, converts the vote tally into at most one bonus
    /// point per voted-in survivor, and clears the ballot. A tick before the
    /// game starts is a no-op.
    pub fn daily_tick(&mut self) -> DailySummary {
        if !self.started() {
            return DailySummary::default();
        }

        let daily_amount =
            settings::int(&self.settings, &["gameplay", "daily_actions"]).max(0) as u32;
        let mut granted = Vec::with_capacity(self.alive_count());
        for player in self.playerdata.alive.values_mut() {
            player.action_points += daily_amount;
            granted.push(player.id.clone());
        }

        let required = settings::int(&self.settings, &["gameplay", "jury_votes_required"]).max(1);
        let mut tally: BTreeMap<&PlayerId, i64> = BTreeMap::new();
        for target in self.playerdata.votes.values() {
            *tally.entry(target).or_default() += 1;
        }
        // One entry per target, so a target crossing the threshold is
        // granted at most once per cycle.
        let voted_in: Vec<PlayerId> = tally
            .into_iter()
            .filter(|(_, count)| *count >= required)
            .map(|(target, _)| target.clone())
            .collect();

        let mut bonuses = Vec::with_capacity(voted_in.len());
        for target in voted_in {
            if let Some(player) = self.playerdata.alive.get_mut(&target) {
                player.action_points += 1;
                bonuses.push(target);
            }
        }

        self.playerdata.votes.clear();
        DailySummary {
            granted,
            daily_amount,
            bonuses,
        }
    }
}
