//! Wall-clock daily cycle per game.
//!
//! One scheduler per loaded game. It sleeps until the configured local
//! time of day, fires the first daily tick, then settles into a fixed
//! 24-hour cadence. Resetting the configured time replaces the task
//! outright, so at most one pending tick exists per game.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime};
use tokio::task::JoinHandle;

use tactics_core::TimeOfDay;

use crate::error::{Result, RuntimeError};
use crate::events::{Event, EventBus};
use crate::handle::GameHandle;
use crate::types::GameKey;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Where the cycle task currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No task is scheduled.
    Idle,
    /// Sleeping toward the first firing at the configured time of day.
    AwaitingFirstFire,
    /// Fired at least once; on a fixed 24-hour cadence from here.
    Recurring,
}

pub struct DailyScheduler {
    key: GameKey,
    handle: GameHandle,
    bus: EventBus,
    task: Option<JoinHandle<()>>,
    phase: Arc<Mutex<Phase>>,
}

impl DailyScheduler {
    pub fn new(key: GameKey, handle: GameHandle, bus: EventBus) -> Self {
        Self {
            key,
            handle,
            bus,
            task: None,
            phase: Arc::new(Mutex::new(Phase::Idle)),
        }
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replaces any pending cycle with one aimed at the given local time
    /// of day.
    pub fn reset(&mut self, hour: i64, minute: i64) -> Result<()> {
        let time = u8::try_from(hour)
            .ok()
            .zip(u8::try_from(minute).ok())
            .and_then(|(h, m)| TimeOfDay::new(h, m))
            .ok_or(RuntimeError::InvalidTime { hour, minute })?;
        self.cancel();

        let key = self.key.clone();
        let handle = self.handle.clone();
        let bus = self.bus.clone();
        let phase = Arc::clone(&self.phase);
        set_phase(&phase, Phase::AwaitingFirstFire);

        self.task = Some(tokio::spawn(async move {
            let delay = delay_until(Local::now().naive_local(), time);
            tracing::debug!(game = %key, %time, ?delay, "daily cycle scheduled");
            tokio::time::sleep(delay).await;

            loop {
                fire(&key, &handle, &bus).await;
                // A failed tick still advances the cadence.
                set_phase(&phase, Phase::Recurring);
                tokio::time::sleep(DAY).await;
            }
        }));
        Ok(())
    }

    /// Stops the pending cycle; nothing fires until the next `reset`.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        set_phase(&self.phase, Phase::Idle);
    }
}

impl Drop for DailyScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn set_phase(phase: &Arc<Mutex<Phase>>, value: Phase) {
    *phase.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = value;
}

async fn fire(key: &GameKey, handle: &GameHandle, bus: &EventBus) {
    let summary = match handle.daily_tick().await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!(game = %key, error = %e, "daily tick failed");
            return;
        }
    };
    // A tick before the game starts grants nothing and stays silent.
    if summary.granted.is_empty() {
        return;
    }

    bus.publish(Event::Announcement {
        key: key.clone(),
        text: format!(
            "Action points have been given to everybody! ({} each)",
            summary.daily_amount
        ),
    });
    for player in &summary.bonuses {
        bus.publish(Event::Announcement {
            key: key.clone(),
            text: format!("The jury has spoken: {player} receives a bonus action point!"),
        });
    }
}

/// Time until the next occurrence of `time`, strictly in the future:
/// a `now` exactly on the mark waits a full day.
fn delay_until(now: NaiveDateTime, time: TimeOfDay) -> Duration {
    let target_time = NaiveTime::from_hms_opt(u32::from(time.hour), u32::from(time.minute), 0)
        .unwrap_or(NaiveTime::MIN);
    let mut target = now.date().and_time(target_time);
    if target <= now {
        target = target + chrono::Duration::days(1);
    }
    (target - now).to_std().unwrap_or_default()
}
