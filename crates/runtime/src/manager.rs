//! Lifecycle of loaded games: create, load, archive.
//!
//! The manager owns the map from game key to worker handle and daily
//! scheduler. Everything else talks to a game through the handle it
//! hands out.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use tactics_core::{CoreError, Game, settings};

use crate::error::{Result, RuntimeError};
use crate::events::{Event, EventBus};
use crate::handle::GameHandle;
use crate::repository::{GameDocument, GameRepository};
use crate::scheduler::DailyScheduler;
use crate::types::{GameKey, Linkage};
use crate::worker;

struct LoadedGame {
    handle: GameHandle,
    scheduler: DailyScheduler,
}

pub struct GameManager {
    repository: Arc<dyn GameRepository>,
    bus: EventBus,
    games: Mutex<HashMap<GameKey, LoadedGame>>,
}

impl GameManager {
    pub fn new(repository: Arc<dyn GameRepository>, bus: EventBus) -> Self {
        Self {
            repository,
            bus,
            games: Mutex::new(HashMap::new()),
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    /// Creates a brand-new game, persists it, and brings it live.
    pub async fn create(&self, key: GameKey, linkage: Linkage) -> Result<GameHandle> {
        let mut games = self.games.lock().await;
        if games.contains_key(&key) {
            return Err(RuntimeError::GameAlreadyLoaded { key });
        }

        let game = Game::new();
        self.repository.create(
            &key,
            &GameDocument {
                settings: game.settings.clone(),
                playerdata: game.playerdata.clone(),
                linkage,
            },
        )?;

        let handle = self.install(key.clone(), game, &mut games)?;
        self.bus.publish(Event::Announcement {
            key,
            text: "A new game of Tank Tactics is open! Say `join` to claim a tank, \
                   `help` for the rest."
                .to_owned(),
        });
        Ok(handle)
    }

    /// Loads a persisted game and brings it live. Values stored for
    /// settings paths the schema no longer knows are kept on disk but
    /// ignored, with a warning.
    pub async fn load(&self, key: GameKey) -> Result<GameHandle> {
        let mut games = self.games.lock().await;
        if games.contains_key(&key) {
            return Err(RuntimeError::GameAlreadyLoaded { key });
        }

        let document = self.repository.load(&key)?;
        let unknown = settings::validate_overrides(&document.settings).map_err(CoreError::from)?;
        for path in unknown {
            tracing::warn!(game = %key, %path, "ignoring value for unknown setting");
        }

        let game = Game::from_sections(document.settings, document.playerdata);
        self.install(key, game, &mut games)
    }

    /// Loads every active game from the repository. A game that fails to
    /// load is skipped so one corrupt document cannot hold up the rest.
    pub async fn load_all_active(&self) -> Result<usize> {
        let mut loaded = 0;
        for key in self.repository.list_active()? {
            match self.load(key.clone()).await {
                Ok(_) => loaded += 1,
                Err(e) => tracing::error!(game = %key, error = %e, "failed to load game"),
            }
        }
        tracing::info!(loaded, "active games loaded");
        Ok(loaded)
    }

    pub async fn get(&self, key: &GameKey) -> Option<GameHandle> {
        self.games
            .lock()
            .await
            .get(key)
            .map(|loaded| loaded.handle.clone())
    }

    /// Takes a finished game out of play: stops its cycle and worker, then
    /// moves the document into the archive.
    pub async fn archive(&self, key: &GameKey) -> Result<()> {
        let mut loaded = self
            .games
            .lock()
            .await
            .remove(key)
            .ok_or_else(|| RuntimeError::GameNotLoaded { key: key.clone() })?;

        loaded.scheduler.cancel();
        loaded.handle.shutdown().await?;
        self.repository.archive(key)?;

        tracing::info!(game = %key, "game archived");
        Ok(())
    }

    /// Stops every worker and scheduler, leaving documents active on disk.
    pub async fn unload_all(&self) {
        let mut games = self.games.lock().await;
        for (key, mut loaded) in games.drain() {
            loaded.scheduler.cancel();
            if let Err(e) = loaded.handle.shutdown().await {
                tracing::warn!(game = %key, error = %e, "worker already gone");
            }
        }
    }

    fn install(
        &self,
        key: GameKey,
        game: Game,
        games: &mut HashMap<GameKey, LoadedGame>,
    ) -> Result<GameHandle> {
        let grant_time = settings::time(&game.settings, &["gameplay", "action_grant_time"]);

        let handle = worker::spawn(
            key.clone(),
            game,
            Arc::clone(&self.repository),
            self.bus.clone(),
        );
        let mut scheduler = DailyScheduler::new(key.clone(), handle.clone(), self.bus.clone());
        match grant_time {
            Some(time) => scheduler.reset(time.hour.into(), time.minute.into())?,
            // The schema defaults this leaf, so a missing value means the
            // stored settings are damaged; run without a cycle.
            None => tracing::warn!(game = %key, "no action grant time; daily cycle disabled"),
        }

        games.insert(key, LoadedGame { handle: handle.clone(), scheduler });
        Ok(handle)
    }
}
