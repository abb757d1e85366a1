//! End-to-end tests driving hosted games through the public API.

use std::sync::Arc;

use tactics_runtime::{
    CommandReply, GameHandle, GameKey, GameManager, EventBus, GameRepository, Linkage,
    MemoryGameRepository,
    Result, RuntimeError, RepositoryError, Topic, router,
};

async fn run(handle: &GameHandle, actor: &str, is_gm: bool, line: &str) -> Result<CommandReply> {
    let command = router::parse(line).map_err(RuntimeError::from)?;
    handle.execute(actor.into(), is_gm, command).await
}

fn manager_with(repository: Arc<MemoryGameRepository>) -> GameManager {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    GameManager::new(repository, EventBus::new())
}

#[tokio::test]
async fn a_full_game_runs_from_create_to_archive() {
    let repository = Arc::new(MemoryGameRepository::new());
    let manager = manager_with(repository.clone());
    let key = GameKey::new("guild-1", "skirmish");
    let handle = manager.create(key.clone(), Linkage::default()).await.unwrap();

    // Tune the game so two players auto-start it and can reach each other.
    for line in [
        "settings gameplay.minimum_players 2",
        "settings gameplay.maximum_players 2",
        "settings gameplay.initial_actions 5",
        "settings gameplay.fire_range 100",
    ] {
        run(&handle, "gm", true, line).await.unwrap();
    }

    run(&handle, "alice", false, "join").await.unwrap();
    run(&handle, "bob", false, "join").await.unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.started());
    assert_eq!(snapshot.alive_count(), 2);
    let alice = snapshot.player(&"alice".into()).unwrap();
    assert!(alice.position.is_some());

    // Move toward the board edge away from bob's half.
    let direction = if alice.position.unwrap().x > 0 {
        "move left"
    } else {
        "move right"
    };
    run(&handle, "alice", false, direction).await.unwrap();

    run(&handle, "alice", false, "fire bob").await.unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.player(&"bob".into()).unwrap().health, 2);

    // Mutations land in the repository as they happen.
    let persisted = repository.load(&key).unwrap();
    assert_eq!(persisted.playerdata, snapshot.playerdata);

    // Bob resigns to the jury and votes for the survivor.
    run(&handle, "bob", false, "quit").await.unwrap();
    run(&handle, "bob", false, "vote alice").await.unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.alive_count(), 1);
    assert_eq!(
        snapshot.playerdata.votes.get(&"bob".into()),
        Some(&"alice".into())
    );

    manager.archive(&key).await.unwrap();
    assert!(repository.archived(&key));
    assert!(manager.get(&key).await.is_none());
}

#[tokio::test]
async fn rule_errors_carry_user_facing_messages() {
    let repository = Arc::new(MemoryGameRepository::new());
    let manager = manager_with(repository);
    let key = GameKey::new("guild-1", "strict");
    let handle = manager.create(key, Linkage::default()).await.unwrap();

    let err = run(&handle, "alice", false, "vote bob").await.unwrap_err();
    assert_eq!(err.user_message(), "the game has not started yet");

    let err = run(&handle, "alice", false, "move up").await.unwrap_err();
    assert_eq!(err.user_message(), "alice is not a player in this game");

    let err = run(&handle, "alice", false, "start").await.unwrap_err();
    assert_eq!(err.user_message(), "only the game master can do that");

    let err = run(&handle, "alice", false, "dance").await.unwrap_err();
    assert_eq!(err.user_message(), "`dance` is not a command; try `help`");
}

#[tokio::test]
async fn lifecycle_guards_duplicate_and_missing_games() {
    let repository = Arc::new(MemoryGameRepository::new());
    let manager = manager_with(repository.clone());
    let key = GameKey::new("guild-1", "once");

    manager.create(key.clone(), Linkage::default()).await.unwrap();
    assert!(matches!(
        manager.create(key.clone(), Linkage::default()).await,
        Err(RuntimeError::GameAlreadyLoaded { .. })
    ));

    let missing = GameKey::new("guild-1", "nowhere");
    assert!(manager.get(&missing).await.is_none());
    assert!(matches!(
        manager.archive(&missing).await,
        Err(RuntimeError::GameNotLoaded { .. })
    ));

    // Unloading keeps the document active on disk, so the key stays taken.
    manager.unload_all().await;
    assert!(manager.get(&key).await.is_none());
    assert!(matches!(
        manager.create(key, Linkage::default()).await,
        Err(RuntimeError::Repository(RepositoryError::AlreadyExists { .. }))
    ));
}

#[tokio::test]
async fn persisted_games_reload_with_their_settings_and_roster() {
    let repository = Arc::new(MemoryGameRepository::new());
    let key = GameKey::new("guild-1", "revived");

    {
        let manager = manager_with(repository.clone());
        let handle = manager.create(key.clone(), Linkage::default()).await.unwrap();
        run(&handle, "gm", true, "settings gameplay.fire_range 7")
            .await
            .unwrap();
        run(&handle, "alice", false, "join red").await.unwrap();
        manager.unload_all().await;
    }

    // A stale value under a path the schema no longer knows is tolerated.
    let mut document = repository.load(&key).unwrap();
    document.settings["gameplay"]["ancient_knob"] = serde_json::json!(9);
    repository.save_settings(&key, &document.settings).unwrap();

    let manager = manager_with(repository);
    let handle = manager.load(key).await.unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(
        tactics_core::settings::int(&snapshot.settings, &["gameplay", "fire_range"]),
        7
    );
    assert!(snapshot.player(&"alice".into()).is_some());
}

#[tokio::test]
async fn concurrent_commands_through_cloned_handles_serialize() {
    let repository = Arc::new(MemoryGameRepository::new());
    let manager = manager_with(repository);
    let key = GameKey::new("guild-1", "crowd");
    let handle = manager.create(key, Linkage::default()).await.unwrap();

    let mut joins = tokio::task::JoinSet::new();
    for i in 0..10 {
        let handle = handle.clone();
        joins.spawn(async move { run(&handle, &format!("player-{i}"), false, "join").await });
    }
    while let Some(result) = joins.join_next().await {
        result.unwrap().unwrap();
    }

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.alive_count(), 10);

    // The worker hands out colors one command at a time, so they are
    // necessarily distinct.
    let mut colors: Vec<_> = snapshot
        .playerdata
        .alive
        .values()
        .map(|p| p.color.to_string())
        .collect();
    colors.sort();
    colors.dedup();
    assert_eq!(colors.len(), 10);
}

#[tokio::test]
async fn announcements_flow_to_bus_subscribers() {
    let repository = Arc::new(MemoryGameRepository::new());
    let manager = manager_with(repository);
    let mut announcements = manager.event_bus().subscribe(Topic::Announcement);
    let mut roles = manager.event_bus().subscribe(Topic::Role);

    let key = GameKey::new("guild-1", "loud");
    let handle = manager.create(key, Linkage::default()).await.unwrap();
    run(&handle, "alice", false, "join").await.unwrap();

    let creation = announcements.recv().await.unwrap();
    assert!(matches!(
        creation,
        tactics_runtime::Event::Announcement { .. }
    ));
    let joined = announcements.recv().await.unwrap();
    let tactics_runtime::Event::Announcement { text, .. } = joined else {
        panic!("expected an announcement");
    };
    assert!(text.contains("alice joined the game"));

    assert!(matches!(
        roles.recv().await.unwrap(),
        tactics_runtime::Event::RoleGranted {
            role: tactics_runtime::RoleKind::Player,
            ..
        }
    ));
}
