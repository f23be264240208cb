//! Integration tests driving the plugin through the host-facing surfaces
//! only: command dispatch, event emission, and the files left on disk.
//!
//! `MockServer` stands in for the engine. It records every teleport,
//! message, and food-level call so tests can assert on what a player would
//! actually have experienced.

use async_trait::async_trait;
use hearth_api::{
    create_command_registry, create_event_router, current_timestamp, CommandInvocation,
    CommandRegistry, CommandStatus, EnginePosition, EventRouter, PlayerDeathEvent,
    PlayerFoodChangeEvent, PlayerId, PlayerQuitEvent, PlayerRespawnEvent, PlayerTeleportEvent,
    ServerContext, ServerError, ServerPlugin, WorldId, WorldRef,
};
use plugin_hearth::storage::PlayerRecordStore;
use plugin_hearth::{perms, HearthPlugin};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// In-memory engine double with two loaded worlds.
#[derive(Debug)]
struct MockServer {
    data_dir: PathBuf,
    worlds: Vec<WorldRef>,
    positions: Mutex<HashMap<PlayerId, EnginePosition>>,
    permissions: Mutex<HashSet<(PlayerId, String)>>,
    messages: Mutex<Vec<(PlayerId, String)>>,
    teleports: Mutex<Vec<(PlayerId, EnginePosition)>>,
    food_levels: Mutex<Vec<(PlayerId, u8)>>,
}

impl MockServer {
    fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            worlds: vec![
                WorldRef::new(WorldId::new(), "world"),
                WorldRef::new(WorldId::new(), "nether"),
            ],
            positions: Mutex::new(HashMap::new()),
            permissions: Mutex::new(HashSet::new()),
            messages: Mutex::new(Vec::new()),
            teleports: Mutex::new(Vec::new()),
            food_levels: Mutex::new(Vec::new()),
        }
    }

    fn world(&self) -> WorldRef {
        self.worlds[0].clone()
    }

    fn grant(&self, player: PlayerId, node: &str) {
        self.permissions
            .lock()
            .unwrap()
            .insert((player, node.to_string()));
    }

    fn set_position(&self, player: PlayerId, position: EnginePosition) {
        self.positions.lock().unwrap().insert(player, position);
    }

    fn messages_for(&self, player: PlayerId) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| *to == player)
            .map(|(_, text)| text.clone())
            .collect()
    }

    fn last_message_for(&self, player: PlayerId) -> String {
        self.messages_for(player).pop().unwrap_or_default()
    }

    fn teleports_of(&self, player: PlayerId) -> Vec<EnginePosition> {
        self.teleports
            .lock()
            .unwrap()
            .iter()
            .filter(|(who, _)| *who == player)
            .map(|(_, to)| to.clone())
            .collect()
    }
}

#[async_trait]
impl ServerContext for MockServer {
    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    fn has_permission(&self, player: PlayerId, node: &str) -> bool {
        self.permissions
            .lock()
            .unwrap()
            .contains(&(player, node.to_string()))
    }

    fn world_by_id(&self, id: WorldId) -> Option<WorldRef> {
        self.worlds.iter().find(|world| world.id == id).cloned()
    }

    fn world_by_name(&self, name: &str) -> Option<WorldRef> {
        self.worlds.iter().find(|world| world.name == name).cloned()
    }

    fn position_of(&self, player: PlayerId) -> Option<EnginePosition> {
        self.positions.lock().unwrap().get(&player).cloned()
    }

    async fn teleport(
        &self,
        player: PlayerId,
        destination: EnginePosition,
    ) -> Result<(), ServerError> {
        self.positions
            .lock()
            .unwrap()
            .insert(player, destination.clone());
        self.teleports.lock().unwrap().push((player, destination));
        Ok(())
    }

    async fn send_message(&self, player: PlayerId, message: &str) -> Result<(), ServerError> {
        self.messages
            .lock()
            .unwrap()
            .push((player, message.to_string()));
        Ok(())
    }

    async fn set_food_level(&self, player: PlayerId, level: u8) -> Result<(), ServerError> {
        self.food_levels.lock().unwrap().push((player, level));
        Ok(())
    }
}

/// A registered plugin plus everything it was registered against.
struct TestHost {
    _dir: TempDir,
    server: Arc<MockServer>,
    events: Arc<EventRouter>,
    commands: Arc<CommandRegistry>,
    plugin: HearthPlugin,
}

impl TestHost {
    fn record_file(&self, player: PlayerId) -> PathBuf {
        self.server
            .data_dir
            .join("playerdata")
            .join(format!("{player}.toml"))
    }
}

async fn boot() -> TestHost {
    boot_with_config(None).await
}

/// Boots the plugin against a fresh data dir, optionally seeding a
/// config.toml before registration.
async fn boot_with_config(config_toml: Option<&str>) -> TestHost {
    let dir = TempDir::new().unwrap();
    if let Some(contents) = config_toml {
        std::fs::write(dir.path().join("config.toml"), contents).unwrap();
    }
    let server = Arc::new(MockServer::new(dir.path()));
    let events = create_event_router();
    let commands = create_command_registry();
    let mut plugin = HearthPlugin::new();
    plugin
        .register(server.clone(), events.clone(), commands.clone())
        .await
        .expect("plugin registration failed");
    TestHost {
        _dir: dir,
        server,
        events,
        commands,
        plugin,
    }
}

fn invoke(player: PlayerId, label: &str, args: &[&str]) -> CommandInvocation {
    CommandInvocation::new(player, label, args.iter().map(|s| s.to_string()).collect())
}

async fn dispatch(host: &TestHost, player: PlayerId, label: &str, args: &[&str]) -> CommandStatus {
    host.commands.dispatch(invoke(player, label, args)).await
}

#[tokio::test]
async fn sethome_then_home_round_trips_through_disk() {
    let host = boot().await;
    let player = PlayerId::new();
    host.server.grant(player, perms::HOME_SET);
    host.server.grant(player, perms::HOME_TELEPORT);

    let here = EnginePosition {
        world: host.server.world(),
        x: 120.5,
        y: 71.0,
        z: -33.25,
        yaw: 90.0,
        pitch: -12.5,
    };
    host.server.set_position(player, here.clone());

    let status = dispatch(&host, player, "sethome", &[]).await;
    assert_eq!(status, CommandStatus::Handled);
    assert_eq!(host.server.last_message_for(player), "Home 'home' set.");
    assert!(host.record_file(player).exists());

    // Wander off, then come home. Orientation must survive the file.
    host.server
        .set_position(player, EnginePosition::new(host.server.world(), 0.0, 64.0, 0.0));
    dispatch(&host, player, "home", &[]).await;

    assert_eq!(
        host.server.last_message_for(player),
        "Teleported to home 'home'."
    );
    assert_eq!(host.server.teleports_of(player), vec![here]);
}

#[tokio::test]
async fn unknown_label_falls_through_to_the_host() {
    let host = boot().await;
    let status = dispatch(&host, PlayerId::new(), "warp", &["spawn"]).await;
    assert_eq!(status, CommandStatus::Unknown);
}

#[tokio::test]
async fn registration_writes_a_default_config_file() {
    let host = boot().await;
    let contents = std::fs::read_to_string(host.server.data_dir.join("config.toml")).unwrap();
    assert!(contents.contains("base_limit = 3"));
    assert!(contents.contains("min_distance = 1.0"));
}

#[tokio::test]
async fn home_limit_blocks_new_names_but_not_overwrites() {
    let host = boot_with_config(Some("[homes]\nbase_limit = 1\n")).await;
    let player = PlayerId::new();
    host.server.grant(player, perms::HOME_SET);
    host.server
        .set_position(player, EnginePosition::new(host.server.world(), 1.0, 64.0, 1.0));

    dispatch(&host, player, "sethome", &["base"]).await;
    assert_eq!(host.server.last_message_for(player), "Home 'base' set.");

    dispatch(&host, player, "sethome", &["other"]).await;
    assert_eq!(
        host.server.last_message_for(player),
        "Home limit reached (1). Delete one before setting another."
    );

    // At the limit, re-setting an existing name still works.
    dispatch(&host, player, "sethome", &["base"]).await;
    assert_eq!(host.server.last_message_for(player), "Home 'base' updated.");
}

#[tokio::test]
async fn tier_permission_raises_the_home_limit() {
    let host =
        boot_with_config(Some("[homes]\nbase_limit = 1\n\n[homes.tiers]\nvip = 3\n")).await;
    let player = PlayerId::new();
    host.server.grant(player, perms::HOME_SET);
    host.server.grant(player, &perms::tier("vip"));
    host.server
        .set_position(player, EnginePosition::new(host.server.world(), 1.0, 64.0, 1.0));

    dispatch(&host, player, "sethome", &["first"]).await;
    dispatch(&host, player, "sethome", &["second"]).await;
    assert_eq!(host.server.last_message_for(player), "Home 'second' set.");

    dispatch(&host, player, "sethome", &["third"]).await;
    dispatch(&host, player, "sethome", &["fourth"]).await;
    assert_eq!(
        host.server.last_message_for(player),
        "Home limit reached (3). Delete one before setting another."
    );
}

#[tokio::test]
async fn negative_tier_limit_means_unlimited() {
    let host =
        boot_with_config(Some("[homes]\nbase_limit = 1\n\n[homes.tiers]\npatron = -1\n")).await;
    let player = PlayerId::new();
    host.server.grant(player, perms::HOME_SET);
    host.server.grant(player, perms::HOME_LIST);
    host.server.grant(player, &perms::tier("patron"));
    host.server
        .set_position(player, EnginePosition::new(host.server.world(), 1.0, 64.0, 1.0));

    for name in ["one", "two", "three", "four"] {
        dispatch(&host, player, "sethome", &[name]).await;
    }
    assert_eq!(host.server.last_message_for(player), "Home 'four' set.");

    // Unlimited listings show a bare count instead of n/limit.
    dispatch(&host, player, "homes", &[]).await;
    assert_eq!(
        host.server.last_message_for(player),
        "Homes (4): four, one, three, two"
    );
}

#[tokio::test]
async fn home_names_fold_to_lowercase_and_reject_bad_input() {
    let host = boot().await;
    let player = PlayerId::new();
    host.server.grant(player, perms::HOME_SET);
    host.server.grant(player, perms::HOME_TELEPORT);
    host.server
        .set_position(player, EnginePosition::new(host.server.world(), 1.0, 64.0, 1.0));

    dispatch(&host, player, "sethome", &["BASE"]).await;
    assert_eq!(host.server.last_message_for(player), "Home 'base' set.");

    dispatch(&host, player, "home", &["base"]).await;
    assert_eq!(
        host.server.last_message_for(player),
        "Teleported to home 'base'."
    );

    dispatch(&host, player, "sethome", &["tower!"]).await;
    assert_eq!(
        host.server.last_message_for(player),
        "Invalid home name 'tower!': use 1-32 letters, digits, '-' or '_'."
    );
}

#[tokio::test]
async fn bare_home_falls_back_to_the_single_home() {
    let host = boot().await;
    let player = PlayerId::new();
    host.server.grant(player, perms::HOME_SET);
    host.server.grant(player, perms::HOME_TELEPORT);
    host.server
        .set_position(player, EnginePosition::new(host.server.world(), 7.0, 70.0, 7.0));

    dispatch(&host, player, "home", &[]).await;
    assert_eq!(
        host.server.last_message_for(player),
        "You haven't set any homes yet."
    );

    dispatch(&host, player, "sethome", &["base"]).await;
    dispatch(&host, player, "home", &[]).await;
    assert_eq!(
        host.server.last_message_for(player),
        "Teleported to home 'base'."
    );

    dispatch(&host, player, "home", &["castle"]).await;
    assert_eq!(
        host.server.last_message_for(player),
        "You don't have a home named 'castle'."
    );
}

#[tokio::test]
async fn delhome_forgets_the_home_on_disk_too() {
    let host = boot().await;
    let player = PlayerId::new();
    host.server.grant(player, perms::HOME_SET);
    host.server.grant(player, perms::HOME_DELETE);
    host.server.grant(player, perms::HOME_LIST);
    host.server
        .set_position(player, EnginePosition::new(host.server.world(), 1.0, 64.0, 1.0));

    dispatch(&host, player, "sethome", &["base"]).await;
    dispatch(&host, player, "delhome", &[]).await;
    assert_eq!(
        host.server.last_message_for(player),
        "Usage: /delhome <name>"
    );

    dispatch(&host, player, "delhome", &["base"]).await;
    assert_eq!(host.server.last_message_for(player), "Home 'base' deleted.");

    dispatch(&host, player, "delhome", &["base"]).await;
    assert_eq!(
        host.server.last_message_for(player),
        "You don't have a home named 'base'."
    );

    // A process that starts over from the files sees the deletion.
    let fresh = PlayerRecordStore::new(&host.server.data_dir);
    assert!(fresh.get(player).await.homes.is_empty());
}

#[tokio::test]
async fn homes_lists_names_with_count_and_limit() {
    let host = boot().await;
    let player = PlayerId::new();
    host.server.grant(player, perms::HOME_SET);
    host.server.grant(player, perms::HOME_LIST);
    host.server
        .set_position(player, EnginePosition::new(host.server.world(), 1.0, 64.0, 1.0));

    dispatch(&host, player, "homes", &[]).await;
    assert_eq!(
        host.server.last_message_for(player),
        "You haven't set any homes yet."
    );

    dispatch(&host, player, "sethome", &["mine"]).await;
    dispatch(&host, player, "sethome", &["base"]).await;
    dispatch(&host, player, "homes", &[]).await;
    assert_eq!(
        host.server.last_message_for(player),
        "Homes (2/3): base, mine"
    );
}

#[tokio::test]
async fn back_returns_to_the_death_point_with_permission() {
    let host = boot().await;
    let player = PlayerId::new();
    host.server.grant(player, perms::BACK);
    host.server.grant(player, perms::BACK_DEATH);

    let world = host.server.world();
    let origin = EnginePosition::new(world.clone(), 10.0, 64.0, 10.0);
    let arena = EnginePosition::new(world.clone(), 200.0, 70.0, -40.0);
    let grave = EnginePosition::new(world, 5.0, 30.0, 5.0);

    host.events
        .emit_player(
            "player_teleport",
            &PlayerTeleportEvent {
                player_id: player,
                from: origin,
                to: arena,
                timestamp: current_timestamp(),
            },
        )
        .await
        .unwrap();
    host.events
        .emit_player(
            "player_death",
            &PlayerDeathEvent {
                player_id: player,
                position: grave.clone(),
                timestamp: current_timestamp(),
            },
        )
        .await
        .unwrap();

    dispatch(&host, player, "back", &[]).await;
    assert_eq!(
        host.server.last_message_for(player),
        "Returned to where you died."
    );
    assert_eq!(host.server.teleports_of(player), vec![grave]);

    // The death flag survives a cache round trip through the file.
    let fresh = PlayerRecordStore::new(&host.server.data_dir);
    assert!(fresh.get(player).await.last_was_death);
}

#[tokio::test]
async fn back_without_death_permission_uses_the_previous_location() {
    let host = boot().await;
    let player = PlayerId::new();
    host.server.grant(player, perms::BACK);

    let world = host.server.world();
    let origin = EnginePosition::new(world.clone(), 10.0, 64.0, 10.0);
    let arena = EnginePosition::new(world.clone(), 200.0, 70.0, -40.0);

    host.events
        .emit_player(
            "player_teleport",
            &PlayerTeleportEvent {
                player_id: player,
                from: origin.clone(),
                to: arena,
                timestamp: current_timestamp(),
            },
        )
        .await
        .unwrap();
    host.events
        .emit_player(
            "player_death",
            &PlayerDeathEvent {
                player_id: player,
                position: EnginePosition::new(world, 5.0, 30.0, 5.0),
                timestamp: current_timestamp(),
            },
        )
        .await
        .unwrap();

    dispatch(&host, player, "back", &[]).await;
    let messages = host.server.messages_for(player);
    assert_eq!(
        messages,
        vec![
            "You can't return to your death point; taking you to your last location instead."
                .to_string(),
            "Returned to your previous location.".to_string(),
        ]
    );
    assert_eq!(host.server.teleports_of(player), vec![origin]);
}

#[tokio::test]
async fn back_with_no_history_has_nothing_to_offer() {
    let host = boot().await;
    let player = PlayerId::new();
    host.server.grant(player, perms::BACK);

    dispatch(&host, player, "back", &[]).await;
    assert_eq!(
        host.server.last_message_for(player),
        "You have no location to return to."
    );
    assert!(host.server.teleports_of(player).is_empty());
}

#[tokio::test]
async fn trivial_teleports_do_not_move_the_return_point() {
    let host = boot().await;
    let player = PlayerId::new();
    host.server.grant(player, perms::BACK);

    let world = host.server.world();
    // Under a block of movement; an engine position correction.
    host.events
        .emit_player(
            "player_teleport",
            &PlayerTeleportEvent {
                player_id: player,
                from: EnginePosition::new(world.clone(), 10.0, 64.0, 10.0),
                to: EnginePosition::new(world, 10.4, 64.0, 10.3),
                timestamp: current_timestamp(),
            },
        )
        .await
        .unwrap();

    dispatch(&host, player, "back", &[]).await;
    assert_eq!(
        host.server.last_message_for(player),
        "You have no location to return to."
    );
}

#[tokio::test]
async fn autofeed_restores_food_and_honors_opt_out() {
    let host = boot().await;
    let player = PlayerId::new();
    host.server.grant(player, perms::AUTOFEED);

    let hungry = PlayerFoodChangeEvent {
        player_id: player,
        old_level: 20,
        new_level: 17,
        timestamp: current_timestamp(),
    };
    host.events
        .emit_player("player_food_change", &hungry)
        .await
        .unwrap();
    assert_eq!(*host.server.food_levels.lock().unwrap(), vec![(player, 20)]);

    dispatch(&host, player, "autofeed", &["off"]).await;
    assert_eq!(host.server.last_message_for(player), "Autofeed disabled.");
    host.events
        .emit_player("player_food_change", &hungry)
        .await
        .unwrap();
    assert_eq!(host.server.food_levels.lock().unwrap().len(), 1);

    // Bare /autofeed toggles back on.
    dispatch(&host, player, "autofeed", &[]).await;
    assert_eq!(host.server.last_message_for(player), "Autofeed enabled.");
    host.events
        .emit_player("player_food_change", &hungry)
        .await
        .unwrap();
    assert_eq!(host.server.food_levels.lock().unwrap().len(), 2);

    // Increases never trigger a top-up.
    host.events
        .emit_player(
            "player_food_change",
            &PlayerFoodChangeEvent {
                player_id: player,
                old_level: 17,
                new_level: 20,
                timestamp: current_timestamp(),
            },
        )
        .await
        .unwrap();
    assert_eq!(host.server.food_levels.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn autofeed_requires_permission_and_master_switch() {
    let host = boot_with_config(Some("[autofeed]\nenabled = false\n")).await;
    let player = PlayerId::new();
    host.server.grant(player, perms::AUTOFEED);

    host.events
        .emit_player(
            "player_food_change",
            &PlayerFoodChangeEvent {
                player_id: player,
                old_level: 20,
                new_level: 10,
                timestamp: current_timestamp(),
            },
        )
        .await
        .unwrap();
    assert!(host.server.food_levels.lock().unwrap().is_empty());

    let host = boot().await;
    let unprivileged = PlayerId::new();
    host.events
        .emit_player(
            "player_food_change",
            &PlayerFoodChangeEvent {
                player_id: unprivileged,
                old_level: 20,
                new_level: 10,
                timestamp: current_timestamp(),
            },
        )
        .await
        .unwrap();
    assert!(host.server.food_levels.lock().unwrap().is_empty());
}

#[tokio::test]
async fn quit_persists_the_logout_position() {
    let host = boot().await;
    let player = PlayerId::new();

    let doorstep = EnginePosition::new(host.server.world(), 3.0, 65.0, -8.0);
    host.events
        .emit_player(
            "player_quit",
            &PlayerQuitEvent {
                player_id: player,
                position: doorstep,
                timestamp: current_timestamp(),
            },
        )
        .await
        .unwrap();

    let fresh = PlayerRecordStore::new(&host.server.data_dir);
    let record = fresh.get(player).await;
    let logout = record.logout.expect("logout location missing");
    assert_eq!(logout.x, 3.0);
    assert_eq!(logout.world_name, "world");
}

#[tokio::test]
async fn record_files_use_the_stable_key_layout() {
    let host = boot().await;
    let player = PlayerId::new();
    host.server.grant(player, perms::HOME_SET);
    host.server.grant(player, perms::AUTOFEED);
    host.server
        .set_position(player, EnginePosition::new(host.server.world(), 1.0, 64.0, 1.0));

    let world = host.server.world();
    dispatch(&host, player, "sethome", &["base"]).await;
    dispatch(&host, player, "autofeed", &["off"]).await;
    host.events
        .emit_player(
            "player_teleport",
            &PlayerTeleportEvent {
                player_id: player,
                from: EnginePosition::new(world.clone(), 0.0, 64.0, 0.0),
                to: EnginePosition::new(world.clone(), 50.0, 64.0, 50.0),
                timestamp: current_timestamp(),
            },
        )
        .await
        .unwrap();
    host.events
        .emit_player(
            "player_death",
            &PlayerDeathEvent {
                player_id: player,
                position: EnginePosition::new(world.clone(), 5.0, 30.0, 5.0),
                timestamp: current_timestamp(),
            },
        )
        .await
        .unwrap();
    host.events
        .emit_player(
            "player_quit",
            &PlayerQuitEvent {
                player_id: player,
                position: EnginePosition::new(world, 3.0, 65.0, -8.0),
                timestamp: current_timestamp(),
            },
        )
        .await
        .unwrap();

    let contents = std::fs::read_to_string(host.record_file(player)).unwrap();
    for key in [
        "autofeed = false",
        "last-was-death = true",
        "[lastteleportlocation]",
        "[lastdeathlocation]",
        "[logoutlocation]",
        "[homes.base]",
        "world-name = \"world\"",
        "yaw",
        "pitch",
    ] {
        assert!(contents.contains(key), "missing {key:?} in:\n{contents}");
    }
}

#[tokio::test]
async fn unreadable_record_degrades_to_defaults_and_keeps_the_file() {
    let host = boot().await;
    let player = PlayerId::new();
    host.server.grant(player, perms::HOME_LIST);

    let path = host.record_file(player);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "homes = not valid toml [").unwrap();

    dispatch(&host, player, "homes", &[]).await;
    assert_eq!(
        host.server.last_message_for(player),
        "You haven't set any homes yet."
    );
    // The damaged file is left for an operator to inspect.
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "homes = not valid toml ["
    );
}

#[tokio::test]
async fn respawn_returns_home_when_configured_and_permitted() {
    let host = boot_with_config(Some("[respawn]\nreturn_home = true\n")).await;
    let player = PlayerId::new();
    host.server.grant(player, perms::HOME_SET);
    host.server.grant(player, perms::HOME_RESPAWN);

    let hearthstone = EnginePosition::new(host.server.world(), 50.0, 70.0, 50.0);
    host.server.set_position(player, hearthstone.clone());
    dispatch(&host, player, "sethome", &[]).await;

    let spawn = EnginePosition::new(host.server.world(), 0.0, 64.0, 0.0);
    host.events
        .emit_player(
            "player_respawn",
            &PlayerRespawnEvent {
                player_id: player,
                position: spawn.clone(),
                timestamp: current_timestamp(),
            },
        )
        .await
        .unwrap();
    assert_eq!(host.server.teleports_of(player), vec![hearthstone]);

    // Without the permission the engine's spawn placement stands.
    let bystander = PlayerId::new();
    host.events
        .emit_player(
            "player_respawn",
            &PlayerRespawnEvent {
                player_id: bystander,
                position: spawn,
                timestamp: current_timestamp(),
            },
        )
        .await
        .unwrap();
    assert!(host.server.teleports_of(bystander).is_empty());
}

#[tokio::test]
async fn completion_filters_by_prefix_case_insensitively() {
    let host = boot().await;
    let player = PlayerId::new();
    host.server.grant(player, perms::HOME_SET);
    host.server
        .set_position(player, EnginePosition::new(host.server.world(), 1.0, 64.0, 1.0));
    dispatch(&host, player, "sethome", &["base"]).await;
    dispatch(&host, player, "sethome", &["mine"]).await;

    let all = host.commands.complete(invoke(player, "home", &[""])).await;
    assert_eq!(all, vec!["base".to_string(), "mine".to_string()]);

    let b_only = host.commands.complete(invoke(player, "delhome", &["B"])).await;
    assert_eq!(b_only, vec!["base".to_string()]);

    let later_args = host
        .commands
        .complete(invoke(player, "home", &["base", "x"]))
        .await;
    assert!(later_args.is_empty());

    let subs = host.commands.complete(invoke(player, "hearth", &["z"])).await;
    assert!(subs.is_empty());
    let subs = host.commands.complete(invoke(player, "hearth", &["R"])).await;
    assert_eq!(subs, vec!["reload".to_string()]);
    let toggles = host.commands.complete(invoke(player, "autofeed", &[""])).await;
    assert_eq!(toggles, vec!["off".to_string(), "on".to_string()]);
}

#[tokio::test]
async fn admin_reload_flushes_and_status_reports_counters() {
    let host = boot().await;
    let admin = PlayerId::new();
    host.server.grant(admin, perms::ADMIN);
    host.server.grant(admin, perms::HOME_SET);
    host.server
        .set_position(admin, EnginePosition::new(host.server.world(), 1.0, 64.0, 1.0));
    dispatch(&host, admin, "sethome", &[]).await;

    dispatch(&host, admin, "hearth", &["reload"]).await;
    assert_eq!(
        host.server.last_message_for(admin),
        "Record cache cleared; 1 record(s) flushed to disk."
    );

    dispatch(&host, admin, "hearth", &["status"]).await;
    assert_eq!(
        host.server.last_message_for(admin),
        "0 record(s) cached; 0 event(s) dispatched, 0 handler failure(s)."
    );

    dispatch(&host, admin, "hearth", &["frobnicate"]).await;
    assert_eq!(
        host.server.last_message_for(admin),
        "Usage: /hearth <reload|status>"
    );
}

#[tokio::test]
async fn commands_refuse_without_permission_and_write_nothing() {
    let host = boot().await;
    let player = PlayerId::new();
    host.server
        .set_position(player, EnginePosition::new(host.server.world(), 1.0, 64.0, 1.0));

    for (label, args) in [
        ("sethome", vec![]),
        ("home", vec![]),
        ("delhome", vec!["base"]),
        ("homes", vec![]),
        ("back", vec![]),
        ("autofeed", vec![]),
        ("hearth", vec!["status"]),
    ] {
        let status = dispatch(&host, player, label, &args).await;
        assert_eq!(status, CommandStatus::Handled, "label {label}");
        assert_eq!(
            host.server.last_message_for(player),
            "You don't have permission to do that.",
            "label {label}"
        );
    }
    assert!(!host.record_file(player).exists());
}

#[tokio::test]
async fn aliases_reach_the_same_handler() {
    let host = boot().await;
    let player = PlayerId::new();
    host.server.grant(player, perms::HOME_SET);
    host.server.grant(player, perms::HOME_DELETE);
    host.server.grant(player, perms::HOME_LIST);
    host.server
        .set_position(player, EnginePosition::new(host.server.world(), 1.0, 64.0, 1.0));

    dispatch(&host, player, "sethome", &["base"]).await;
    dispatch(&host, player, "LISTHOMES", &[]).await;
    assert_eq!(host.server.last_message_for(player), "Homes (1/3): base");

    dispatch(&host, player, "removehome", &["base"]).await;
    assert_eq!(host.server.last_message_for(player), "Home 'base' deleted.");
}

#[tokio::test]
async fn disable_flushes_without_error() {
    let mut host = boot().await;
    let player = PlayerId::new();
    host.server.grant(player, perms::HOME_SET);
    host.server
        .set_position(player, EnginePosition::new(host.server.world(), 1.0, 64.0, 1.0));
    dispatch(&host, player, "sethome", &[]).await;

    let context = host.server.clone();
    host.plugin.on_disable(context).await.unwrap();
    assert!(host.record_file(player).exists());
}
