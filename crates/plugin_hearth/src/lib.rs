//! # Hearth
//!
//! Per-player homes, back-teleport, and automatic food restore for servers
//! speaking the Hearth plugin API.
//!
//! Player state lives in a [`PlayerRecordStore`]: an in-memory cache over
//! one human-editable TOML file per player, loaded lazily and written back
//! in full on every mutation. Commands and event handlers share one
//! [`HearthCore`] built at registration; nothing here is global.

pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod perms;
pub mod storage;
pub mod types;

use crate::commands::{
    AutofeedCommand, BackCommand, DelHomeCommand, HearthCommand, HomeCommand, HomesCommand,
    SetHomeCommand,
};
use crate::config::HearthConfig;
use crate::events::{
    handle_death, handle_food_change, handle_quit, handle_respawn, handle_teleport,
};
use crate::storage::PlayerRecordStore;
use async_trait::async_trait;
use hearth_api::{
    declare_plugin, CommandRegistry, EventRouter, PlayerDeathEvent, PlayerFoodChangeEvent,
    PlayerQuitEvent, PlayerRespawnEvent, PlayerTeleportEvent, PluginError, ServerContext,
    ServerPlugin,
};
use std::sync::Arc;
use tracing::info;

/// Configuration file name inside the plugin data directory.
const CONFIG_FILE: &str = "config.toml";

/// State shared by every handler: the host seam, the parsed configuration,
/// the record store, and the router (for the status readout).
pub struct HearthCore {
    pub context: Arc<dyn ServerContext>,
    pub config: HearthConfig,
    pub store: PlayerRecordStore,
    pub events: Arc<EventRouter>,
}

/// The plugin the loader instantiates through `create_plugin`.
pub struct HearthPlugin {
    core: Option<Arc<HearthCore>>,
}

impl HearthPlugin {
    pub fn new() -> Self {
        Self { core: None }
    }

    /// Shared state, once `register` ran. Exposed for the host and tests.
    pub fn core(&self) -> Option<&Arc<HearthCore>> {
        self.core.as_ref()
    }
}

impl Default for HearthPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServerPlugin for HearthPlugin {
    fn name(&self) -> &'static str {
        "hearth"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    async fn register(
        &mut self,
        context: Arc<dyn ServerContext>,
        events: Arc<EventRouter>,
        commands: Arc<CommandRegistry>,
    ) -> Result<(), PluginError> {
        let data_dir = context.data_dir();
        let config = HearthConfig::load_or_create(&data_dir.join(CONFIG_FILE))
            .await
            .map_err(|e| PluginError::InitializationFailed(e.to_string()))?;
        let store = PlayerRecordStore::new(&data_dir);
        let core = Arc::new(HearthCore {
            context,
            config,
            store,
            events: events.clone(),
        });
        self.core = Some(core.clone());

        commands.register("sethome", &[], Arc::new(SetHomeCommand::new(core.clone())));
        commands.register("home", &[], Arc::new(HomeCommand::new(core.clone())));
        commands.register(
            "delhome",
            &["removehome"],
            Arc::new(DelHomeCommand::new(core.clone())),
        );
        commands.register(
            "homes",
            &["listhomes"],
            Arc::new(HomesCommand::new(core.clone())),
        );
        commands.register("back", &[], Arc::new(BackCommand::new(core.clone())));
        commands.register("autofeed", &[], Arc::new(AutofeedCommand::new(core.clone())));
        commands.register("hearth", &[], Arc::new(HearthCommand::new(core.clone())));

        {
            let core = core.clone();
            events.on_player("player_teleport", move |event: PlayerTeleportEvent| {
                let core = core.clone();
                async move { handle_teleport(&core, event).await }
            });
        }
        {
            let core = core.clone();
            events.on_player("player_death", move |event: PlayerDeathEvent| {
                let core = core.clone();
                async move { handle_death(&core, event).await }
            });
        }
        {
            let core = core.clone();
            events.on_player("player_respawn", move |event: PlayerRespawnEvent| {
                let core = core.clone();
                async move { handle_respawn(&core, event).await }
            });
        }
        {
            let core = core.clone();
            events.on_player("player_food_change", move |event: PlayerFoodChangeEvent| {
                let core = core.clone();
                async move { handle_food_change(&core, event).await }
            });
        }
        {
            let core = core.clone();
            events.on_player("player_quit", move |event: PlayerQuitEvent| {
                let core = core.clone();
                async move { handle_quit(&core, event).await }
            });
        }

        info!(
            "Hearth registered: {} command label(s), {} event handler(s)",
            commands.label_count(),
            events.stats().handlers_registered
        );
        Ok(())
    }

    async fn on_enable(&mut self, _context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
        if let Some(core) = &self.core {
            info!(
                "Hearth {} enabled: {} tier(s) configured, data dir {}",
                env!("CARGO_PKG_VERSION"),
                core.config.homes.tiers.len(),
                core.context.data_dir().display()
            );
        }
        Ok(())
    }

    async fn on_disable(&mut self, _context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
        if let Some(core) = &self.core {
            let flushed = core.store.flush_all().await;
            info!("Hearth disabled; {} record(s) flushed", flushed);
        }
        Ok(())
    }
}

declare_plugin!(HearthPlugin);
