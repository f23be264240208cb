//! # Hearth Plugin API
//!
//! Host-facing API surface shared by the Hearth server and its plugins:
//! identifier and position types, the player event set with a typed async
//! event router, a command registry with tab completion, the
//! [`ServerContext`] seam plugins call back into, and the plugin lifecycle
//! contract with its dynamic-library entry points.
//!
//! The host owns one [`EventRouter`] and one [`CommandRegistry`]; plugins
//! populate both during [`ServerPlugin::register`] and only ever touch the
//! engine through the [`ServerContext`] they were handed.

pub mod commands;
pub mod context;
pub mod events;
pub mod plugin;
pub mod router;
pub mod types;
pub mod utils;

pub use commands::{
    create_command_registry, CommandHandler, CommandInvocation, CommandRegistry, CommandStatus,
};
pub use context::{ServerContext, ServerError};
pub use events::{
    Event, EventError, EventHandler, PlayerDeathEvent, PlayerFoodChangeEvent, PlayerQuitEvent,
    PlayerRespawnEvent, PlayerTeleportEvent, TypedEventHandler,
};
pub use plugin::{PluginError, ServerPlugin};
pub use router::{create_event_router, EventRouter, RouterStats};
pub use types::{EnginePosition, PlayerId, WorldId, WorldRef, MAX_FOOD_LEVEL};
pub use utils::current_timestamp;
