//! # Server Context
//!
//! The narrow seam through which plugins reach the host engine. Lookups
//! against in-memory registries (permissions, worlds, player positions) are
//! synchronous; anything that makes the engine act on a player is async.
//! The host implements this once and hands every plugin the same `Arc`.

use crate::types::{EnginePosition, PlayerId, WorldId, WorldRef};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by host operations.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("player {0} is not connected")]
    PlayerOffline(PlayerId),

    #[error("internal server error: {0}")]
    Internal(String),
}

/// Host capabilities available to a plugin.
#[async_trait]
pub trait ServerContext: Send + Sync + std::fmt::Debug {
    /// Directory reserved for this plugin's files. Exists before the plugin
    /// is registered.
    fn data_dir(&self) -> PathBuf;

    /// Whether `player` holds the permission `node`. Offline players hold
    /// nothing.
    fn has_permission(&self, player: PlayerId, node: &str) -> bool;

    /// Looks up a loaded world by its stable id.
    fn world_by_id(&self, id: WorldId) -> Option<WorldRef>;

    /// Looks up a loaded world by its current name (exact match).
    fn world_by_name(&self, name: &str) -> Option<WorldRef>;

    /// Current position of `player`, or `None` when offline.
    fn position_of(&self, player: PlayerId) -> Option<EnginePosition>;

    /// Moves `player` to `destination`. Emits the engine's own teleport
    /// event as a side effect, like any other teleport.
    async fn teleport(
        &self,
        player: PlayerId,
        destination: EnginePosition,
    ) -> Result<(), ServerError>;

    /// Sends a chat message to `player`.
    async fn send_message(&self, player: PlayerId, message: &str) -> Result<(), ServerError>;

    /// Sets `player`'s food level, clamped by the engine to its valid range.
    async fn set_food_level(&self, player: PlayerId, level: u8) -> Result<(), ServerError>;
}
