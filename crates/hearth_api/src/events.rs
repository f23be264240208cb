//! # Event Trait & Player Events
//!
//! The [`Event`] trait is implemented automatically for any type that is
//! serializable, deserializable, and thread safe, so defining a new event is
//! just defining a struct. Payloads cross the registration boundary as JSON
//! bytes; the typed wrapper restores them before the handler runs.

use crate::types::{EnginePosition, PlayerId};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::any::Any;
use std::fmt::Debug;
use std::future::Future;
use std::marker::PhantomData;
use thiserror::Error;

/// Errors produced while serializing, deserializing, or running handlers.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("event serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("event deserialization failed: {0}")]
    Deserialization(String),

    #[error("handler execution failed: {0}")]
    HandlerExecution(String),
}

/// Core trait for anything that can be emitted through the event router.
///
/// Blanket-implemented; do not implement this by hand.
pub trait Event: Send + Sync + Any + Debug {
    /// Fully qualified type name, used to label registered handlers.
    fn type_name() -> &'static str
    where
        Self: Sized;

    fn serialize(&self) -> Result<Vec<u8>, EventError>;

    fn deserialize(data: &[u8]) -> Result<Self, EventError>
    where
        Self: Sized;

    /// Escape hatch for hosts that want to downcast a boxed event.
    fn as_any(&self) -> &dyn Any;
}

impl<T> Event for T
where
    T: Serialize + DeserializeOwned + Send + Sync + Any + Debug,
{
    fn type_name() -> &'static str {
        std::any::type_name::<T>()
    }

    fn serialize(&self) -> Result<Vec<u8>, EventError> {
        Ok(serde_json::to_vec(self)?)
    }

    fn deserialize(data: &[u8]) -> Result<Self, EventError> {
        serde_json::from_slice(data).map_err(|e| EventError::Deserialization(e.to_string()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Object-safe handler invoked with the serialized event payload.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, data: &[u8]) -> Result<(), EventError>;

    /// Label used in dispatch logs.
    fn handler_name(&self) -> &str;
}

/// Adapter that deserializes the payload into `T` and awaits the wrapped
/// async closure.
pub struct TypedEventHandler<T, F, Fut>
where
    T: Event + 'static,
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), EventError>> + Send,
{
    name: String,
    handler: F,
    _phantom: PhantomData<fn(T) -> Fut>,
}

impl<T, F, Fut> TypedEventHandler<T, F, Fut>
where
    T: Event + 'static,
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), EventError>> + Send,
{
    pub fn new(name: String, handler: F) -> Self {
        Self {
            name,
            handler,
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<T, F, Fut> EventHandler for TypedEventHandler<T, F, Fut>
where
    T: Event + 'static,
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), EventError>> + Send,
{
    async fn handle(&self, data: &[u8]) -> Result<(), EventError> {
        let event = T::deserialize(data)?;
        (self.handler)(event).await
    }

    fn handler_name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Player Events
// ============================================================================

/// A player moved by teleport rather than locomotion. `from` is where they
/// stood before the engine moved them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerTeleportEvent {
    pub player_id: PlayerId,
    pub from: EnginePosition,
    pub to: EnginePosition,
    pub timestamp: u64,
}

/// A player died. `position` is where the death happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDeathEvent {
    pub player_id: PlayerId,
    pub position: EnginePosition,
    pub timestamp: u64,
}

/// A player respawned; `position` is where the engine placed them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRespawnEvent {
    pub player_id: PlayerId,
    pub position: EnginePosition,
    pub timestamp: u64,
}

/// A player's food level changed. Levels are engine units, 0 to
/// [`MAX_FOOD_LEVEL`](crate::types::MAX_FOOD_LEVEL).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerFoodChangeEvent {
    pub player_id: PlayerId,
    pub old_level: u8,
    pub new_level: u8,
    pub timestamp: u64,
}

/// A player disconnected; `position` is where they stood when the connection
/// closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerQuitEvent {
    pub player_id: PlayerId,
    pub position: EnginePosition,
    pub timestamp: u64,
}
