//! # Event Router
//!
//! String-keyed registration table from event names to handler lists. The
//! host emits player events into the router; plugins subscribe typed async
//! handlers during registration. Emission serializes the event once and
//! invokes every handler for the key sequentially, so a handler never runs
//! concurrently with another dispatch of the same flow.

use crate::events::{Event, EventError, EventHandler, TypedEventHandler};
use dashmap::DashMap;
use smallvec::SmallVec;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, warn};

type HandlerList = SmallVec<[Arc<dyn EventHandler>; 2]>;

/// Dispatch counters, readable at any time via [`EventRouter::stats`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterStats {
    pub handlers_registered: usize,
    pub events_emitted: u64,
    pub handler_failures: u64,
}

/// Routes player events to the handlers registered for them.
///
/// Handler execution failures are logged and counted but never abort the
/// emission; every handler for a key gets the event.
pub struct EventRouter {
    handlers: DashMap<String, HandlerList>,
    events_emitted: AtomicU64,
    handler_failures: AtomicU64,
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("keys", &self.handlers.len())
            .finish()
    }
}

impl EventRouter {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
            events_emitted: AtomicU64::new(0),
            handler_failures: AtomicU64::new(0),
        }
    }

    /// Registers an async handler for a player event.
    ///
    /// The closure receives the deserialized event by value. Multiple
    /// handlers may share one event name; they run in registration order.
    pub fn on_player<T, F, Fut>(&self, event_name: &str, handler: F)
    where
        T: Event + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), EventError>> + Send + 'static,
    {
        let key = format!("player:{event_name}");
        let handler_name = format!("{key}::{}", T::type_name());
        let typed = TypedEventHandler::new(handler_name, handler);
        self.handlers
            .entry(key.clone())
            .or_default()
            .push(Arc::new(typed));
        debug!("Registered handler for '{}'", key);
    }

    /// Emits a player event to every handler registered for `event_name`.
    ///
    /// Serialization happens once; each handler gets the same payload. A
    /// failing handler is logged and counted, and the remaining handlers
    /// still run.
    pub async fn emit_player<T>(&self, event_name: &str, event: &T) -> Result<(), EventError>
    where
        T: Event,
    {
        let key = format!("player:{event_name}");
        let data = event.serialize()?;
        self.events_emitted.fetch_add(1, Ordering::Relaxed);

        // Clone the Arc list out so no map guard is held across an await.
        let handlers: Vec<Arc<dyn EventHandler>> = match self.handlers.get(&key) {
            Some(list) => list.iter().cloned().collect(),
            None => Vec::new(),
        };

        if handlers.is_empty() {
            warn!("No handlers registered for '{}'", key);
            return Ok(());
        }

        for handler in handlers {
            if let Err(e) = handler.handle(&data).await {
                self.handler_failures.fetch_add(1, Ordering::Relaxed);
                error!("Handler '{}' failed for '{}': {}", handler.handler_name(), key, e);
            }
        }
        Ok(())
    }

    pub fn stats(&self) -> RouterStats {
        RouterStats {
            handlers_registered: self.handlers.iter().map(|entry| entry.value().len()).sum(),
            events_emitted: self.events_emitted.load(Ordering::Relaxed),
            handler_failures: self.handler_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a router ready to be shared between the host and its plugins.
pub fn create_event_router() -> Arc<EventRouter> {
    Arc::new(EventRouter::new())
}
