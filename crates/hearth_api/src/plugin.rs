//! # Plugin Lifecycle
//!
//! [`ServerPlugin`] is the contract a loadable plugin implements, and
//! [`declare_plugin!`] exports the C entry points the host's loader looks
//! for. Lifecycle order: `register` (wire handlers, build state), then
//! `on_enable` once the host is ready to dispatch, then `on_disable` exactly
//! once before unload.

use crate::commands::CommandRegistry;
use crate::context::ServerContext;
use crate::router::EventRouter;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failures during plugin lifecycle transitions.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin initialization failed: {0}")]
    InitializationFailed(String),

    #[error("plugin execution failed: {0}")]
    ExecutionFailed(String),

    #[error("plugin shutdown failed: {0}")]
    ShutdownFailed(String),
}

/// A plugin as the host sees it.
///
/// `register` receives the context alongside both registration tables
/// because handler construction usually needs host facts (the data
/// directory, at minimum). Handlers registered there must not assume
/// dispatch has started until `on_enable` ran.
#[async_trait]
pub trait ServerPlugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn version(&self) -> &'static str;

    /// Builds plugin state and registers every command and event handler.
    async fn register(
        &mut self,
        context: Arc<dyn ServerContext>,
        events: Arc<EventRouter>,
        commands: Arc<CommandRegistry>,
    ) -> Result<(), PluginError>;

    /// Called once after registration, before the first dispatch.
    async fn on_enable(&mut self, _context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
        Ok(())
    }

    /// Called once before unload. Durable state must be flushed here.
    async fn on_disable(&mut self, _context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
        Ok(())
    }
}

/// Exports the `create_plugin` / `destroy_plugin` symbols for a plugin type.
///
/// The type must provide a `new()` constructor. Panics are caught on both
/// sides of the boundary; a panicking constructor yields a null pointer,
/// which the loader treats as a failed load.
#[macro_export]
macro_rules! declare_plugin {
    ($plugin_type:ty) => {
        #[no_mangle]
        #[allow(improper_ctypes_definitions)]
        pub extern "C" fn create_plugin() -> *mut dyn $crate::ServerPlugin {
            let result = std::panic::catch_unwind(|| {
                let plugin: Box<dyn $crate::ServerPlugin> = Box::new(<$plugin_type>::new());
                Box::into_raw(plugin)
            });
            match result {
                Ok(ptr) => ptr,
                Err(_) => std::ptr::null_mut::<$plugin_type>() as *mut dyn $crate::ServerPlugin,
            }
        }

        /// # Safety
        ///
        /// `plugin` must be a pointer previously returned by
        /// `create_plugin` from this same library, not yet destroyed.
        #[no_mangle]
        #[allow(improper_ctypes_definitions)]
        pub unsafe extern "C" fn destroy_plugin(plugin: *mut dyn $crate::ServerPlugin) {
            if plugin.is_null() {
                return;
            }
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                drop(Box::from_raw(plugin));
            }));
        }
    };
}
