//! # Command Registry
//!
//! Registration table from command names (and aliases) to handler objects,
//! built once at plugin registration. The host feeds raw invocations in;
//! dispatch answers with a handled/unknown signal so the host can fall
//! through to other consumers. Completion asks the owning handler for
//! candidates and filters them by case-insensitive prefix of the token
//! being typed.

use crate::context::ServerError;
use crate::types::PlayerId;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, error};

/// One command as the host delivered it: the label actually typed (command
/// name or alias, without any leading slash) and the raw argument tokens.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    pub player_id: PlayerId,
    pub label: String,
    pub args: Vec<String>,
}

impl CommandInvocation {
    pub fn new(player_id: PlayerId, label: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            player_id,
            label: label.into(),
            args,
        }
    }

    /// Argument at position `index`, if present.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// The token currently being typed, for completion. Empty when the
    /// player has not started the next argument yet.
    pub fn partial(&self) -> &str {
        self.args.last().map(String::as_str).unwrap_or("")
    }
}

/// Outcome of a dispatch attempt, from the host's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// A registered handler ran (its own failures are logged, not surfaced).
    Handled,
    /// No handler owns this label; the host should keep looking.
    Unknown,
}

/// One registered command.
///
/// `execute` errors are infrastructure failures (a host call that could not
/// be performed); anything a player should read must already have been sent
/// as a message by the handler itself.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, invocation: &CommandInvocation) -> Result<(), ServerError>;

    /// Full candidate list for the argument position in `invocation`; the
    /// registry applies the prefix filter. Default: nothing to complete.
    async fn completions(&self, _invocation: &CommandInvocation) -> Vec<String> {
        Vec::new()
    }
}

/// Lookup table from lowercase command labels to their handlers.
pub struct CommandRegistry {
    commands: DashMap<String, Arc<dyn CommandHandler>>,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("labels", &self.commands.len())
            .finish()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: DashMap::new(),
        }
    }

    /// Registers `handler` under `name` and every alias. Labels are stored
    /// lowercase; a later registration for the same label replaces the
    /// earlier one.
    pub fn register(&self, name: &str, aliases: &[&str], handler: Arc<dyn CommandHandler>) {
        self.commands
            .insert(name.to_ascii_lowercase(), Arc::clone(&handler));
        for alias in aliases {
            self.commands
                .insert(alias.to_ascii_lowercase(), Arc::clone(&handler));
        }
        debug!("Registered command '{}' ({} aliases)", name, aliases.len());
    }

    /// Number of registered labels, aliases included.
    pub fn label_count(&self) -> usize {
        self.commands.len()
    }

    /// Routes one invocation to its handler.
    ///
    /// Handler failures are logged here and still count as handled; the
    /// host only needs to know whether the label belongs to this table.
    pub async fn dispatch(&self, invocation: CommandInvocation) -> CommandStatus {
        let handler = match self.commands.get(&invocation.label.to_ascii_lowercase()) {
            Some(entry) => Arc::clone(entry.value()),
            None => return CommandStatus::Unknown,
        };

        if let Err(e) = handler.execute(&invocation).await {
            error!(
                "Command '{}' failed for player {}: {}",
                invocation.label, invocation.player_id, e
            );
        }
        CommandStatus::Handled
    }

    /// Completion candidates for the token being typed, sorted, filtered by
    /// case-insensitive prefix. Unknown labels complete to nothing.
    pub async fn complete(&self, invocation: CommandInvocation) -> Vec<String> {
        let handler = match self.commands.get(&invocation.label.to_ascii_lowercase()) {
            Some(entry) => Arc::clone(entry.value()),
            None => return Vec::new(),
        };

        let prefix = invocation.partial().to_ascii_lowercase();
        let mut matches: Vec<String> = handler
            .completions(&invocation)
            .await
            .into_iter()
            .filter(|candidate| candidate.to_ascii_lowercase().starts_with(&prefix))
            .collect();
        matches.sort();
        matches
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a registry ready to be shared between the host and its plugins.
pub fn create_command_registry() -> Arc<CommandRegistry> {
    Arc::new(CommandRegistry::new())
}
