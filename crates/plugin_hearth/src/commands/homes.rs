//! The home family: `/sethome`, `/home`, `/delhome`, `/homes`.

use super::respond;
use crate::codec;
use crate::error::CommandError;
use crate::perms;
use crate::types::{HomeName, PlayerRecord};
use crate::HearthCore;
use async_trait::async_trait;
use hearth_api::{CommandHandler, CommandInvocation, PlayerId, ServerError};
use std::sync::Arc;

/// The player's own home names, for completion.
async fn home_names(core: &HearthCore, player: PlayerId) -> Vec<String> {
    core.store
        .get(player)
        .await
        .homes
        .keys()
        .map(|name| name.as_str().to_string())
        .collect()
}

/// Home name a bare `/home` or `/sethome` refers to.
fn default_home_name(core: &HearthCore) -> Result<HomeName, CommandError> {
    HomeName::parse(&core.config.homes.default_name)
}

/// `/sethome [name]`: store the current position under a home name.
pub struct SetHomeCommand {
    core: Arc<HearthCore>,
}

impl SetHomeCommand {
    pub fn new(core: Arc<HearthCore>) -> Self {
        Self { core }
    }

    async fn run(&self, invocation: &CommandInvocation) -> Result<String, CommandError> {
        let core = &self.core;
        let player = invocation.player_id;
        if !core.context.has_permission(player, perms::HOME_SET) {
            return Err(CommandError::PermissionDenied);
        }

        let name = match invocation.arg(0) {
            Some(raw) => HomeName::parse(raw)?,
            None => default_home_name(core)?,
        };
        let position = core
            .context
            .position_of(player)
            .ok_or(CommandError::PositionUnavailable)?;
        let location = codec::from_engine(&position);

        // Limit applies to new names only; overwriting stays allowed.
        let record = core.store.get(player).await;
        if !record.homes.contains_key(&name) {
            if let Some(limit) = core.config.home_limit(core.context.as_ref(), player) {
                if record.homes.len() as u32 >= limit {
                    return Err(CommandError::HomeLimitReached(limit));
                }
            }
        }

        let replaced = core
            .store
            .update(player, |record| {
                record.homes.insert(name.clone(), location).is_some()
            })
            .await;
        Ok(if replaced {
            format!("Home '{name}' updated.")
        } else {
            format!("Home '{name}' set.")
        })
    }
}

#[async_trait]
impl CommandHandler for SetHomeCommand {
    async fn execute(&self, invocation: &CommandInvocation) -> Result<(), ServerError> {
        let outcome = self.run(invocation).await;
        respond(&self.core, invocation.player_id, outcome).await
    }

    async fn completions(&self, invocation: &CommandInvocation) -> Vec<String> {
        if invocation.args.len() > 1 {
            return Vec::new();
        }
        home_names(&self.core, invocation.player_id).await
    }
}

/// `/home [name]`: teleport to a stored home.
pub struct HomeCommand {
    core: Arc<HearthCore>,
}

impl HomeCommand {
    pub fn new(core: Arc<HearthCore>) -> Self {
        Self { core }
    }

    /// Bare `/home` goes to the default name, or to the only home when the
    /// default is absent and exactly one exists.
    fn implied_name(core: &HearthCore, record: &PlayerRecord) -> Result<HomeName, CommandError> {
        let default = default_home_name(core)?;
        if !record.homes.contains_key(&default) && record.homes.len() == 1 {
            if let Some(only) = record.homes.keys().next() {
                return Ok(only.clone());
            }
        }
        Ok(default)
    }

    async fn run(&self, invocation: &CommandInvocation) -> Result<String, CommandError> {
        let core = &self.core;
        let player = invocation.player_id;
        if !core.context.has_permission(player, perms::HOME_TELEPORT) {
            return Err(CommandError::PermissionDenied);
        }

        let record = core.store.get(player).await;
        let name = match invocation.arg(0) {
            Some(raw) => HomeName::parse(raw)?,
            None => Self::implied_name(core, &record)?,
        };
        let location = record.homes.get(&name).ok_or_else(|| {
            if record.homes.is_empty() {
                CommandError::NoHomes
            } else {
                CommandError::UnknownHome(name.to_string())
            }
        })?;
        let destination = codec::to_engine(core.context.as_ref(), location)
            .ok_or(CommandError::WorldUnavailable)?;

        core.context.teleport(player, destination).await?;
        Ok(format!("Teleported to home '{name}'."))
    }
}

#[async_trait]
impl CommandHandler for HomeCommand {
    async fn execute(&self, invocation: &CommandInvocation) -> Result<(), ServerError> {
        let outcome = self.run(invocation).await;
        respond(&self.core, invocation.player_id, outcome).await
    }

    async fn completions(&self, invocation: &CommandInvocation) -> Vec<String> {
        if invocation.args.len() > 1 {
            return Vec::new();
        }
        home_names(&self.core, invocation.player_id).await
    }
}

/// `/delhome <name>`: forget a home. The durable file shrinks on the next
/// write-through; nothing is deleted from disk beyond that.
pub struct DelHomeCommand {
    core: Arc<HearthCore>,
}

impl DelHomeCommand {
    pub fn new(core: Arc<HearthCore>) -> Self {
        Self { core }
    }

    async fn run(&self, invocation: &CommandInvocation) -> Result<String, CommandError> {
        let core = &self.core;
        let player = invocation.player_id;
        if !core.context.has_permission(player, perms::HOME_DELETE) {
            return Err(CommandError::PermissionDenied);
        }

        let raw = invocation.arg(0).ok_or(CommandError::Usage("/delhome <name>"))?;
        let name = HomeName::parse(raw)?;

        let record = core.store.get(player).await;
        if !record.homes.contains_key(&name) {
            return Err(CommandError::UnknownHome(name.to_string()));
        }

        core.store
            .update(player, |record| {
                record.homes.remove(&name);
            })
            .await;
        Ok(format!("Home '{name}' deleted."))
    }
}

#[async_trait]
impl CommandHandler for DelHomeCommand {
    async fn execute(&self, invocation: &CommandInvocation) -> Result<(), ServerError> {
        let outcome = self.run(invocation).await;
        respond(&self.core, invocation.player_id, outcome).await
    }

    async fn completions(&self, invocation: &CommandInvocation) -> Vec<String> {
        if invocation.args.len() > 1 {
            return Vec::new();
        }
        home_names(&self.core, invocation.player_id).await
    }
}

/// `/homes`: list stored homes with the current count and limit.
pub struct HomesCommand {
    core: Arc<HearthCore>,
}

impl HomesCommand {
    pub fn new(core: Arc<HearthCore>) -> Self {
        Self { core }
    }

    async fn run(&self, invocation: &CommandInvocation) -> Result<String, CommandError> {
        let core = &self.core;
        let player = invocation.player_id;
        if !core.context.has_permission(player, perms::HOME_LIST) {
            return Err(CommandError::PermissionDenied);
        }

        let record = core.store.get(player).await;
        if record.homes.is_empty() {
            return Ok("You haven't set any homes yet.".to_string());
        }

        let names: Vec<&str> = record.homes.keys().map(HomeName::as_str).collect();
        let count = match core.config.home_limit(core.context.as_ref(), player) {
            Some(limit) => format!("{}/{}", names.len(), limit),
            None => names.len().to_string(),
        };
        Ok(format!("Homes ({count}): {}", names.join(", ")))
    }
}

#[async_trait]
impl CommandHandler for HomesCommand {
    async fn execute(&self, invocation: &CommandInvocation) -> Result<(), ServerError> {
        let outcome = self.run(invocation).await;
        respond(&self.core, invocation.player_id, outcome).await
    }
}
