//! `/back`: return to the previous location, or to the death point when
//! that was the latest event and the player may return there.

use super::respond;
use crate::codec;
use crate::error::CommandError;
use crate::perms;
use crate::types::BackTarget;
use crate::HearthCore;
use async_trait::async_trait;
use hearth_api::{CommandHandler, CommandInvocation, ServerError};
use std::sync::Arc;

const DEATH_FALLBACK_NOTICE: &str =
    "You can't return to your death point; taking you to your last location instead.";

pub struct BackCommand {
    core: Arc<HearthCore>,
}

impl BackCommand {
    pub fn new(core: Arc<HearthCore>) -> Self {
        Self { core }
    }

    async fn run(&self, invocation: &CommandInvocation) -> Result<String, CommandError> {
        let core = &self.core;
        let player = invocation.player_id;
        if !core.context.has_permission(player, perms::BACK) {
            return Err(CommandError::PermissionDenied);
        }

        let death_allowed = core.context.has_permission(player, perms::BACK_DEATH);
        let record = core.store.get(player).await;
        let target = record
            .back_target(death_allowed)
            .ok_or(CommandError::NothingToReturnTo)?;

        if matches!(target, BackTarget::DeniedDeath(_)) {
            core.context.send_message(player, DEATH_FALLBACK_NOTICE).await?;
        }

        let destination = codec::to_engine(core.context.as_ref(), target.location())
            .ok_or(CommandError::WorldUnavailable)?;
        core.context.teleport(player, destination).await?;

        Ok(match target {
            BackTarget::Death(_) => "Returned to where you died.".to_string(),
            _ => "Returned to your previous location.".to_string(),
        })
    }
}

#[async_trait]
impl CommandHandler for BackCommand {
    async fn execute(&self, invocation: &CommandInvocation) -> Result<(), ServerError> {
        let outcome = self.run(invocation).await;
        respond(&self.core, invocation.player_id, outcome).await
    }
}
