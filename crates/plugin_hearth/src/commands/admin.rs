//! `/hearth <reload|status>`: administrative cache control and a health
//! readout.

use super::respond;
use crate::error::CommandError;
use crate::perms;
use crate::HearthCore;
use async_trait::async_trait;
use hearth_api::{CommandHandler, CommandInvocation, ServerError};
use std::sync::Arc;
use tracing::info;

pub struct HearthCommand {
    core: Arc<HearthCore>,
}

impl HearthCommand {
    pub fn new(core: Arc<HearthCore>) -> Self {
        Self { core }
    }

    async fn run(&self, invocation: &CommandInvocation) -> Result<String, CommandError> {
        let core = &self.core;
        let player = invocation.player_id;
        if !core.context.has_permission(player, perms::ADMIN) {
            return Err(CommandError::PermissionDenied);
        }

        match invocation.arg(0) {
            Some(sub) if sub.eq_ignore_ascii_case("reload") => {
                let flushed = core.store.evict_all().await;
                info!("Record cache cleared by {} ({} flushed)", player, flushed);
                Ok(format!(
                    "Record cache cleared; {flushed} record(s) flushed to disk."
                ))
            }
            Some(sub) if sub.eq_ignore_ascii_case("status") => {
                let stats = core.events.stats();
                Ok(format!(
                    "{} record(s) cached; {} event(s) dispatched, {} handler failure(s).",
                    core.store.cached(),
                    stats.events_emitted,
                    stats.handler_failures
                ))
            }
            _ => Err(CommandError::Usage("/hearth <reload|status>")),
        }
    }
}

#[async_trait]
impl CommandHandler for HearthCommand {
    async fn execute(&self, invocation: &CommandInvocation) -> Result<(), ServerError> {
        let outcome = self.run(invocation).await;
        respond(&self.core, invocation.player_id, outcome).await
    }

    async fn completions(&self, invocation: &CommandInvocation) -> Vec<String> {
        if invocation.args.len() > 1 {
            return Vec::new();
        }
        vec!["reload".to_string(), "status".to_string()]
    }
}
