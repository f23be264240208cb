//! `/autofeed [on|off]`: per-player opt-out for the food-restore behavior.

use super::respond;
use crate::error::CommandError;
use crate::perms;
use crate::HearthCore;
use async_trait::async_trait;
use hearth_api::{CommandHandler, CommandInvocation, ServerError};
use std::sync::Arc;

pub struct AutofeedCommand {
    core: Arc<HearthCore>,
}

impl AutofeedCommand {
    pub fn new(core: Arc<HearthCore>) -> Self {
        Self { core }
    }

    async fn run(&self, invocation: &CommandInvocation) -> Result<String, CommandError> {
        let core = &self.core;
        let player = invocation.player_id;
        if !core.context.has_permission(player, perms::AUTOFEED) {
            return Err(CommandError::PermissionDenied);
        }

        let desired = match invocation.arg(0) {
            None => None,
            Some(s) if s.eq_ignore_ascii_case("on") => Some(true),
            Some(s) if s.eq_ignore_ascii_case("off") => Some(false),
            Some(_) => return Err(CommandError::Usage("/autofeed [on|off]")),
        };

        let enabled = core
            .store
            .update(player, |record| {
                record.autofeed = desired.unwrap_or(!record.autofeed);
                record.autofeed
            })
            .await;
        Ok(if enabled {
            "Autofeed enabled.".to_string()
        } else {
            "Autofeed disabled.".to_string()
        })
    }
}

#[async_trait]
impl CommandHandler for AutofeedCommand {
    async fn execute(&self, invocation: &CommandInvocation) -> Result<(), ServerError> {
        let outcome = self.run(invocation).await;
        respond(&self.core, invocation.player_id, outcome).await
    }

    async fn completions(&self, invocation: &CommandInvocation) -> Vec<String> {
        if invocation.args.len() > 1 {
            return Vec::new();
        }
        vec!["on".to_string(), "off".to_string()]
    }
}
