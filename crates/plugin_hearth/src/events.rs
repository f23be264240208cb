//! Event handlers: back-location bookkeeping, autofeed, respawn return,
//! and quit persistence.
//!
//! All record mutations here go through `PlayerRecordStore::update`, so the
//! durable copy reflects the change before the handler returns to the
//! router.

use crate::codec;
use crate::perms;
use crate::types::HomeName;
use crate::HearthCore;
use hearth_api::{
    EventError, PlayerDeathEvent, PlayerFoodChangeEvent, PlayerQuitEvent, PlayerRespawnEvent,
    PlayerTeleportEvent, MAX_FOOD_LEVEL,
};
use tracing::{debug, warn};

/// Records the origin of a non-trivial teleport as the return point.
///
/// Engines emit sub-block correction teleports; those stay invisible to
/// `/back`, or every `/home` would be followed by a useless return point.
pub async fn handle_teleport(
    core: &HearthCore,
    event: PlayerTeleportEvent,
) -> Result<(), EventError> {
    let min = core.config.back.min_distance;
    let same_world = event.from.world.id == event.to.world.id;
    if same_world && event.from.distance_squared(&event.to) < min * min {
        return Ok(());
    }

    let origin = codec::from_engine(&event.from);
    core.store
        .update(event.player_id, |record| record.record_teleport(origin))
        .await;
    Ok(())
}

/// Records where the player died and flags death as the latest event.
pub async fn handle_death(core: &HearthCore, event: PlayerDeathEvent) -> Result<(), EventError> {
    let position = codec::from_engine(&event.position);
    core.store
        .update(event.player_id, |record| record.record_death(position))
        .await;
    Ok(())
}

/// Optionally returns a respawning player to their home.
///
/// Best effort by design: a player mid-respawn never sees an error from
/// this, failures only reach the log.
pub async fn handle_respawn(
    core: &HearthCore,
    event: PlayerRespawnEvent,
) -> Result<(), EventError> {
    if !core.config.respawn.return_home {
        return Ok(());
    }
    let player = event.player_id;
    if !core.context.has_permission(player, perms::HOME_RESPAWN) {
        return Ok(());
    }
    let name = match HomeName::parse(&core.config.respawn.home_name) {
        Ok(name) => name,
        Err(_) => {
            warn!(
                "respawn.home_name '{}' is not a valid home name",
                core.config.respawn.home_name
            );
            return Ok(());
        }
    };

    let record = core.store.get(player).await;
    let Some(location) = record.homes.get(&name) else {
        debug!("No home '{}' to respawn {} at", name, player);
        return Ok(());
    };
    match codec::to_engine(core.context.as_ref(), location) {
        Some(destination) => {
            if let Err(e) = core.context.teleport(player, destination).await {
                warn!("Respawn return for {} failed: {}", player, e);
            }
        }
        None => debug!("Respawn home '{}' of {} has no resolvable world", name, player),
    }
    Ok(())
}

/// Tops the food level back up when it drops, unless someone opted out.
pub async fn handle_food_change(
    core: &HearthCore,
    event: PlayerFoodChangeEvent,
) -> Result<(), EventError> {
    if event.new_level >= event.old_level {
        return Ok(());
    }
    if !core.config.autofeed.enabled {
        return Ok(());
    }
    let player = event.player_id;
    if !core.context.has_permission(player, perms::AUTOFEED) {
        return Ok(());
    }
    if !core.store.get(player).await.autofeed {
        return Ok(());
    }

    core.context
        .set_food_level(player, MAX_FOOD_LEVEL)
        .await
        .map_err(|e| EventError::HandlerExecution(e.to_string()))?;
    debug!("Restored food level for {}", player);
    Ok(())
}

/// Remembers where the player stood when they disconnected.
///
/// The field is written for future use and read back by nothing; the record
/// stays cached, eviction is administrative only.
pub async fn handle_quit(core: &HearthCore, event: PlayerQuitEvent) -> Result<(), EventError> {
    let position = codec::from_engine(&event.position);
    core.store
        .update(event.player_id, |record| record.logout = Some(position))
        .await;
    Ok(())
}
