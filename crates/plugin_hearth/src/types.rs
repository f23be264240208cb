//! Player-facing data model: validated home names, stored locations, and the
//! per-player record the store persists.

use crate::error::CommandError;
use std::collections::BTreeMap;

/// Longest accepted home name, in characters.
pub const HOME_NAME_MAX_LEN: usize = 32;

/// A validated home name in its canonical lowercase form.
///
/// Accepted input matches `[A-Za-z0-9_-]{1,32}`; case differences collapse,
/// so `Base` and `base` address the same home.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HomeName(String);

impl HomeName {
    /// Validates `raw` and canonicalizes it to lowercase.
    pub fn parse(raw: &str) -> Result<Self, CommandError> {
        let valid_chars = raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if raw.is_empty() || raw.len() > HOME_NAME_MAX_LEN || !valid_chars {
            return Err(CommandError::InvalidHomeName(raw.to_string()));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HomeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored position: enough to find the world again later plus the exact
/// coordinates and view orientation.
///
/// `world_id` is kept as the raw stored string rather than a parsed id; the
/// durable files are hand-editable and resolution has a defined fallback for
/// ids that no longer parse or no longer exist (see `codec::resolve_world`).
#[derive(Debug, Clone, PartialEq)]
pub struct NamedLocation {
    pub world_id: String,
    pub world_name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
}

/// Where a back-teleport should go, given what the player may return to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackTarget<'a> {
    /// The spot of the most recent death.
    Death(&'a NamedLocation),
    /// The position before the most recent teleport.
    Previous(&'a NamedLocation),
    /// Death happened most recently but is not permitted; previous position
    /// used instead, and the player should be told why.
    DeniedDeath(&'a NamedLocation),
}

impl<'a> BackTarget<'a> {
    pub fn location(&self) -> &'a NamedLocation {
        match self {
            BackTarget::Death(loc) | BackTarget::Previous(loc) | BackTarget::DeniedDeath(loc) => {
                loc
            }
        }
    }
}

/// Everything persisted for one player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub homes: BTreeMap<HomeName, NamedLocation>,
    pub last_teleport: Option<NamedLocation>,
    pub last_death: Option<NamedLocation>,
    pub last_was_death: bool,
    pub logout: Option<NamedLocation>,
    pub autofeed: bool,
}

impl Default for PlayerRecord {
    fn default() -> Self {
        Self {
            homes: BTreeMap::new(),
            last_teleport: None,
            last_death: None,
            last_was_death: false,
            logout: None,
            autofeed: true,
        }
    }
}

impl PlayerRecord {
    /// Records the position a teleport moved the player away from.
    ///
    /// Also clears the death flag: the two are one logical update, the flag
    /// must never point at a location kind that was not the latest event.
    pub fn record_teleport(&mut self, from: NamedLocation) {
        self.last_teleport = Some(from);
        self.last_was_death = false;
    }

    /// Records where the player died, flagging death as the latest event.
    pub fn record_death(&mut self, position: NamedLocation) {
        self.last_death = Some(position);
        self.last_was_death = true;
    }

    /// Picks the back-teleport target.
    ///
    /// Death wins when it was the latest event and `death_allowed`; without
    /// the permission the previous teleport position is offered instead,
    /// marked so the caller can explain the substitution.
    pub fn back_target(&self, death_allowed: bool) -> Option<BackTarget<'_>> {
        if self.last_was_death {
            if death_allowed {
                if let Some(loc) = &self.last_death {
                    return Some(BackTarget::Death(loc));
                }
                // Flag set but no death location survived; fall through.
            } else {
                return self.last_teleport.as_ref().map(BackTarget::DeniedDeath);
            }
        }
        self.last_teleport.as_ref().map(BackTarget::Previous)
    }
}
