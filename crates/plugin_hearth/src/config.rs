//! Plugin configuration.
//!
//! Lives at `<data-dir>/config.toml`; a default file is written on first
//! run. Parse failures fail plugin initialization instead of being papered
//! over, so a typo never silently reverts a server to defaults.

use crate::error::ConfigError;
use crate::perms;
use hearth_api::{PlayerId, ServerContext};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs as tokio_fs;
use tracing::info;

/// Top-level plugin settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HearthConfig {
    pub homes: HomesConfig,
    pub back: BackConfig,
    pub autofeed: AutofeedConfig,
    pub respawn: RespawnConfig,
}

/// Home limits and naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HomesConfig {
    /// Home count available without any tier permission.
    pub base_limit: i64,
    /// Home name used when a command omits one.
    pub default_name: String,
    /// Named tiers: holding `hearth.tier.<name>` grants that limit. A
    /// negative limit means unlimited.
    pub tiers: BTreeMap<String, i64>,
}

impl Default for HomesConfig {
    fn default() -> Self {
        Self {
            base_limit: 3,
            default_name: "home".to_string(),
            tiers: BTreeMap::new(),
        }
    }
}

/// Back-teleport behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackConfig {
    /// Same-world teleports shorter than this many blocks do not update the
    /// return point. Cross-world teleports always do.
    pub min_distance: f64,
}

impl Default for BackConfig {
    fn default() -> Self {
        Self { min_distance: 1.0 }
    }
}

/// Automatic food restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutofeedConfig {
    /// Master switch; individual players can still opt out.
    pub enabled: bool,
}

impl Default for AutofeedConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Respawn handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RespawnConfig {
    /// Teleport respawning players to their home after the engine places
    /// them. Also requires the `hearth.home.respawn` permission.
    pub return_home: bool,
    /// Which home name to use for the respawn return.
    pub home_name: String,
}

impl Default for RespawnConfig {
    fn default() -> Self {
        Self {
            return_home: false,
            home_name: "home".to_string(),
        }
    }
}

impl HearthConfig {
    /// Loads the configuration, writing the default file first if none
    /// exists yet.
    pub async fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        match tokio_fs::read_to_string(path).await {
            Ok(contents) => {
                let config = toml::from_str(&contents)
                    .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
                info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                let contents =
                    toml::to_string_pretty(&config).map_err(ConfigError::Serialize)?;
                if let Some(parent) = path.parent() {
                    tokio_fs::create_dir_all(parent)
                        .await
                        .map_err(|err| ConfigError::Write(path.to_path_buf(), err))?;
                }
                tokio_fs::write(path, contents)
                    .await
                    .map_err(|err| ConfigError::Write(path.to_path_buf(), err))?;
                info!("Wrote default configuration to {}", path.display());
                Ok(config)
            }
            Err(e) => Err(ConfigError::Read(path.to_path_buf(), e)),
        }
    }

    /// Effective home limit for `player`: the best of the base limit and
    /// every tier they hold. `None` means unlimited.
    pub fn home_limit(&self, context: &dyn ServerContext, player: PlayerId) -> Option<u32> {
        let mut best = self.homes.base_limit;
        for (tier, limit) in &self.homes.tiers {
            if context.has_permission(player, &perms::tier(tier)) {
                if *limit < 0 {
                    return None;
                }
                best = best.max(*limit);
            }
        }
        u32::try_from(best).ok()
    }
}
