//! Permission nodes consumed by the plugin. Granting is the host's side.

pub const HOME_SET: &str = "hearth.home.set";
pub const HOME_TELEPORT: &str = "hearth.home.teleport";
pub const HOME_DELETE: &str = "hearth.home.delete";
pub const HOME_LIST: &str = "hearth.home.list";
pub const HOME_RESPAWN: &str = "hearth.home.respawn";
pub const BACK: &str = "hearth.back";
pub const BACK_DEATH: &str = "hearth.back.death";
pub const AUTOFEED: &str = "hearth.autofeed";
pub const ADMIN: &str = "hearth.admin";

/// Node granting the home-limit tier `name` from the configuration.
pub fn tier(name: &str) -> String {
    format!("hearth.tier.{name}")
}
