//! Command handlers.
//!
//! Each command is a small struct around the shared [`HearthCore`]. The
//! inner logic returns `Result<String, CommandError>`: the success message
//! or the refusal to show the player. [`respond`] does the showing, so the
//! registry only ever sees host-level failures.

mod admin;
mod autofeed;
mod back;
mod homes;

pub use admin::HearthCommand;
pub use autofeed::AutofeedCommand;
pub use back::BackCommand;
pub use homes::{DelHomeCommand, HomeCommand, HomesCommand, SetHomeCommand};

use crate::error::CommandError;
use crate::HearthCore;
use hearth_api::{PlayerId, ServerError};
use tracing::{debug, error};

/// Delivers a command outcome to the player.
///
/// Refusals are shown with their `Display` text; host failures are logged
/// and shown as a generic apology. Only the delivery itself can error.
pub(crate) async fn respond(
    core: &HearthCore,
    player: PlayerId,
    outcome: Result<String, CommandError>,
) -> Result<(), ServerError> {
    let text = match outcome {
        Ok(message) => message,
        Err(failure) => {
            if failure.is_internal() {
                error!("Command failed for {}: {}", player, failure);
            } else {
                debug!("Command refused for {}: {}", player, failure);
            }
            failure.to_string()
        }
    };
    core.context.send_message(player, &text).await
}
