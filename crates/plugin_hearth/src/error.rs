//! Error types for the Hearth plugin.
//!
//! `CommandError` doubles as the user-facing message catalog: its `Display`
//! text is sent to the player verbatim. Storage and config errors carry the
//! path and underlying cause for the log.

use hearth_api::{PlayerId, ServerError};
use std::{io::Error as IoError, path::PathBuf};
use thiserror::Error;

/// Playerdata persistence errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read file {0}: {1}")]
    FileRead(PathBuf, IoError),

    #[error("Failed to create file {0}: {1}")]
    FileCreate(PathBuf, IoError),

    #[error("Failed to write to file {0}: {1}")]
    FileWrite(PathBuf, IoError),

    #[error("Failed to sync file {0}: {1}")]
    FileSync(PathBuf, IoError),

    #[error("Failed to rename file from {0} to {1}: {2}")]
    FileRename(PathBuf, PathBuf, IoError),

    #[error("Failed to parse file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Failed to serialize record for {0}: {1}")]
    Serialize(PlayerId, toml::ser::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Configuration loading errors. Any of these fails plugin initialization.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {0}: {1}")]
    Read(PathBuf, IoError),

    #[error("Failed to write default config {0}: {1}")]
    Write(PathBuf, IoError),

    #[error("Failed to parse config {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Failed to serialize default config: {0}")]
    Serialize(toml::ser::Error),
}

/// Why a command did not do what the player asked.
///
/// Every variant is a normal outcome, not a fault: the text is shown to the
/// player and the handler returns cleanly. `Internal` wraps host failures
/// and is additionally logged at error severity.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("You don't have permission to do that.")]
    PermissionDenied,

    #[error("You don't have a home named '{0}'.")]
    UnknownHome(String),

    #[error("You haven't set any homes yet.")]
    NoHomes,

    #[error("Home limit reached ({0}). Delete one before setting another.")]
    HomeLimitReached(u32),

    #[error("Invalid home name '{0}': use 1-32 letters, digits, '-' or '_'.")]
    InvalidHomeName(String),

    #[error("The world that location was in is no longer available.")]
    WorldUnavailable,

    #[error("You have no location to return to.")]
    NothingToReturnTo,

    #[error("Your current position could not be determined.")]
    PositionUnavailable,

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Something went wrong running that command.")]
    Internal(#[from] ServerError),
}

impl CommandError {
    /// Whether this failure should be logged as an error rather than shown
    /// and forgotten.
    pub fn is_internal(&self) -> bool {
        matches!(self, CommandError::Internal(_))
    }
}
