//! # Core Type Definitions
//!
//! Fundamental identifier and position types shared between the host and its
//! plugins. Wrapper types keep the different UUID-backed identifiers from
//! being confused with one another, and [`EnginePosition`] is the engine's
//! own representation of a point in a world plus view orientation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Food level of a fully fed player. Engine food values range from 0 to this.
pub const MAX_FOOD_LEVEL: u8 = 20;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a player.
///
/// Stable across display-name changes and reconnects; the same player always
/// carries the same id for the lifetime of their account.
///
/// # Examples
///
/// ```
/// use hearth_api::PlayerId;
///
/// let id = PlayerId::new();
/// assert_eq!(id.to_string().len(), 36);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Creates a new random player id (UUID v4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a player id from its canonical string form.
    pub fn from_str(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::str::FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s)
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a loaded world.
///
/// World ids survive renames; the human-readable world name does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(pub Uuid);

impl WorldId {
    /// Creates a new random world id (UUID v4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a world id from its canonical string form.
    pub fn from_str(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::str::FromStr for WorldId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s)
    }
}

impl std::fmt::Display for WorldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Positions
// ============================================================================

/// Handle to a loaded world: its stable id plus its current name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldRef {
    pub id: WorldId,
    pub name: String,
}

impl WorldRef {
    pub fn new(id: WorldId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// The engine's native position: a point in a specific world plus the view
/// orientation in degrees.
///
/// An `EnginePosition` always refers to a world that was loaded at the time
/// the position was captured. Coordinates are double precision; orientation
/// is single precision, matching the engine's wire representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnginePosition {
    pub world: WorldRef,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
}

impl EnginePosition {
    /// Creates a position with neutral orientation.
    pub fn new(world: WorldRef, x: f64, y: f64, z: f64) -> Self {
        Self {
            world,
            x,
            y,
            z,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Squared straight-line distance to `other`, ignoring orientation.
    ///
    /// Callers comparing against a threshold should square the threshold
    /// instead of taking a root here. Positions in different worlds have no
    /// meaningful distance; this only considers coordinates.
    pub fn distance_squared(&self, other: &EnginePosition) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }
}

impl std::fmt::Display for EnginePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({:.1}, {:.1}, {:.1})",
            self.world.name, self.x, self.y, self.z
        )
    }
}
