//! # Location & Record Codec
//!
//! Converts between in-memory types and the nested key-value form stored in
//! playerdata files, and between stored locations and live engine positions.
//!
//! Decoding is tolerant by contract: a missing key takes its documented
//! default, a present key of the wrong type is treated as missing, and an
//! absent location section decodes to absence rather than a defaulted
//! location. World resolution is a two-step lookup, stable id first, then
//! current name.

use crate::types::{HomeName, NamedLocation, PlayerRecord};
use hearth_api::{EnginePosition, ServerContext, WorldId, WorldRef};
use toml::{Table, Value};

// Location section keys.
const KEY_WORLD: &str = "world";
const KEY_WORLD_NAME: &str = "world-name";
const KEY_X: &str = "x";
const KEY_Y: &str = "y";
const KEY_Z: &str = "z";
const KEY_YAW: &str = "yaw";
const KEY_PITCH: &str = "pitch";

// Record top-level keys.
const KEY_LAST_TELEPORT: &str = "lastteleportlocation";
const KEY_LAST_DEATH: &str = "lastdeathlocation";
const KEY_LAST_WAS_DEATH: &str = "last-was-death";
const KEY_LOGOUT: &str = "logoutlocation";
const KEY_HOMES: &str = "homes";
const KEY_AUTOFEED: &str = "autofeed";

/// World name assumed when a stored location omits one.
const DEFAULT_WORLD_NAME: &str = "world";
/// Height assumed when a stored location omits `y`.
const DEFAULT_Y: f64 = 64.0;

// ============================================================================
// Location codec
// ============================================================================

/// Encodes a location as its durable section. Every key is written.
pub fn encode_location(location: &NamedLocation) -> Table {
    let mut table = Table::new();
    table.insert(
        KEY_WORLD.to_string(),
        Value::String(location.world_id.clone()),
    );
    table.insert(
        KEY_WORLD_NAME.to_string(),
        Value::String(location.world_name.clone()),
    );
    table.insert(KEY_X.to_string(), Value::Float(location.x));
    table.insert(KEY_Y.to_string(), Value::Float(location.y));
    table.insert(KEY_Z.to_string(), Value::Float(location.z));
    table.insert(KEY_YAW.to_string(), Value::Float(f64::from(location.yaw)));
    table.insert(
        KEY_PITCH.to_string(),
        Value::Float(f64::from(location.pitch)),
    );
    table
}

/// Decodes a location section, filling defaults for missing keys.
///
/// A missing `world` id decodes to the empty string, which can never parse
/// as an id and therefore resolves through the name fallback.
pub fn decode_location(table: &Table) -> NamedLocation {
    NamedLocation {
        world_id: string_or(table, KEY_WORLD, ""),
        world_name: string_or(table, KEY_WORLD_NAME, DEFAULT_WORLD_NAME),
        x: number_or(table, KEY_X, 0.0),
        y: number_or(table, KEY_Y, DEFAULT_Y),
        z: number_or(table, KEY_Z, 0.0),
        yaw: number_or(table, KEY_YAW, 0.0) as f32,
        pitch: number_or(table, KEY_PITCH, 0.0) as f32,
    }
}

fn string_or(table: &Table, key: &str, default: &str) -> String {
    match table.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => default.to_string(),
    }
}

/// Hand-edited files often drop the decimal point, so integers count too.
fn number_or(table: &Table, key: &str, default: f64) -> f64 {
    match table.get(key) {
        Some(Value::Float(f)) => *f,
        Some(Value::Integer(i)) => *i as f64,
        _ => default,
    }
}

fn bool_or(table: &Table, key: &str, default: bool) -> bool {
    match table.get(key) {
        Some(Value::Boolean(b)) => *b,
        _ => default,
    }
}

fn section<'a>(table: &'a Table, key: &str) -> Option<&'a Table> {
    match table.get(key) {
        Some(Value::Table(t)) => Some(t),
        _ => None,
    }
}

// ============================================================================
// Record codec
// ============================================================================

/// Encodes the full record. Scalars first, then the location sections, so
/// the document stays readable; the homes table is written even when empty.
pub fn encode_record(record: &PlayerRecord) -> Table {
    let mut root = Table::new();
    root.insert(KEY_AUTOFEED.to_string(), Value::Boolean(record.autofeed));
    root.insert(
        KEY_LAST_WAS_DEATH.to_string(),
        Value::Boolean(record.last_was_death),
    );
    if let Some(loc) = &record.last_teleport {
        root.insert(
            KEY_LAST_TELEPORT.to_string(),
            Value::Table(encode_location(loc)),
        );
    }
    if let Some(loc) = &record.last_death {
        root.insert(
            KEY_LAST_DEATH.to_string(),
            Value::Table(encode_location(loc)),
        );
    }
    if let Some(loc) = &record.logout {
        root.insert(KEY_LOGOUT.to_string(), Value::Table(encode_location(loc)));
    }

    let mut homes = Table::new();
    for (name, loc) in &record.homes {
        homes.insert(name.as_str().to_string(), Value::Table(encode_location(loc)));
    }
    root.insert(KEY_HOMES.to_string(), Value::Table(homes));
    root
}

/// Decodes a record, defaulting every missing or mistyped field.
///
/// Home entries whose name no longer passes validation are skipped; they
/// cannot be addressed by any command anyway.
pub fn decode_record(root: &Table) -> PlayerRecord {
    let mut record = PlayerRecord {
        autofeed: bool_or(root, KEY_AUTOFEED, true),
        last_was_death: bool_or(root, KEY_LAST_WAS_DEATH, false),
        ..PlayerRecord::default()
    };
    record.last_teleport = section(root, KEY_LAST_TELEPORT).map(decode_location);
    record.last_death = section(root, KEY_LAST_DEATH).map(decode_location);
    record.logout = section(root, KEY_LOGOUT).map(decode_location);

    if let Some(homes) = section(root, KEY_HOMES) {
        for (raw_name, value) in homes {
            if let Value::Table(loc) = value {
                if let Ok(name) = HomeName::parse(raw_name) {
                    record.homes.insert(name, decode_location(loc));
                }
            }
        }
    }
    record
}

// ============================================================================
// Engine conversions
// ============================================================================

/// Captures an engine position into its durable form. Total; the engine
/// guarantees the position's world was valid at capture time.
pub fn from_engine(position: &EnginePosition) -> NamedLocation {
    NamedLocation {
        world_id: position.world.id.to_string(),
        world_name: position.world.name.clone(),
        x: position.x,
        y: position.y,
        z: position.z,
        yaw: position.yaw,
        pitch: position.pitch,
    }
}

/// Resolves a stored world reference against the live server.
///
/// The stable id wins when it parses and is still loaded; otherwise the
/// current name is tried. `None` means the world is gone under both keys
/// and the caller owes the player an explanation.
pub fn resolve_world(
    context: &dyn ServerContext,
    world_id: &str,
    world_name: &str,
) -> Option<WorldRef> {
    if let Ok(id) = WorldId::from_str(world_id) {
        if let Some(world) = context.world_by_id(id) {
            return Some(world);
        }
    }
    context.world_by_name(world_name)
}

/// Rebuilds an engine position from a stored location, if its world still
/// resolves.
pub fn to_engine(context: &dyn ServerContext, location: &NamedLocation) -> Option<EnginePosition> {
    let world = resolve_world(context, &location.world_id, &location.world_name)?;
    Some(EnginePosition {
        world,
        x: location.x,
        y: location.y,
        z: location.z,
        yaw: location.yaw,
        pitch: location.pitch,
    })
}
