//! # Player Record Store
//!
//! In-memory cache over one TOML file per player, with write-through
//! persistence: every mutation is written back in full before the mutating
//! handler returns. Records load lazily on first access; a missing or
//! unreadable file yields defaults rather than an error, with the two cases
//! kept apart internally.
//!
//! The store is built once at plugin registration and every handler reaches
//! it through the shared core. Durable files are never deleted here.

use crate::codec;
use crate::error::{StorageError, StorageResult};
use crate::types::PlayerRecord;
use dashmap::DashMap;
use hearth_api::PlayerId;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::{fs as tokio_fs, io::AsyncWriteExt};
use tracing::{debug, error, instrument, warn};

/// Subdirectory of the plugin data dir holding the per-player files.
const PLAYERDATA_DIR: &str = "playerdata";

/// How a record came into memory.
///
/// `get` always produces a usable record; this tag keeps "never saved
/// before" distinguishable from "file exists but is damaged".
#[derive(Debug)]
pub enum LoadOutcome {
    /// Deserialized from the player's file.
    Loaded(PlayerRecord),
    /// No file on disk; defaults.
    Missing(PlayerRecord),
    /// File exists but could not be read or parsed; defaults. The damaged
    /// file stays on disk untouched until the next save overwrites it.
    Unreadable(PlayerRecord, StorageError),
}

impl LoadOutcome {
    pub fn record(&self) -> &PlayerRecord {
        match self {
            LoadOutcome::Loaded(record)
            | LoadOutcome::Missing(record)
            | LoadOutcome::Unreadable(record, _) => record,
        }
    }
}

/// Cache of player records backed by `<data-dir>/playerdata/<uuid>.toml`.
pub struct PlayerRecordStore {
    dir: PathBuf,
    cache: DashMap<PlayerId, PlayerRecord>,
}

impl std::fmt::Debug for PlayerRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerRecordStore")
            .field("dir", &self.dir)
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl PlayerRecordStore {
    /// Creates the store rooted at `data_dir`, ensuring the playerdata
    /// directory exists.
    pub fn new(data_dir: &Path) -> Self {
        let dir = data_dir.join(PLAYERDATA_DIR);
        if !dir.exists() {
            if let Err(e) = fs::create_dir_all(&dir) {
                error!("Failed to create playerdata directory {}: {}", dir.display(), e);
            }
        }
        Self {
            dir,
            cache: DashMap::new(),
        }
    }

    fn record_path(&self, player: PlayerId) -> PathBuf {
        self.dir.join(format!("{player}.toml"))
    }

    /// Reads a record straight from disk, bypassing and not touching the
    /// cache.
    #[instrument(skip(self))]
    pub async fn load_outcome(&self, player: PlayerId) -> LoadOutcome {
        let path = self.record_path(player);
        match tokio_fs::read_to_string(&path).await {
            Ok(contents) => match contents.parse::<toml::Table>() {
                Ok(table) => LoadOutcome::Loaded(codec::decode_record(&table)),
                Err(e) => LoadOutcome::Unreadable(
                    PlayerRecord::default(),
                    StorageError::Parse(path, e),
                ),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                LoadOutcome::Missing(PlayerRecord::default())
            }
            Err(e) => {
                LoadOutcome::Unreadable(PlayerRecord::default(), StorageError::FileRead(path, e))
            }
        }
    }

    /// Cached record for `player`, loading it on first access.
    ///
    /// Never fails: degraded loads fall back to defaults and are logged.
    pub async fn get(&self, player: PlayerId) -> PlayerRecord {
        if let Some(record) = self.cache.get(&player) {
            return record.clone();
        }
        let record = match self.load_outcome(player).await {
            LoadOutcome::Loaded(record) => {
                debug!("Loaded record for {}", player);
                record
            }
            LoadOutcome::Missing(record) => {
                debug!("No stored record for {}, starting from defaults", player);
                record
            }
            LoadOutcome::Unreadable(record, reason) => {
                warn!(
                    "Record for {} is unreadable ({}); serving defaults, file kept for inspection",
                    player, reason
                );
                record
            }
        };
        self.cache.insert(player, record.clone());
        record
    }

    /// Mutates the cached record, loading it first if needed, and writes the
    /// whole record back before returning.
    ///
    /// A failed write is logged at error severity and the in-memory record
    /// stays authoritative; the mutation's return value comes back either
    /// way.
    pub async fn update<R>(
        &self,
        player: PlayerId,
        mutate: impl FnOnce(&mut PlayerRecord) -> R,
    ) -> R {
        if !self.cache.contains_key(&player) {
            let _ = self.get(player).await;
        }
        let (result, snapshot) = {
            let mut entry = self.cache.entry(player).or_default();
            let result = mutate(entry.value_mut());
            (result, entry.value().clone())
            // Entry guard drops here; no map lock is held across the write.
        };
        if let Err(e) = self.write_record(player, &snapshot).await {
            error!("Failed to persist record for {}: {}", player, e);
        }
        result
    }

    /// Serializes the full cached record for `player` to its file,
    /// overwriting it completely. No-op when the player is not cached.
    #[instrument(skip(self))]
    pub async fn save(&self, player: PlayerId) -> StorageResult<()> {
        let snapshot = match self.cache.get(&player) {
            Some(record) => record.clone(),
            None => return Ok(()),
        };
        self.write_record(player, &snapshot).await
    }

    async fn write_record(&self, player: PlayerId, record: &PlayerRecord) -> StorageResult<()> {
        let path = self.record_path(player);
        let temp_path = path.with_extension("tmp");

        let table = codec::encode_record(record);
        let contents = toml::to_string_pretty(&table)
            .map_err(|e| StorageError::Serialize(player, e))?;

        let mut file = tokio_fs::File::create(&temp_path)
            .await
            .map_err(|e| StorageError::FileCreate(temp_path.clone(), e))?;

        file.write_all(contents.as_bytes())
            .await
            .map_err(|e| StorageError::FileWrite(temp_path.clone(), e))?;

        file.sync_all()
            .await
            .map_err(|e| StorageError::FileSync(temp_path.clone(), e))?;

        // Atomic rename
        tokio_fs::rename(&temp_path, &path)
            .await
            .map_err(|e| StorageError::FileRename(temp_path, path, e))?;

        debug!("Saved record for {}", player);
        Ok(())
    }

    /// Saves every cached record, then clears the cache. Administrative
    /// reload path; records reload lazily afterward. Returns how many
    /// records were written.
    pub async fn evict_all(&self) -> usize {
        let flushed = self.flush_all().await;
        self.cache.clear();
        flushed
    }

    /// Saves every cached record without evicting anything. Shutdown path.
    /// Failed saves are logged and do not stop the pass.
    pub async fn flush_all(&self) -> usize {
        let players: Vec<PlayerId> = self.cache.iter().map(|entry| *entry.key()).collect();
        let mut flushed = 0;
        for player in players {
            match self.save(player).await {
                Ok(()) => flushed += 1,
                Err(e) => error!("Failed to flush record for {}: {}", player, e),
            }
        }
        flushed
    }

    /// Number of records currently cached.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
