//! In-memory storage backend with optional file snapshots.
//!
//! [`MemoryEngine`] keeps every row in an ordered in-memory map. Write
//! transactions buffer their puts and deletes and apply them to the shared
//! map on commit, so an uncommitted transaction never becomes visible.
//!
//! With [`MemoryEngine::with_file`], the engine loads its contents from a
//! JSON snapshot on open and rewrites the snapshot after every committed
//! write (temp file + rename, so a crash mid-write leaves the previous
//! snapshot intact). Keys contain the table-separator byte and are stored
//! base64-encoded.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::debug;

use crate::engine::{Cursor, CursorResult, KeyValue, StorageEngine, StorageError, Transaction};

use super::keys::{encode_key, table_end_key, table_start_key};

/// The shared row map: physical key to row payload.
type Map = BTreeMap<Vec<u8>, Vec<u8>>;

/// An in-memory storage engine, with optional JSON-file snapshot persistence.
///
/// Without a snapshot file this is a purely volatile store, suitable for
/// tests and throwaway sessions. With one, the full map is reloaded on open
/// and rewritten on each commit; this trades write amplification for a
/// human-readable single-file format, which is acceptable at this domain's
/// table sizes.
pub struct MemoryEngine {
    /// The shared row map.
    data: Arc<RwLock<Map>>,
    /// Snapshot file path, if persistence is enabled.
    snapshot: Option<PathBuf>,
}

impl MemoryEngine {
    /// Create a volatile in-memory engine.
    #[must_use]
    pub fn new() -> Self {
        Self { data: Arc::new(RwLock::new(Map::new())), snapshot: None }
    }

    /// Create an engine backed by a JSON snapshot file.
    ///
    /// If the file exists its contents are loaded; otherwise the engine
    /// starts empty and the file is created on the first commit.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if an existing snapshot cannot be
    /// read or parsed.
    pub fn with_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let map = if path.exists() { load_snapshot(&path)? } else { Map::new() };
        debug!(path = %path.display(), rows = map.len(), "opened file-backed memory store");
        Ok(Self { data: Arc::new(RwLock::new(map)), snapshot: Some(path) })
    }

    /// Number of rows currently in the store, across all tables.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Internal`] if the store lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(read_lock(&self.data)?.len())
    }

    /// Whether the store is empty.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Internal`] if the store lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(read_lock(&self.data)?.is_empty())
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageEngine for MemoryEngine {
    type Transaction<'a>
        = MemoryTransaction
    where
        Self: 'a;

    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError> {
        Ok(MemoryTransaction {
            data: Arc::clone(&self.data),
            snapshot: None,
            read_only: true,
            puts: BTreeMap::new(),
            deletes: BTreeSet::new(),
        })
    }

    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError> {
        Ok(MemoryTransaction {
            data: Arc::clone(&self.data),
            snapshot: self.snapshot.clone(),
            read_only: false,
            puts: BTreeMap::new(),
            deletes: BTreeSet::new(),
        })
    }
}

/// A transaction for the in-memory engine.
///
/// Write transactions buffer changes locally; nothing reaches the shared
/// map (or the snapshot file) until [`Transaction::commit`].
pub struct MemoryTransaction {
    /// The engine's shared row map.
    data: Arc<RwLock<Map>>,
    /// Snapshot path to rewrite on commit, if persistence is enabled.
    snapshot: Option<PathBuf>,
    /// Whether this transaction rejects writes.
    read_only: bool,
    /// Buffered puts, keyed by physical key.
    puts: BTreeMap<Vec<u8>, Vec<u8>>,
    /// Buffered deletes, by physical key.
    deletes: BTreeSet<Vec<u8>>,
}

impl Transaction for MemoryTransaction {
    type Cursor<'a>
        = MemoryCursor
    where
        Self: 'a;

    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let physical = encode_key(table, key);
        if let Some(value) = self.puts.get(&physical) {
            return Ok(Some(value.clone()));
        }
        if self.deletes.contains(&physical) {
            return Ok(None);
        }
        Ok(read_lock(&self.data)?.get(&physical).cloned())
    }

    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::ReadOnly);
        }
        let physical = encode_key(table, key);
        self.deletes.remove(&physical);
        self.puts.insert(physical, value.to_vec());
        Ok(())
    }

    fn delete(&mut self, table: &str, key: &[u8]) -> Result<bool, StorageError> {
        if self.read_only {
            return Err(StorageError::ReadOnly);
        }
        let physical = encode_key(table, key);
        let buffered = self.puts.remove(&physical).is_some();
        if self.deletes.contains(&physical) {
            return Ok(false);
        }
        let existed = buffered || read_lock(&self.data)?.contains_key(&physical);
        self.deletes.insert(physical);
        Ok(existed)
    }

    fn scan(&self, table: &str) -> Result<Self::Cursor<'_>, StorageError> {
        let start = table_start_key(table);
        let end = table_end_key(table);
        let prefix_len = start.len();

        // Merge the committed map with this transaction's buffered changes.
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = read_lock(&self.data)?
            .range(start.clone()..end.clone())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for key in self.deletes.range(start.clone()..end.clone()) {
            merged.remove(key);
        }
        for (key, value) in self.puts.range(start..end) {
            merged.insert(key.clone(), value.clone());
        }

        let entries =
            merged.into_iter().map(|(k, v)| (k[prefix_len..].to_vec(), v)).collect::<Vec<_>>();
        Ok(MemoryCursor { entries: entries.into() })
    }

    fn commit(self) -> Result<(), StorageError> {
        if self.read_only {
            return Ok(());
        }

        let mut map = self
            .data
            .write()
            .map_err(|_| StorageError::Internal("memory store lock poisoned".into()))?;
        for key in &self.deletes {
            map.remove(key);
        }
        for (key, value) in self.puts {
            map.insert(key, value);
        }

        if let Some(path) = &self.snapshot {
            write_snapshot(path, &map)?;
            debug!(path = %path.display(), rows = map.len(), "snapshot rewritten");
        }
        Ok(())
    }

    fn rollback(self) -> Result<(), StorageError> {
        // Buffered changes are simply discarded.
        Ok(())
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}

/// A cursor over the rows of one logical table.
pub struct MemoryCursor {
    /// Remaining rows, in key order.
    entries: std::collections::VecDeque<KeyValue>,
}

impl Cursor for MemoryCursor {
    fn next(&mut self) -> CursorResult {
        Ok(self.entries.pop_front())
    }
}

fn read_lock(data: &Arc<RwLock<Map>>) -> Result<std::sync::RwLockReadGuard<'_, Map>, StorageError> {
    data.read().map_err(|_| StorageError::Internal("memory store lock poisoned".into()))
}

/// Load a snapshot file into a row map.
fn load_snapshot(path: &Path) -> Result<Map, StorageError> {
    let bytes = std::fs::read(path)?;
    let pairs: Vec<(String, String)> = serde_json::from_slice(&bytes)
        .map_err(|e| StorageError::Open(format!("invalid snapshot {}: {e}", path.display())))?;

    let mut map = Map::new();
    for (key, value) in pairs {
        let key = BASE64
            .decode(key)
            .map_err(|e| StorageError::Open(format!("invalid snapshot key: {e}")))?;
        let value = BASE64
            .decode(value)
            .map_err(|e| StorageError::Open(format!("invalid snapshot value: {e}")))?;
        map.insert(key, value);
    }
    Ok(map)
}

/// Write the row map to the snapshot file atomically.
fn write_snapshot(path: &Path, map: &Map) -> Result<(), StorageError> {
    let pairs: Vec<(String, String)> =
        map.iter().map(|(k, v)| (BASE64.encode(k), BASE64.encode(v))).collect();
    let bytes = serde_json::to_vec(&pairs)
        .map_err(|e| StorageError::Internal(format!("snapshot serialization failed: {e}")))?;

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
