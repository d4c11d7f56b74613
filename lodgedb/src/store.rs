//! The CRUD store façade.
//!
//! [`Store`] is the persistence surface of `LodgeDB`: callers register new
//! records with [`Store::new_record`], commit them atomically with
//! [`Store::save`], rebuild the in-memory index from the backing store with
//! [`Store::reload`], and read through [`Store::all`] / [`Store::get`] /
//! [`Store::count`]. Deletion is two-phase: [`Store::delete`] marks a
//! record, the next `save` makes the removal durable.
//!
//! The store owns its engine exclusively. [`Store::close`] releases the
//! engine handle; every operation on a closed store returns
//! [`Error::Closed`].
//!
//! # Example
//!
//! ```ignore
//! use lodgedb::{MemoryStore, RecordKind, State};
//!
//! let mut store = MemoryStore::in_memory()?;
//!
//! let florida = State::new("Florida");
//! store.new_record(florida)?;
//! store.save()?;
//!
//! assert_eq!(store.count(Some(RecordKind::State))?, 1);
//! ```

use std::collections::{HashMap, HashSet};

use tracing::debug;

use lodgedb_core::encoding::{decode_record, encode_record};
use lodgedb_core::{Record, RecordKey, RecordKind};
use lodgedb_storage::backends::{MemoryEngine, RedbEngine};
use lodgedb_storage::{Cursor, StorageEngine, Transaction};

use crate::config::{Backend, Config};
use crate::error::{Error, Result};

/// A CRUD store over a storage engine.
///
/// The type parameter selects the backend; callers construct the engine
/// (or use one of the concrete aliases' constructors) and inject it. There
/// is no process-wide store instance.
///
/// # State
///
/// - **Pending-write set**: records registered via [`Store::new_record`]
///   but not yet committed.
/// - **Removal marks**: records handed to [`Store::delete`], removed from
///   the backing store by the next [`Store::save`].
/// - **Addressable index**: the in-memory view of persisted records that
///   serves all reads. [`Store::reload`] rebuilds it wholesale; a
///   successful [`Store::save`] folds its own changes into it.
pub struct Store<E: StorageEngine> {
    /// The engine handle; `None` once the store is closed.
    engine: Option<E>,
    /// Records buffered by `new_record`, keyed by composite key.
    pending: HashMap<RecordKey, Record>,
    /// Keys marked for durable removal at the next `save`.
    removals: HashSet<RecordKey>,
    /// The addressable index: composite key to record.
    index: HashMap<RecordKey, Record>,
}

/// A store over the durable redb backend.
pub type DbStore = Store<RedbEngine>;

/// A store over the in-memory backend, optionally file-snapshotted.
pub type MemoryStore = Store<MemoryEngine>;

impl<E: StorageEngine> Store<E> {
    /// Create a store over an already-opened engine.
    ///
    /// The index starts empty; call [`Store::reload`] to populate it from
    /// the backing store. The `open` constructors on the concrete aliases
    /// do both steps.
    #[must_use]
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine: Some(engine),
            pending: HashMap::new(),
            removals: HashSet::new(),
            index: HashMap::new(),
        }
    }

    /// Register a record in the pending-write set.
    ///
    /// No I/O occurs; the record becomes durable at the next [`Store::save`].
    /// Registering the same composite key twice overwrites the pending
    /// entry, and registering a key marked for removal un-marks it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the store has been closed.
    pub fn new_record(&mut self, record: impl Into<Record>) -> Result<()> {
        self.engine()?;
        let record = record.into();
        let key = record.key();
        self.removals.remove(&key);
        self.pending.insert(key, record);
        Ok(())
    }

    /// Commit the pending-write set and removal marks in one transaction.
    ///
    /// Every pending record is upserted and every marked record deleted,
    /// atomically: on failure the backing store is unchanged and both sets
    /// are left intact so the caller may retry. On success the same changes
    /// are folded into the addressable index and both sets are cleared.
    /// An empty batch succeeds without touching the engine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] on a closed store, [`Error::Storage`] if
    /// the transaction fails.
    pub fn save(&mut self) -> Result<()> {
        let engine = self.engine()?;
        if self.pending.is_empty() && self.removals.is_empty() {
            return Ok(());
        }

        let mut tx = engine.begin_write().map_err(Error::Storage)?;
        for (key, record) in &self.pending {
            let row = encode_record(record)?;
            tx.put(key.kind.table(), key.id.as_bytes(), &row).map_err(Error::Storage)?;
        }
        for key in &self.removals {
            tx.delete(key.kind.table(), key.id.as_bytes()).map_err(Error::Storage)?;
        }
        tx.commit().map_err(Error::Storage)?;

        debug!(upserts = self.pending.len(), removals = self.removals.len(), "batch committed");

        for (key, record) in self.pending.drain() {
            self.index.insert(key, record);
        }
        for key in self.removals.drain() {
            self.index.remove(&key);
        }
        Ok(())
    }

    /// Rebuild the addressable index from the backing store.
    ///
    /// The prior index is replaced wholesale, never merged, so the view is
    /// exactly what the backing store holds. Pending writes and removal
    /// marks are discarded: `reload` starts a fresh session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] on a closed store, [`Error::Storage`] if
    /// the backing store cannot be read, and [`Error::Record`] if a stored
    /// row fails to decode.
    pub fn reload(&mut self) -> Result<()> {
        let engine = self.engine()?;
        let tx = engine.begin_read().map_err(Error::Storage)?;

        let mut index = HashMap::new();
        for kind in RecordKind::ALL {
            let mut cursor = tx.scan(kind.table()).map_err(Error::Storage)?;
            while let Some((_, row)) = cursor.next().map_err(Error::Storage)? {
                let record = decode_record(kind, &row)?;
                index.insert(record.key(), record);
            }
        }
        drop(tx);

        debug!(records = index.len(), "index rebuilt");
        self.index = index;
        self.pending.clear();
        self.removals.clear();
        Ok(())
    }

    /// Every record in the index, optionally restricted to one kind.
    ///
    /// Returns an empty map, never an error, when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the store has been closed.
    pub fn all(&self, kind: Option<RecordKind>) -> Result<HashMap<RecordKey, Record>> {
        self.engine()?;
        Ok(self
            .index
            .iter()
            .filter(|(key, _)| kind.map_or(true, |k| key.kind == k))
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect())
    }

    /// Look up one record by kind and id.
    ///
    /// A missing record is the `Ok(None)` value, not an error; only a
    /// malformed id is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] on a closed store and
    /// [`Error::InvalidArgument`] for a blank id.
    pub fn get(&self, kind: RecordKind, id: &str) -> Result<Option<Record>> {
        self.engine()?;
        if id.trim().is_empty() {
            return Err(Error::InvalidArgument("id must not be blank".to_string()));
        }
        Ok(self.index.get(&RecordKey::new(kind, id)).cloned())
    }

    /// Count the records in the index, optionally restricted to one kind.
    ///
    /// Always equals the cardinality of [`Store::all`] for the same filter,
    /// without materializing the map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the store has been closed.
    pub fn count(&self, kind: Option<RecordKind>) -> Result<usize> {
        self.engine()?;
        Ok(self.index.keys().filter(|key| kind.map_or(true, |k| key.kind == k)).count())
    }

    /// Mark a record for removal at the next [`Store::save`].
    ///
    /// `None` is an explicit no-op. A record that only exists in the
    /// pending-write set is dropped from it without touching the backing
    /// store; an indexed record is removed from the index and marked for
    /// durable removal. Untracked records are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the store has been closed.
    pub fn delete(&mut self, record: Option<&Record>) -> Result<()> {
        self.engine()?;
        let Some(record) = record else {
            return Ok(());
        };

        let key = record.key();
        self.pending.remove(&key);
        if self.index.remove(&key).is_some() {
            self.removals.insert(key);
        }
        Ok(())
    }

    /// Release the engine handle.
    ///
    /// All buffered and indexed state is dropped with it; every later
    /// operation returns [`Error::Closed`]. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.engine.take().is_some() {
            debug!("store closed");
        }
        self.pending.clear();
        self.removals.clear();
        self.index.clear();
    }

    /// Whether the store has been closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.engine.is_none()
    }

    /// Number of records currently in the pending-write set.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// The engine handle, or [`Error::Closed`].
    fn engine(&self) -> Result<&E> {
        self.engine.as_ref().ok_or(Error::Closed)
    }
}

impl DbStore {
    /// Open (or create) a durable store at the given path and load its
    /// records into the index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the database cannot be opened or read.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let engine = RedbEngine::open(path).map_err(Error::Storage)?;
        let mut store = Self::with_engine(engine);
        store.reload()?;
        Ok(store)
    }
}

impl MemoryStore {
    /// Open a volatile in-memory store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the initial reload fails.
    pub fn in_memory() -> Result<Self> {
        let mut store = Self::with_engine(MemoryEngine::new());
        store.reload()?;
        Ok(store)
    }

    /// Open a file-snapshotted in-memory store and load its records into
    /// the index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the snapshot cannot be read.
    pub fn with_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let engine = MemoryEngine::with_file(path).map_err(Error::Storage)?;
        let mut store = Self::with_engine(engine);
        store.reload()?;
        Ok(store)
    }
}

/// A store over whichever backend a [`Config`] selects.
///
/// Callers that know their backend at compile time use the concrete
/// aliases directly; this enum exists for configuration-driven startup,
/// such as [`Config::from_env`]. Every store operation is forwarded to
/// the underlying alias unchanged.
pub enum AnyStore {
    /// A durable redb store.
    Db(DbStore),
    /// An in-memory store, volatile or file-snapshotted.
    Memory(MemoryStore),
}

/// Dispatch one store operation to whichever variant is live.
macro_rules! with_store {
    ($self:expr, $store:ident => $op:expr) => {
        match $self {
            AnyStore::Db($store) => $op,
            AnyStore::Memory($store) => $op,
        }
    };
}

impl AnyStore {
    /// Open the configured backend and load its records into the index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if `create_if_missing` is off and the
    /// configured path does not exist, and [`Error::Storage`] if the
    /// backend cannot be opened or read.
    pub fn open(config: &Config) -> Result<Self> {
        match &config.backend {
            Backend::Redb(path) => {
                require_present(config, path)?;
                DbStore::open(path).map(Self::Db)
            }
            Backend::Memory => MemoryStore::in_memory().map(Self::Memory),
            Backend::File(path) => {
                require_present(config, path)?;
                MemoryStore::with_file(path).map(Self::Memory)
            }
        }
    }

    /// See [`Store::new_record`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the store has been closed.
    pub fn new_record(&mut self, record: impl Into<Record>) -> Result<()> {
        with_store!(self, store => store.new_record(record))
    }

    /// See [`Store::save`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] on a closed store, [`Error::Storage`] if
    /// the transaction fails.
    pub fn save(&mut self) -> Result<()> {
        with_store!(self, store => store.save())
    }

    /// See [`Store::reload`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] on a closed store, [`Error::Storage`] if
    /// the backing store cannot be read, and [`Error::Record`] if a stored
    /// row fails to decode.
    pub fn reload(&mut self) -> Result<()> {
        with_store!(self, store => store.reload())
    }

    /// See [`Store::all`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the store has been closed.
    pub fn all(&self, kind: Option<RecordKind>) -> Result<HashMap<RecordKey, Record>> {
        with_store!(self, store => store.all(kind))
    }

    /// See [`Store::get`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] on a closed store and
    /// [`Error::InvalidArgument`] for a blank id.
    pub fn get(&self, kind: RecordKind, id: &str) -> Result<Option<Record>> {
        with_store!(self, store => store.get(kind, id))
    }

    /// See [`Store::count`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the store has been closed.
    pub fn count(&self, kind: Option<RecordKind>) -> Result<usize> {
        with_store!(self, store => store.count(kind))
    }

    /// See [`Store::delete`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the store has been closed.
    pub fn delete(&mut self, record: Option<&Record>) -> Result<()> {
        with_store!(self, store => store.delete(record))
    }

    /// See [`Store::close`].
    pub fn close(&mut self) {
        with_store!(self, store => store.close());
    }

    /// Whether the store has been closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        with_store!(self, store => store.is_closed())
    }

    /// Number of records currently in the pending-write set.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        with_store!(self, store => store.pending_count())
    }
}

/// Reject a missing path when the config says not to create one.
fn require_present(config: &Config, path: &std::path::Path) -> Result<()> {
    if !config.create_if_missing && !path.exists() {
        return Err(Error::Open(format!("no store at {}", path.display())));
    }
    Ok(())
}
