//! Integration tests for the CRUD store façade.
//!
//! The contract suite runs once per backend: the store's behavior must not
//! depend on which engine is underneath it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lodgedb::{
    AnyStore, City, Config, DbStore, Error, MemoryStore, Record, RecordKind, State,
    StorageEngine, Store, Transaction,
};
use lodgedb_storage::backends::{MemoryCursor, MemoryEngine, MemoryTransaction, RedbEngine};
use lodgedb_storage::StorageError;

/// Build a fresh, empty store for each scenario.
fn fresh_db_store() -> DbStore {
    let engine = RedbEngine::in_memory().expect("failed to create engine");
    let mut store = Store::with_engine(engine);
    store.reload().expect("failed to reload");
    store
}

fn fresh_memory_store() -> MemoryStore {
    MemoryStore::in_memory().expect("failed to open store")
}

/// Run the full contract suite against one backend.
fn run_store_suite<E: StorageEngine>(make: impl Fn() -> Store<E>) {
    test_new_and_save(make());
    test_delete_no_arg(make());
    test_delete_with_arg(make());
    test_all(make());
    test_get(make());
    test_count(make());
    test_save_clears_pending(make());
    test_reload_replaces_index(make());
}

#[test]
fn db_store_contract() {
    run_store_suite(fresh_db_store);
}

#[test]
fn memory_store_contract() {
    run_store_suite(fresh_memory_store);
}

/// Registering records and saving makes them durable, with per-kind counts.
fn test_new_and_save<E: StorageEngine>(mut store: Store<E>) {
    let florida = State::new("Florida");
    let miami = City::new("Miami", florida.id.clone());
    let texas = State::new("Texas");
    let austin = City::new("Austin", texas.id.clone());
    let washington = State::new("Washington D.C.");
    let washington_id = washington.id.clone();
    let austin_id = austin.id.clone();

    let records: Vec<Record> = vec![
        florida.into(),
        texas.into(),
        washington.into(),
        miami.into(),
        austin.into(),
    ];
    for record in records {
        store.new_record(record).expect("new_record");
    }
    store.save().expect("save");
    store.reload().expect("reload");

    assert_eq!(store.count(Some(RecordKind::State)).expect("count"), 3);
    assert_eq!(store.count(Some(RecordKind::City)).expect("count"), 2);

    let state_names: Vec<String> = store
        .all(Some(RecordKind::State))
        .expect("all")
        .into_values()
        .map(|record| match record {
            Record::State(state) => state.name,
            other => panic!("state filter returned {:?}", other.kind()),
        })
        .collect();
    assert!(state_names.contains(&"Florida".to_string()));

    let found = store.get(RecordKind::State, washington_id.as_str()).expect("get");
    assert!(found.is_some());

    let city_ids: Vec<String> = store
        .all(Some(RecordKind::City))
        .expect("all")
        .into_keys()
        .map(|key| key.id.to_string())
        .collect();
    assert!(city_ids.contains(&austin_id.to_string()));
}

/// Deleting with no argument never changes any count.
fn test_delete_no_arg<E: StorageEngine>(mut store: Store<E>) {
    store.new_record(State::new("Florida")).expect("new_record");
    store.save().expect("save");
    assert_eq!(store.count(Some(RecordKind::State)).expect("count"), 1);

    store.delete(None).expect("delete");
    store.save().expect("save");
    store.reload().expect("reload");
    assert_eq!(store.count(Some(RecordKind::State)).expect("count"), 1);
}

/// Deleting a saved record removes it durably after the next save.
fn test_delete_with_arg<E: StorageEngine>(mut store: Store<E>) {
    let florida = State::new("Florida");
    let id = florida.id.clone();
    let record: Record = florida.into();
    store.new_record(record.clone()).expect("new_record");
    store.save().expect("save");
    assert_eq!(store.count(Some(RecordKind::State)).expect("count"), 1);

    store.delete(Some(&record)).expect("delete");
    store.save().expect("save");
    store.reload().expect("reload");
    assert_eq!(store.count(Some(RecordKind::State)).expect("count"), 0);
    assert!(store.get(RecordKind::State, id.as_str()).expect("get").is_none());
}

/// `all` returns the whole index, filtered maps stay pure per kind.
fn test_all<E: StorageEngine>(mut store: Store<E>) {
    assert!(store.all(None).expect("all").is_empty());

    let florida = State::new("Florida");
    let miami = City::new("Miami", florida.id.clone());
    store.new_record(florida).expect("new_record");
    store.new_record(miami).expect("new_record");
    store.save().expect("save");

    assert_eq!(store.all(None).expect("all").len(), 2);
    let states = store.all(Some(RecordKind::State)).expect("all");
    assert_eq!(states.len(), 1);
    assert!(states.keys().all(|key| key.kind == RecordKind::State));
    assert_eq!(store.all(Some(RecordKind::City)).expect("all").len(), 1);

    // count always agrees with the cardinality of all
    for kind in [None, Some(RecordKind::State), Some(RecordKind::City), Some(RecordKind::User)] {
        assert_eq!(store.count(kind).expect("count"), store.all(kind).expect("all").len());
    }
}

/// `get` distinguishes not-found from invalid input.
fn test_get<E: StorageEngine>(mut store: Store<E>) {
    // Not found on an empty store is a value, not an error.
    assert!(store.get(RecordKind::State, "123").expect("get").is_none());

    let florida = State::new("Florida");
    let id = florida.id.clone();
    store.new_record(florida).expect("new_record");
    store.save().expect("save");

    let found = store.get(RecordKind::State, id.as_str()).expect("get").expect("found");
    assert_eq!(found.id().as_str(), id.as_str());

    // Same id under another kind is not found.
    assert!(store.get(RecordKind::City, id.as_str()).expect("get").is_none());

    // A blank id is rejected before lookup.
    assert!(matches!(store.get(RecordKind::State, ""), Err(Error::InvalidArgument(_))));
}

/// `count` tracks saves across kinds.
fn test_count<E: StorageEngine>(mut store: Store<E>) {
    assert_eq!(store.count(None).expect("count"), 0);

    store.new_record(State::new("Hawaii")).expect("new_record");
    store.save().expect("save");
    assert_eq!(store.count(Some(RecordKind::State)).expect("count"), 1);

    store.new_record(State::new("Oregon")).expect("new_record");
    store.new_record(State::new("Washington DC")).expect("new_record");
    store.new_record(State::new("Georgia")).expect("new_record");
    store.save().expect("save");
    assert_eq!(store.count(Some(RecordKind::State)).expect("count"), 4);
    assert_eq!(store.count(Some(RecordKind::City)).expect("count"), 0);
}

/// A successful save empties the pending set; an empty save is a no-op.
fn test_save_clears_pending<E: StorageEngine>(mut store: Store<E>) {
    store.new_record(State::new("Nevada")).expect("new_record");
    assert_eq!(store.pending_count(), 1);

    store.save().expect("save");
    assert_eq!(store.pending_count(), 0);

    // Nothing pending: still succeeds.
    store.save().expect("empty save");
    assert_eq!(store.count(Some(RecordKind::State)).expect("count"), 1);
}

/// Reload rebuilds the index from the store, discarding buffered state.
fn test_reload_replaces_index<E: StorageEngine>(mut store: Store<E>) {
    store.new_record(State::new("Utah")).expect("new_record");
    store.save().expect("save");

    // Buffer a record but reload before saving it.
    store.new_record(State::new("Idaho")).expect("new_record");
    store.reload().expect("reload");

    assert_eq!(store.pending_count(), 0);
    assert_eq!(store.count(Some(RecordKind::State)).expect("count"), 1);

    // Reloading again must not duplicate anything.
    store.reload().expect("reload");
    assert_eq!(store.count(Some(RecordKind::State)).expect("count"), 1);
}

/// Saved records survive closing the store and opening a new one on the
/// same redb file.
#[test]
fn db_store_persists_across_instances() {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let path = dir.path().join("lodge.redb");

    let id = {
        let mut store = DbStore::open(&path).expect("open");
        let florida = State::new("Florida");
        let id = florida.id.clone();
        store.new_record(florida).expect("new_record");
        store.save().expect("save");
        store.close();
        id
    };

    let store = DbStore::open(&path).expect("reopen");
    let found = store.get(RecordKind::State, id.as_str()).expect("get").expect("found");
    assert_eq!(found.kind(), RecordKind::State);
    assert_eq!(found.id().as_str(), id.as_str());
}

/// Saved records survive in the JSON snapshot of the file-backed store.
#[test]
fn file_store_persists_across_instances() {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let path = dir.path().join("lodge.json");

    let id = {
        let mut store = MemoryStore::with_file(&path).expect("open");
        let amenity = lodgedb::Amenity::new("Wifi");
        let id = amenity.id.clone();
        store.new_record(amenity).expect("new_record");
        store.save().expect("save");
        store.close();
        id
    };

    let store = MemoryStore::with_file(&path).expect("reopen");
    assert_eq!(store.count(Some(RecordKind::Amenity)).expect("count"), 1);
    assert!(store.get(RecordKind::Amenity, id.as_str()).expect("get").is_some());
}

/// An in-memory engine whose write transactions refuse to commit while
/// the shared flag is raised. Reads and buffering behave normally, so a
/// failed commit looks exactly like a backend rejecting the batch.
struct CommitFaultEngine {
    inner: MemoryEngine,
    fail_commits: Arc<AtomicBool>,
}

struct CommitFaultTransaction {
    inner: MemoryTransaction,
    fail_commit: bool,
}

impl StorageEngine for CommitFaultEngine {
    type Transaction<'a>
        = CommitFaultTransaction
    where
        Self: 'a;

    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError> {
        Ok(CommitFaultTransaction { inner: self.inner.begin_read()?, fail_commit: false })
    }

    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError> {
        Ok(CommitFaultTransaction {
            inner: self.inner.begin_write()?,
            fail_commit: self.fail_commits.load(Ordering::SeqCst),
        })
    }
}

impl Transaction for CommitFaultTransaction {
    type Cursor<'a>
        = MemoryCursor
    where
        Self: 'a;

    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(table, key)
    }

    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.inner.put(table, key, value)
    }

    fn delete(&mut self, table: &str, key: &[u8]) -> Result<bool, StorageError> {
        self.inner.delete(table, key)
    }

    fn scan(&self, table: &str) -> Result<Self::Cursor<'_>, StorageError> {
        self.inner.scan(table)
    }

    fn commit(self) -> Result<(), StorageError> {
        if self.fail_commit {
            return Err(StorageError::Transaction("commit refused".to_string()));
        }
        self.inner.commit()
    }

    fn rollback(self) -> Result<(), StorageError> {
        self.inner.rollback()
    }

    fn is_read_only(&self) -> bool {
        self.inner.is_read_only()
    }
}

/// A failed save leaves the pending-write set and removal marks intact,
/// and a retry commits the very same batch.
#[test]
fn failed_save_keeps_both_sets_for_retry() {
    let fail_commits = Arc::new(AtomicBool::new(false));
    let engine =
        CommitFaultEngine { inner: MemoryEngine::new(), fail_commits: Arc::clone(&fail_commits) };
    let mut store = Store::with_engine(engine);
    store.reload().expect("reload");

    // One durable record to mark for removal alongside a pending write.
    let nevada = State::new("Nevada");
    let nevada_record: Record = nevada.into();
    store.new_record(nevada_record.clone()).expect("new_record");
    store.save().expect("save");

    store.delete(Some(&nevada_record)).expect("delete");
    let montana = State::new("Montana");
    let montana_id = montana.id.clone();
    store.new_record(montana).expect("new_record");
    assert_eq!(store.pending_count(), 1);

    fail_commits.store(true, Ordering::SeqCst);
    assert!(matches!(store.save(), Err(Error::Storage(_))));

    // The batch is still buffered, untouched by the failure.
    assert_eq!(store.pending_count(), 1);

    // Retrying against a healthy engine commits the same batch.
    fail_commits.store(false, Ordering::SeqCst);
    store.save().expect("retry save");
    store.reload().expect("reload");

    assert_eq!(store.pending_count(), 0);
    assert_eq!(store.count(Some(RecordKind::State)).expect("count"), 1);
    assert!(store.get(RecordKind::State, montana_id.as_str()).expect("get").is_some());
    assert!(store
        .get(RecordKind::State, nevada_record.id().as_str())
        .expect("get")
        .is_none());
}

/// Opening from a config yields a working store on every backend.
#[test]
fn config_open_selects_backend() {
    let mut store = AnyStore::open(&Config::memory()).expect("open memory");
    store.new_record(State::new("Florida")).expect("new_record");
    store.save().expect("save");
    assert_eq!(store.count(Some(RecordKind::State)).expect("count"), 1);
    store.close();
    assert!(store.is_closed());

    let dir = tempfile::tempdir().expect("failed to create tempdir");

    let redb_config = Config::redb(dir.path().join("lodge.redb"));
    let mut store = AnyStore::open(&redb_config).expect("open redb");
    store.new_record(State::new("Texas")).expect("new_record");
    store.save().expect("save");
    drop(store);

    // The snapshot written through one config is readable through another.
    let file_config = Config::file(dir.path().join("lodge.json"));
    let id = {
        let mut store = AnyStore::open(&file_config).expect("open file");
        let wifi = lodgedb::Amenity::new("Wifi");
        let id = wifi.id.clone();
        store.new_record(wifi).expect("new_record");
        store.save().expect("save");
        id
    };
    let store = AnyStore::open(&file_config).expect("reopen file");
    assert!(store.get(RecordKind::Amenity, id.as_str()).expect("get").is_some());
}

/// With creation disabled, a missing path-based store is an open error
/// instead of an empty store.
#[test]
fn config_can_refuse_to_create_missing_stores() {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let path = dir.path().join("absent.redb");

    let config = Config::redb(&path).create_if_missing(false);
    assert!(matches!(AnyStore::open(&config), Err(Error::Open(_))));
    assert!(matches!(
        AnyStore::open(&Config::file(dir.path().join("absent.json")).create_if_missing(false)),
        Err(Error::Open(_))
    ));

    // Create it once, then the strict config can open it.
    AnyStore::open(&Config::redb(&path)).expect("create").close();
    assert!(AnyStore::open(&config).is_ok());
}

/// Foreign keys round-trip unchanged through save and reload.
#[test]
fn city_state_reference_roundtrips() {
    let mut store = fresh_memory_store();

    let texas = State::new("Texas");
    let austin = City::new("Austin", texas.id.clone());
    let state_id = texas.id.clone();
    let city_id = austin.id.clone();

    store.new_record(texas).expect("new_record");
    store.new_record(austin).expect("new_record");
    store.save().expect("save");
    store.reload().expect("reload");

    let record = store.get(RecordKind::City, city_id.as_str()).expect("get").expect("found");
    let Record::City(city) = record else { panic!("wrong kind") };
    assert_eq!(city.state_id, state_id);
}
