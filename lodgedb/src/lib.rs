//! `LodgeDB`
//!
//! An embedded persistence layer for a property-rental domain model:
//! states, cities, users, places, reviews, and amenities.
//!
//! The entry point is [`Store`], a CRUD façade over a pluggable storage
//! engine. Two backends ship with the workspace: a durable redb store
//! ([`DbStore`]) and an in-memory store with optional JSON-file snapshots
//! ([`MemoryStore`]). The caller picks one and injects it; there is no
//! process-wide singleton.
//!
//! # Example
//!
//! ```ignore
//! use lodgedb::{City, MemoryStore, RecordKind, State};
//!
//! let mut store = MemoryStore::in_memory()?;
//!
//! let florida = State::new("Florida");
//! let miami = City::new("Miami", florida.id.clone());
//! store.new_record(florida)?;
//! store.new_record(miami)?;
//! store.save()?;
//!
//! assert_eq!(store.count(Some(RecordKind::State))?, 1);
//! assert_eq!(store.count(Some(RecordKind::City))?, 1);
//! ```

// Re-export core types
pub use lodgedb_core::{
    Amenity, City, Place, Record, RecordId, RecordKey, RecordKind, Review, State, User,
};

// Re-export storage types
pub use lodgedb_storage::{StorageEngine, Transaction};

pub mod config;
pub mod error;
pub mod store;

pub use config::{Backend, Config};
pub use error::{Error, Result};
pub use store::{AnyStore, DbStore, MemoryStore, Store};
