//! `LodgeDB` Core
//!
//! This crate provides the domain model shared by every `LodgeDB` storage
//! engine: the six record kinds of the property-rental domain, their typed
//! record structs, composite keys, and the row encoding used on disk.
//!
//! # Modules
//!
//! - [`types`] - Core data types (records, kinds, ids, composite keys)
//! - [`encoding`] - Row serialization
//! - [`error`] - Error types

pub mod encoding;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::CoreError;
pub use types::{
    Amenity, City, Place, Record, RecordId, RecordKey, RecordKind, Review, State, User,
};
