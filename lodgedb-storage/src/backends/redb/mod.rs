//! Redb storage backend.
//!
//! This backend stores all logical tables in a single physical redb table,
//! using the key prefixing scheme from [`super::keys`].

mod engine;
mod tables;
mod transaction;

pub use engine::{RedbConfig, RedbEngine};
pub use transaction::{RedbCursor, RedbTransaction};
