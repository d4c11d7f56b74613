//! Storage backend implementations.
//!
//! This module contains concrete implementations of the storage engine traits.
//!
//! # Available Backends
//!
//! - [`redb`] - Pure-Rust embedded database with ACID transactions
//! - [`memory`] - In-memory store with optional JSON-file snapshots

pub mod keys;
pub mod memory;
pub mod redb;

pub use self::memory::{MemoryCursor, MemoryEngine, MemoryTransaction};
pub use self::redb::{RedbConfig, RedbCursor, RedbEngine, RedbTransaction};
