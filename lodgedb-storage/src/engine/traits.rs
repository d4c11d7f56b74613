//! Core storage engine traits.
//!
//! This module defines the fundamental traits for storage backends:
//!
//! - [`StorageEngine`] - The main entry point for storage operations
//! - [`Transaction`] - Atomic read/write operations over logical tables
//! - [`Cursor`] - Forward iteration over the rows of a logical table
//!
//! Backends store rows under (logical table, key) pairs; how the logical
//! table namespace maps onto physical storage is backend-specific.

use super::StorageError;

/// A key-value pair returned by cursor operations.
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// Result type for cursor operations that return a key-value pair.
pub type CursorResult = Result<Option<KeyValue>, StorageError>;

/// A storage engine that provides transactional key-value operations.
///
/// Storage engines are the foundation of the persistence layer. All writes
/// in one transaction become durable together on commit, or not at all.
/// Implementations must be thread-safe (`Send + Sync`); the exclusive-use
/// discipline for a single logical session is the caller's responsibility.
pub trait StorageEngine: Send + Sync {
    /// The transaction type for this engine.
    type Transaction<'a>: Transaction
    where
        Self: 'a;

    /// Begin a read-only transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the transaction cannot be started.
    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError>;

    /// Begin a read-write transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the transaction cannot be started.
    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError>;
}

/// A transaction that provides key-value operations over logical tables.
///
/// Dropping a write transaction without committing rolls back its changes.
pub trait Transaction {
    /// The cursor type for iteration.
    type Cursor<'a>: Cursor
    where
        Self: 'a;

    /// Get a value by key from a table.
    ///
    /// A missing table behaves like an empty one: the result is `Ok(None)`.
    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Put a key-value pair into a table, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] on a read-only transaction.
    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Delete a key from a table. Returns whether the key existed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] on a read-only transaction.
    fn delete(&mut self, table: &str, key: &[u8]) -> Result<bool, StorageError>;

    /// Create a cursor over every row of a table, in key order.
    fn scan(&self, table: &str) -> Result<Self::Cursor<'_>, StorageError>;

    /// Commit the transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the commit fails; no buffered
    /// write reaches the store in that case.
    fn commit(self) -> Result<(), StorageError>;

    /// Roll back the transaction (implicit on drop for uncommitted transactions).
    fn rollback(self) -> Result<(), StorageError>;

    /// Whether this transaction is read-only.
    fn is_read_only(&self) -> bool;
}

/// A cursor for iterating over key-value pairs.
pub trait Cursor {
    /// Move to the next key-value pair, or `None` past the end.
    fn next(&mut self) -> CursorResult;
}
