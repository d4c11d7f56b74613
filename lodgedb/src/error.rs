//! Error types for the main database crate.

use thiserror::Error;

/// Errors that can occur when using `LodgeDB`.
#[derive(Debug, Error)]
pub enum Error {
    /// A storage error occurred.
    #[error("storage error: {0}")]
    Storage(#[from] lodgedb_storage::StorageError),

    /// A row could not be encoded or decoded.
    #[error("record error: {0}")]
    Record(#[from] lodgedb_core::CoreError),

    /// A malformed or missing argument was rejected before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The store has been closed; construct a new one.
    #[error("store is closed")]
    Closed,

    /// The store could not be opened.
    #[error("failed to open store: {0}")]
    Open(String),
}

/// Result type for `LodgeDB` operations.
pub type Result<T> = std::result::Result<T, Error>;
