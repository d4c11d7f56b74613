//! Redb transaction implementation.
//!
//! This module provides the [`RedbTransaction`] type which implements the
//! `Transaction` trait for both read-only and read-write transactions, and
//! the [`RedbCursor`] used for table scans. Scans materialize the rows of
//! one logical table when the cursor is created; table sizes in this domain
//! are small, so a snapshot cursor is simpler than batched streaming.

use std::collections::VecDeque;

use redb::{ReadTransaction, ReadableTable, WriteTransaction};

use crate::backends::keys::{decode_key, encode_key, table_end_key, table_start_key};
use crate::engine::{Cursor, CursorResult, KeyValue, StorageError, Transaction};

use super::tables::DATA_TABLE;

/// A transaction for the redb storage engine.
///
/// This type wraps both read-only and read-write redb transactions,
/// providing a unified interface through the `Transaction` trait.
///
/// Note: We allow the `large_enum_variant` lint here because boxing the
/// `WriteTransaction` would add indirection overhead for every operation,
/// and transactions are typically short-lived.
#[allow(clippy::large_enum_variant)]
pub enum RedbTransaction {
    /// A read-only transaction.
    Read(ReadTransaction),
    /// A read-write transaction.
    Write(WriteTransaction),
}

impl RedbTransaction {
    /// Create a new read-only transaction.
    pub const fn new_read(tx: ReadTransaction) -> Self {
        Self::Read(tx)
    }

    /// Create a new read-write transaction.
    pub const fn new_write(tx: WriteTransaction) -> Self {
        Self::Write(tx)
    }

    /// Collect every row of a logical table, in key order.
    fn fetch_table(&self, table: &str) -> Result<Vec<KeyValue>, StorageError> {
        let start = table_start_key(table);
        let end = table_end_key(table);

        macro_rules! collect_range {
            ($tx:expr) => {
                match $tx.open_table(DATA_TABLE) {
                    Ok(t) => {
                        let range = t
                            .range(start.as_slice()..end.as_slice())
                            .map_err(|e| StorageError::Internal(e.to_string()))?;

                        let mut entries = Vec::new();
                        for result in range {
                            let (k, v) =
                                result.map_err(|e| StorageError::Internal(e.to_string()))?;
                            if let Some((_, original_key)) = decode_key(k.value()) {
                                entries.push((original_key.to_vec(), v.value().to_vec()));
                            }
                        }
                        Ok(entries)
                    }
                    Err(redb::TableError::TableDoesNotExist(_)) => {
                        // No data table means no data, which is not an error
                        Ok(Vec::new())
                    }
                    Err(e) => Err(StorageError::Internal(e.to_string())),
                }
            };
        }

        match self {
            Self::Read(tx) => collect_range!(tx),
            Self::Write(tx) => collect_range!(tx),
        }
    }
}

impl Transaction for RedbTransaction {
    type Cursor<'a>
        = RedbCursor
    where
        Self: 'a;

    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let encoded_key = encode_key(table, key);

        macro_rules! get_from {
            ($tx:expr) => {
                match $tx.open_table(DATA_TABLE) {
                    Ok(t) => match t.get(encoded_key.as_slice()) {
                        Ok(Some(value)) => Ok(Some(value.value().to_vec())),
                        Ok(None) => Ok(None),
                        Err(e) => Err(StorageError::Internal(e.to_string())),
                    },
                    Err(redb::TableError::TableDoesNotExist(_)) => {
                        // No data table means no data, which is not an error
                        Ok(None)
                    }
                    Err(e) => Err(StorageError::Internal(e.to_string())),
                }
            };
        }

        match self {
            Self::Read(tx) => get_from!(tx),
            Self::Write(tx) => get_from!(tx),
        }
    }

    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let encoded_key = encode_key(table, key);
                let mut t =
                    tx.open_table(DATA_TABLE).map_err(|e| StorageError::Internal(e.to_string()))?;
                t.insert(encoded_key.as_slice(), value)
                    .map_err(|e| StorageError::Internal(e.to_string()))?;
                Ok(())
            }
        }
    }

    fn delete(&mut self, table: &str, key: &[u8]) -> Result<bool, StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let encoded_key = encode_key(table, key);
                match tx.open_table(DATA_TABLE) {
                    Ok(mut t) => match t.remove(encoded_key.as_slice()) {
                        Ok(Some(_)) => Ok(true),
                        Ok(None) => Ok(false),
                        Err(e) => Err(StorageError::Internal(e.to_string())),
                    },
                    Err(redb::TableError::TableDoesNotExist(_)) => {
                        // Table doesn't exist, so key definitely doesn't exist
                        Ok(false)
                    }
                    Err(e) => Err(StorageError::Internal(e.to_string())),
                }
            }
        }
    }

    fn scan(&self, table: &str) -> Result<Self::Cursor<'_>, StorageError> {
        let entries = self.fetch_table(table)?;
        Ok(RedbCursor { entries: entries.into() })
    }

    fn commit(self) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => {
                // Read transactions don't need explicit commit
                Ok(())
            }
            Self::Write(tx) => tx.commit().map_err(|e| StorageError::Transaction(e.to_string())),
        }
    }

    fn rollback(self) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => {
                // Read transactions just get dropped
                Ok(())
            }
            Self::Write(tx) => {
                // Ignore abort result - we're rolling back anyway
                drop(tx.abort());
                Ok(())
            }
        }
    }

    fn is_read_only(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}

/// A cursor over the rows of one logical table.
pub struct RedbCursor {
    /// Remaining rows, in key order.
    entries: VecDeque<KeyValue>,
}

impl Cursor for RedbCursor {
    fn next(&mut self) -> CursorResult {
        Ok(self.entries.pop_front())
    }
}
