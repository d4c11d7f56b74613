//! Redb table definitions.
//!
//! Redb requires static table names, so all logical tables share one
//! physical table and are distinguished by key prefix (see
//! [`crate::backends::keys`]).

use redb::TableDefinition;

/// The physical table that stores all key-value pairs.
/// Logical table names are prefixed to keys.
pub const DATA_TABLE: TableDefinition<'static, &[u8], &[u8]> = TableDefinition::new("lodge_data");
