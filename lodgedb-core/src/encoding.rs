//! Row serialization.
//!
//! Records are stored as JSON documents keyed by their raw id bytes inside
//! a per-kind logical table. The kind tag is embedded in the document
//! (`"__kind"`), so a row decodes back to a [`Record`] without consulting
//! the table it came from; [`decode_record`] still takes the expected kind
//! and rejects rows filed under the wrong table.

use crate::error::CoreError;
use crate::types::{Record, RecordKind};

/// Encode a record as a row payload.
///
/// # Errors
///
/// Returns [`CoreError::Encoding`] if serialization fails.
pub fn encode_record(record: &Record) -> Result<Vec<u8>, CoreError> {
    serde_json::to_vec(record).map_err(|e| CoreError::Encoding(e.to_string()))
}

/// Decode a row payload back into a record of the expected kind.
///
/// # Errors
///
/// Returns [`CoreError::Encoding`] if the payload is not a valid row, and
/// [`CoreError::Validation`] if the row's kind does not match `expected`.
pub fn decode_record(expected: RecordKind, bytes: &[u8]) -> Result<Record, CoreError> {
    let record: Record =
        serde_json::from_slice(bytes).map_err(|e| CoreError::Encoding(e.to_string()))?;
    if record.kind() != expected {
        return Err(CoreError::Validation(format!(
            "row in table '{}' decoded as kind {}",
            expected.table(),
            record.kind()
        )));
    }
    Ok(record)
}
