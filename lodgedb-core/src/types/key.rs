//! Composite keys identifying record instances.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{RecordId, RecordKind};

/// A composite key uniquely identifying a record instance.
///
/// The (kind, id) pair is the addressing unit of the persistence layer:
/// the pending-write set and the addressable index are both keyed by it.
/// Displayed as `Kind.id`, e.g. `State.7f3c…`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    /// The record kind.
    pub kind: RecordKind,
    /// The record id.
    pub id: RecordId,
}

impl RecordKey {
    /// Create a new composite key.
    #[must_use]
    pub fn new(kind: RecordKind, id: impl Into<RecordId>) -> Self {
        Self { kind, id: id.into() }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.id)
    }
}
