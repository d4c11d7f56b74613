//! The closed set of record kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The kind (class tag) of a record.
///
/// `LodgeDB` stores a fixed set of domain record kinds; each kind maps at
/// compile time to its logical table name. The kind of a record never
/// changes after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordKind {
    /// A state (top-level geography).
    State,
    /// A city, belonging to a state.
    City,
    /// A registered user.
    User,
    /// A rentable place, belonging to a city and a user.
    Place,
    /// A review of a place, written by a user.
    Review,
    /// An amenity a place can offer.
    Amenity,
}

impl RecordKind {
    /// Every record kind, in table-scan order.
    pub const ALL: [Self; 6] =
        [Self::State, Self::City, Self::User, Self::Place, Self::Review, Self::Amenity];

    /// The logical table name rows of this kind are stored under.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::State => "states",
            Self::City => "cities",
            Self::User => "users",
            Self::Place => "places",
            Self::Review => "reviews",
            Self::Amenity => "amenities",
        }
    }

    /// The kind name as used in composite keys (`State.1234`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::State => "State",
            Self::City => "City",
            Self::User => "User",
            Self::Place => "Place",
            Self::Review => "Review",
            Self::Amenity => "Amenity",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "State" => Ok(Self::State),
            "City" => Ok(Self::City),
            "User" => Ok(Self::User),
            "Place" => Ok(Self::Place),
            "Review" => Ok(Self::Review),
            "Amenity" => Ok(Self::Amenity),
            other => Err(CoreError::Validation(format!("unknown record kind: {other}"))),
        }
    }
}
