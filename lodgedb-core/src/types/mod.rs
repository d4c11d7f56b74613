//! Core data types for `LodgeDB`.
//!
//! This module defines the record kinds of the property-rental domain and
//! the typed record structs stored by the persistence layer.

mod id;
mod key;
mod kind;
mod record;

pub use id::RecordId;
pub use key::RecordKey;
pub use kind::RecordKind;
pub use record::{Amenity, City, Place, Record, Review, State, User};
