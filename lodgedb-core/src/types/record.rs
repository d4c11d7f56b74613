//! Typed records of the property-rental domain.
//!
//! Every record carries a unique [`RecordId`], creation/update timestamps,
//! and its kind-specific fields. Foreign-key fields (`City::state_id`,
//! `Place::city_id`, ...) are plain ids; referential integrity is a caller
//! responsibility, the storage layer does not enforce it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RecordId, RecordKey, RecordKind};

/// A state (top-level geography).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Unique identifier, assigned at construction.
    pub id: RecordId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
    /// State name.
    pub name: String,
}

impl State {
    /// Create a new state with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self { id: RecordId::generate(), created_at: now, updated_at: now, name: name.into() }
    }
}

/// A city, belonging to a state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Unique identifier, assigned at construction.
    pub id: RecordId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
    /// City name.
    pub name: String,
    /// Id of the state this city belongs to.
    pub state_id: RecordId,
}

impl City {
    /// Create a new city with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>, state_id: impl Into<RecordId>) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            created_at: now,
            updated_at: now,
            name: name.into(),
            state_id: state_id.into(),
        }
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, assigned at construction.
    pub id: RecordId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// First name, if known.
    pub first_name: Option<String>,
    /// Last name, if known.
    pub last_name: Option<String>,
}

impl User {
    /// Create a new user with a fresh id.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            created_at: now,
            updated_at: now,
            email: email.into(),
            password: password.into(),
            first_name: None,
            last_name: None,
        }
    }

    /// Set the first name.
    #[must_use]
    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    /// Set the last name.
    #[must_use]
    pub fn with_last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }
}

/// A rentable place, belonging to a city and owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Unique identifier, assigned at construction.
    pub id: RecordId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Id of the city this place is in.
    pub city_id: RecordId,
    /// Id of the owning user.
    pub user_id: RecordId,
    /// Place name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Number of rooms.
    pub number_rooms: i32,
    /// Number of bathrooms.
    pub number_bathrooms: i32,
    /// Maximum number of guests.
    pub max_guest: i32,
    /// Nightly price.
    pub price_by_night: i32,
    /// Latitude, if geolocated.
    pub latitude: Option<f64>,
    /// Longitude, if geolocated.
    pub longitude: Option<f64>,
}

impl Place {
    /// Create a new place with a fresh id.
    #[must_use]
    pub fn new(
        city_id: impl Into<RecordId>,
        user_id: impl Into<RecordId>,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            created_at: now,
            updated_at: now,
            city_id: city_id.into(),
            user_id: user_id.into(),
            name: name.into(),
            description: None,
            number_rooms: 0,
            number_bathrooms: 0,
            max_guest: 0,
            price_by_night: 0,
            latitude: None,
            longitude: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the room counts and guest capacity.
    #[must_use]
    pub const fn with_capacity(mut self, rooms: i32, bathrooms: i32, max_guest: i32) -> Self {
        self.number_rooms = rooms;
        self.number_bathrooms = bathrooms;
        self.max_guest = max_guest;
        self
    }

    /// Set the nightly price.
    #[must_use]
    pub const fn with_price(mut self, price_by_night: i32) -> Self {
        self.price_by_night = price_by_night;
        self
    }

    /// Set the coordinates.
    #[must_use]
    pub const fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

/// A review of a place, written by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Unique identifier, assigned at construction.
    pub id: RecordId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Id of the reviewed place.
    pub place_id: RecordId,
    /// Id of the reviewing user.
    pub user_id: RecordId,
    /// Review text.
    pub text: String,
}

impl Review {
    /// Create a new review with a fresh id.
    #[must_use]
    pub fn new(
        place_id: impl Into<RecordId>,
        user_id: impl Into<RecordId>,
        text: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            created_at: now,
            updated_at: now,
            place_id: place_id.into(),
            user_id: user_id.into(),
            text: text.into(),
        }
    }
}

/// An amenity a place can offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    /// Unique identifier, assigned at construction.
    pub id: RecordId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Amenity name.
    pub name: String,
}

impl Amenity {
    /// Create a new amenity with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self { id: RecordId::generate(), created_at: now, updated_at: now, name: name.into() }
    }
}

/// A record of any kind.
///
/// This enum is the unit the storage layer traffics in: it pairs each typed
/// record with its [`RecordKind`] tag, so filtering and table routing are
/// resolved at compile time rather than through runtime reflection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__kind")]
pub enum Record {
    /// A state record.
    State(State),
    /// A city record.
    City(City),
    /// A user record.
    User(User),
    /// A place record.
    Place(Place),
    /// A review record.
    Review(Review),
    /// An amenity record.
    Amenity(Amenity),
}

impl Record {
    /// The record's unique id.
    #[must_use]
    pub fn id(&self) -> &RecordId {
        match self {
            Self::State(r) => &r.id,
            Self::City(r) => &r.id,
            Self::User(r) => &r.id,
            Self::Place(r) => &r.id,
            Self::Review(r) => &r.id,
            Self::Amenity(r) => &r.id,
        }
    }

    /// The record's kind tag.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::State(_) => RecordKind::State,
            Self::City(_) => RecordKind::City,
            Self::User(_) => RecordKind::User,
            Self::Place(_) => RecordKind::Place,
            Self::Review(_) => RecordKind::Review,
            Self::Amenity(_) => RecordKind::Amenity,
        }
    }

    /// The composite key identifying this record.
    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey { kind: self.kind(), id: self.id().clone() }
    }

    /// The creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::State(r) => r.created_at,
            Self::City(r) => r.created_at,
            Self::User(r) => r.created_at,
            Self::Place(r) => r.created_at,
            Self::Review(r) => r.created_at,
            Self::Amenity(r) => r.created_at,
        }
    }

    /// The last-update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        match self {
            Self::State(r) => r.updated_at,
            Self::City(r) => r.updated_at,
            Self::User(r) => r.updated_at,
            Self::Place(r) => r.updated_at,
            Self::Review(r) => r.updated_at,
            Self::Amenity(r) => r.updated_at,
        }
    }

    /// Bump the last-update timestamp to now.
    pub fn touch(&mut self) {
        let now = Utc::now();
        match self {
            Self::State(r) => r.updated_at = now,
            Self::City(r) => r.updated_at = now,
            Self::User(r) => r.updated_at = now,
            Self::Place(r) => r.updated_at = now,
            Self::Review(r) => r.updated_at = now,
            Self::Amenity(r) => r.updated_at = now,
        }
    }
}

impl From<State> for Record {
    fn from(r: State) -> Self {
        Self::State(r)
    }
}

impl From<City> for Record {
    fn from(r: City) -> Self {
        Self::City(r)
    }
}

impl From<User> for Record {
    fn from(r: User) -> Self {
        Self::User(r)
    }
}

impl From<Place> for Record {
    fn from(r: Place) -> Self {
        Self::Place(r)
    }
}

impl From<Review> for Record {
    fn from(r: Review) -> Self {
        Self::Review(r)
    }
}

impl From<Amenity> for Record {
    fn from(r: Amenity) -> Self {
        Self::Amenity(r)
    }
}
