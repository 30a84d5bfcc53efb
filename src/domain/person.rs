//! People (users) who access the API.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Event, EventId, PersonId};

/// Permission level of a [`Person`]. Recorded only; never enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user.
    #[default]
    User,
    /// Administrator.
    Admin,
}

impl Role {
    /// Returns the wire/storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a known [`Role`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role `{0}`, expected `user` or `admin`")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// One entry of [`Person::events`]: either a bare event id or a full
/// embedded event object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum EventRef {
    /// Reference by id only.
    Id(EventId),
    /// Denormalized copy of the event.
    Embedded(Event),
}

/// A person that accesses the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Person {
    /// Primary key. Immutable.
    pub id: PersonId,
    /// Creation time. Never changes once set.
    pub datetime_created: DateTime<Utc>,
    /// Last modification time. Bumped on every update.
    pub datetime_modified: DateTime<Utc>,
    /// Contact email.
    pub email: Option<String>,
    /// Events associated with this person, in insertion order.
    pub events: Vec<EventRef>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Permission level.
    pub role: Role,
}

/// Mutable fields of a [`Person`] applied by an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonUpdate {
    /// New email.
    pub email: Option<String>,
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// New role.
    pub role: Role,
    /// Replacement events list.
    pub events: Vec<EventRef>,
    /// Value written to `datetime_modified`.
    pub modified_at: DateTime<Utc>,
}

impl Person {
    /// Returns a copy of this person with `update` applied.
    ///
    /// `id` and `datetime_created` are carried over unchanged.
    #[must_use]
    pub fn apply(&self, update: PersonUpdate) -> Self {
        Self {
            id: self.id,
            datetime_created: self.datetime_created,
            datetime_modified: update.modified_at,
            email: update.email,
            events: update.events,
            first_name: update.first_name,
            last_name: update.last_name,
            role: update.role,
        }
    }
}
