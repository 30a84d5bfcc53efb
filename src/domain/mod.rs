//! Domain layer: entities and identifiers.
//!
//! Plain data types shared by the API, service and persistence layers.
//! Nothing in here performs I/O.

pub mod event;
pub mod ids;
pub mod person;

use chrono::{DateTime, SubsecRound, Utc};

pub use event::{Event, EventType, UnknownEventType};
pub use ids::{EventId, PersonId};
pub use person::{EventRef, Person, PersonUpdate, Role, UnknownRole};

/// Current UTC time truncated to microseconds, the precision PostgreSQL
/// keeps for `TIMESTAMPTZ`.
#[must_use]
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
