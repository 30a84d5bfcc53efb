//! Person request bodies.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{EventRef, PersonId, PersonUpdate, Role, timestamp_now};
use crate::service::NewPerson;

/// Request body for `POST /persons`.
///
/// `id` and `datetime_created` are generated when omitted. An `events`
/// field, if sent, is ignored: new persons always start with none.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePersonRequest {
    /// Client-chosen id.
    pub id: Option<PersonId>,
    /// Client-chosen creation time.
    pub datetime_created: Option<DateTime<Utc>>,
    /// Contact address.
    pub email: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Defaults to `user`.
    #[serde(default)]
    pub role: Role,
}

impl From<CreatePersonRequest> for NewPerson {
    fn from(req: CreatePersonRequest) -> Self {
        Self {
            id: req.id,
            datetime_created: req.datetime_created,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            role: req.role,
        }
    }
}

/// Request body for `PUT /persons/{id}`.
///
/// Replaces every mutable field. Omitted optional fields are cleared.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePersonRequest {
    /// Must equal the id in the route.
    pub id: PersonId,
    /// Contact address.
    pub email: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Defaults to `user`.
    #[serde(default)]
    pub role: Role,
    /// Event ids or embedded events, stored as given.
    #[serde(default)]
    pub events: Vec<EventRef>,
}

impl UpdatePersonRequest {
    /// Splits the body into its id and the field update.
    #[must_use]
    pub fn into_parts(self) -> (PersonId, PersonUpdate) {
        let update = PersonUpdate {
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            role: self.role,
            events: self.events,
            modified_at: timestamp_now(),
        };
        (self.id, update)
    }
}
