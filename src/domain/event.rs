//! Tracked client-side events.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{EventId, PersonId};

/// The kind of interaction an [`Event`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A click in the client.
    Click,
    /// The person signed up.
    Signup,
    /// The person submitted feedback. Mostly used to attach events by hand.
    SubmittedFeedback,
}

impl EventType {
    /// Every supported event type, in declaration order.
    pub const ALL: [Self; 3] = [Self::Click, Self::Signup, Self::SubmittedFeedback];

    /// Returns the wire/storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Signup => "signup",
            Self::SubmittedFeedback => "submitted_feedback",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known [`EventType`] values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event type `{0}`, expected one of: click, signup, submitted_feedback")]
pub struct UnknownEventType(pub String);

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}

/// An event associated with a [`super::Person`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    /// Primary key.
    pub id: EventId,
    /// When the event occurred.
    pub datetime_created: DateTime<Utc>,
    /// What kind of event this is.
    pub event_type: EventType,
    /// The person this event belongs to.
    pub person_id: PersonId,
}
