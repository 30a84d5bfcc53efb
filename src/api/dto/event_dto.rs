//! Event request bodies and query parameters.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{EventId, EventType, PersonId};
use crate::error::ApiError;
use crate::service::NewEvent;

/// Request body for `POST /events`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    /// Client-chosen id, generated when omitted.
    pub id: Option<EventId>,
    /// Client-chosen creation time, `now` when omitted.
    pub datetime_created: Option<DateTime<Utc>>,
    /// What happened.
    pub event_type: EventType,
    /// Who it happened to. Must exist.
    pub person_id: PersonId,
}

impl From<CreateEventRequest> for NewEvent {
    fn from(req: CreateEventRequest) -> Self {
        Self {
            id: req.id,
            datetime_created: req.datetime_created,
            event_type: req.event_type,
            person_id: req.person_id,
        }
    }
}

/// Request body for `PUT /events/{id}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    /// Must equal the id in the route.
    pub id: EventId,
    /// New event type.
    pub event_type: EventType,
    /// New owner. Must exist.
    pub person_id: PersonId,
}

/// Query string of `GET /events`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventListParams {
    /// Only return events of this type (`click`, `signup`,
    /// `submitted_feedback`).
    pub keyword: Option<String>,
}

impl EventListParams {
    /// Parses the `keyword` filter. A missing or blank keyword means no
    /// filter.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] for an unknown event type.
    pub fn event_type(&self) -> Result<Option<EventType>, ApiError> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| {
                k.parse::<EventType>()
                    .map_err(|e| ApiError::InvalidRequest(e.to_string()))
            })
            .transpose()
    }
}
