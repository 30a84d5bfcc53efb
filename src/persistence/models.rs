//! Database row models for persons and events.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::PersistenceError;
use crate::domain::{Event, EventId, EventRef, Person, PersonId};

/// A row of the `person` table.
#[derive(Debug, Clone, FromRow)]
pub struct PersonRow {
    /// Primary key.
    pub id: Uuid,
    /// Creation timestamp.
    pub datetime_created: DateTime<Utc>,
    /// Last modification timestamp.
    pub datetime_modified: DateTime<Utc>,
    /// Nullable email.
    pub email: Option<String>,
    /// JSON-encoded array of event references.
    pub events: String,
    /// Nullable first name.
    pub first_name: Option<String>,
    /// Nullable last name.
    pub last_name: Option<String>,
    /// Role as text.
    pub role: String,
}

/// A row of the `event` table.
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    /// Primary key.
    pub id: Uuid,
    /// Creation timestamp.
    pub datetime_created: DateTime<Utc>,
    /// Event type as text.
    pub event_type: String,
    /// Owning person.
    pub person_id: Uuid,
}

/// Encodes a person's event list into its text column representation.
///
/// # Errors
///
/// Returns [`PersistenceError::Encoding`] if serialization fails.
pub fn encode_events(events: &[EventRef]) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(events)?)
}

/// Decodes the `events` text column. An empty column reads as no events.
///
/// # Errors
///
/// Returns [`PersistenceError::Corrupt`] if the column is not a JSON array
/// of event references.
pub fn decode_events(raw: &str) -> Result<Vec<EventRef>, PersistenceError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
        .map_err(|e| PersistenceError::Corrupt(format!("person.events is not a valid array: {e}")))
}

impl TryFrom<PersonRow> for Person {
    type Error = PersistenceError;

    fn try_from(row: PersonRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse()
            .map_err(|e| PersistenceError::Corrupt(format!("person {}: {e}", row.id)))?;
        Ok(Self {
            id: PersonId::from_uuid(row.id),
            datetime_created: row.datetime_created,
            datetime_modified: row.datetime_modified,
            email: row.email,
            events: decode_events(&row.events)?,
            first_name: row.first_name,
            last_name: row.last_name,
            role,
        })
    }
}

impl TryFrom<EventRow> for Event {
    type Error = PersistenceError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let event_type = row
            .event_type
            .parse()
            .map_err(|e| PersistenceError::Corrupt(format!("event {}: {e}", row.id)))?;
        Ok(Self {
            id: EventId::from_uuid(row.id),
            datetime_created: row.datetime_created,
            event_type,
            person_id: PersonId::from_uuid(row.person_id),
        })
    }
}
