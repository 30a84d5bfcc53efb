//! Tracking service: person and event use-cases over a [`Repository`].

use chrono::{DateTime, SubsecRound, Utc};

use crate::domain::{
    Event, EventId, EventType, Person, PersonId, PersonUpdate, Role, timestamp_now,
};
use crate::error::ApiError;
use crate::persistence::Repository;

/// Entity name used in messages about persons.
pub const PERSON: &str = "Person";
/// Entity name used in messages about events.
pub const EVENT: &str = "Event";

/// Input for [`TrackingService::create_person`].
#[derive(Debug, Clone, Default)]
pub struct NewPerson {
    /// Caller-chosen id; generated when absent.
    pub id: Option<PersonId>,
    /// Caller-chosen creation time; now when absent.
    pub datetime_created: Option<DateTime<Utc>>,
    /// Email.
    pub email: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Role.
    pub role: Role,
}

/// Input for [`TrackingService::create_event`].
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// Caller-chosen id; generated when absent.
    pub id: Option<EventId>,
    /// Caller-chosen creation time; now when absent.
    pub datetime_created: Option<DateTime<Utc>>,
    /// Event type.
    pub event_type: EventType,
    /// Owning person. Must exist.
    pub person_id: PersonId,
}

/// Orchestration layer for all person and event operations.
///
/// Every mutation follows the same pattern: validate ids that do not need
/// storage → check referenced records → write → read back the stored
/// value. Nothing here is transactional; the existence checks can race
/// with concurrent deletes, in which case the store's own constraints
/// decide.
#[derive(Debug)]
pub struct TrackingService<R> {
    repo: R,
}

impl<R: Repository> TrackingService<R> {
    /// Creates a new `TrackingService`.
    #[must_use]
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns a reference to the inner repository.
    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repo
    }

    // ── Persons ─────────────────────────────────────────────────────────

    /// Lists every person. An empty store yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    pub async fn list_persons(&self) -> Result<Vec<Person>, ApiError> {
        tracing::debug!("getting a list of all persons");
        Ok(self.repo.list_persons().await?)
    }

    /// Fetches one person.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no such person exists.
    pub async fn get_person(&self, id: PersonId) -> Result<Person, ApiError> {
        tracing::debug!(%id, "getting person by id");
        self.repo
            .find_person(id)
            .await?
            .ok_or_else(|| ApiError::not_found(PERSON, id))
    }

    /// Creates a person with an empty events list.
    ///
    /// `datetime_modified` is set equal to `datetime_created`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotCreated`] if the store rejects the insert,
    /// or [`ApiError::NotFound`] if the person cannot be read back.
    pub async fn create_person(&self, new: NewPerson) -> Result<Person, ApiError> {
        let id = new.id.unwrap_or_default();
        let created = new
            .datetime_created
            .map_or_else(timestamp_now, |t| t.trunc_subsecs(6));
        let person = Person {
            id,
            datetime_created: created,
            datetime_modified: created,
            email: new.email,
            events: Vec::new(),
            first_name: new.first_name,
            last_name: new.last_name,
            role: new.role,
        };

        tracing::debug!(%id, "creating new person");
        self.repo
            .insert_person(&person)
            .await
            .map_err(|source| ApiError::NotCreated {
                entity: PERSON,
                source,
            })?;

        let created = self.get_person(id).await?;
        tracing::info!(%id, role = %created.role, "person created");
        Ok(created)
    }

    /// Replaces the mutable fields of a person and bumps
    /// `datetime_modified`. Whatever `update.modified_at` holds is replaced
    /// with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::IdMismatch`] (without touching storage) if
    /// `route_id` differs from `body_id`, or [`ApiError::NotFound`] if no
    /// such person exists.
    pub async fn update_person(
        &self,
        route_id: PersonId,
        body_id: PersonId,
        mut update: PersonUpdate,
    ) -> Result<Person, ApiError> {
        ensure_ids_match(route_id, body_id)?;

        tracing::debug!(id = %route_id, "editing person");
        update.modified_at = timestamp_now();
        self.repo
            .update_person(route_id, &update)
            .await?
            .ok_or_else(|| ApiError::not_found(PERSON, route_id))
    }

    /// Deletes a person and, by cascade, their events.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::IdMismatch`] (without touching storage) if
    /// `route_id` differs from `body_id`, or [`ApiError::NotFound`] if no
    /// such person exists.
    pub async fn delete_person(
        &self,
        route_id: PersonId,
        body_id: PersonId,
    ) -> Result<(), ApiError> {
        ensure_ids_match(route_id, body_id)?;

        self.get_person(route_id).await?;
        tracing::debug!(id = %route_id, "deleting person");
        if !self.repo.delete_person(route_id).await? {
            return Err(ApiError::not_found(PERSON, route_id));
        }
        tracing::info!(id = %route_id, "person deleted");
        Ok(())
    }

    // ── Events ──────────────────────────────────────────────────────────

    /// Lists events, optionally only those of one type.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    pub async fn list_events(
        &self,
        event_type: Option<EventType>,
    ) -> Result<Vec<Event>, ApiError> {
        tracing::debug!(event_type = ?event_type, "getting a list of events");
        Ok(self.repo.list_events(event_type).await?)
    }

    /// Fetches one event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no such event exists.
    pub async fn get_event(&self, id: EventId) -> Result<Event, ApiError> {
        tracing::debug!(%id, "getting event by id");
        self.repo
            .find_event(id)
            .await?
            .ok_or_else(|| ApiError::not_found(EVENT, id))
    }

    /// Records a new event for an existing person.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] naming the person if `person_id` does
    /// not exist (nothing is written), or [`ApiError::NotCreated`] if the
    /// store rejects the insert.
    pub async fn create_event(&self, new: NewEvent) -> Result<Event, ApiError> {
        self.ensure_person_exists(new.person_id).await?;

        let event = Event {
            id: new.id.unwrap_or_default(),
            datetime_created: new
                .datetime_created
                .map_or_else(timestamp_now, |t| t.trunc_subsecs(6)),
            event_type: new.event_type,
            person_id: new.person_id,
        };

        tracing::debug!(id = %event.id, person_id = %event.person_id, "creating new event");
        self.repo
            .insert_event(&event)
            .await
            .map_err(|source| ApiError::NotCreated {
                entity: EVENT,
                source,
            })?;

        let created = self.get_event(event.id).await?;
        tracing::info!(
            id = %created.id,
            person_id = %created.person_id,
            event_type = %created.event_type,
            "event created"
        );
        Ok(created)
    }

    /// Changes the type and owner of an event. `datetime_created` is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::IdMismatch`] (without touching storage) if the
    /// ids differ, and [`ApiError::NotFound`] if either the new owner or
    /// the event does not exist.
    pub async fn update_event(
        &self,
        route_id: EventId,
        body_id: EventId,
        event_type: EventType,
        person_id: PersonId,
    ) -> Result<Event, ApiError> {
        ensure_ids_match(route_id, body_id)?;
        self.ensure_person_exists(person_id).await?;

        tracing::debug!(id = %route_id, "editing event");
        self.repo
            .update_event(route_id, event_type, person_id)
            .await?
            .ok_or_else(|| ApiError::not_found(EVENT, route_id))
    }

    /// Deletes an event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::IdMismatch`] (without touching storage) if the
    /// ids differ, or [`ApiError::NotFound`] if no such event exists.
    pub async fn delete_event(&self, route_id: EventId, body_id: EventId) -> Result<(), ApiError> {
        ensure_ids_match(route_id, body_id)?;

        self.get_event(route_id).await?;
        tracing::debug!(id = %route_id, "deleting event");
        if !self.repo.delete_event(route_id).await? {
            return Err(ApiError::not_found(EVENT, route_id));
        }
        Ok(())
    }

    async fn ensure_person_exists(&self, person_id: PersonId) -> Result<(), ApiError> {
        tracing::debug!(%person_id, "confirming person exists");
        match self.repo.find_person(person_id).await? {
            Some(_) => Ok(()),
            None => Err(ApiError::not_found(PERSON, person_id)),
        }
    }
}

fn ensure_ids_match<I>(route_id: I, body_id: I) -> Result<(), ApiError>
where
    I: PartialEq + std::fmt::Display,
{
    if route_id == body_id {
        Ok(())
    } else {
        Err(ApiError::id_mismatch(route_id, body_id))
    }
}
