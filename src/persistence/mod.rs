//! Persistence layer: repository traits and their backends.
//!
//! [`PersonRepository`] and [`EventRepository`] are the storage seam the
//! service layer is written against. Two backends implement them:
//! [`PostgresPersistence`] over `sqlx::PgPool`, and
//! [`InMemoryPersistence`] for tests and database-less runs.

pub mod memory;
pub mod models;
pub mod postgres;

use std::future::Future;

use crate::domain::{Event, EventId, EventType, Person, PersonId, PersonUpdate};

pub use memory::InMemoryPersistence;
pub use postgres::PostgresPersistence;

/// Errors raised by a persistence backend.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The database driver reported a failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A value could not be encoded for storage.
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// A stored row could not be decoded into a domain value.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// A record with the same primary key already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A referential constraint was violated.
    #[error("constraint violation: {0}")]
    Constraint(String),
}

/// Storage operations for [`Person`] records.
pub trait PersonRepository: Send + Sync + 'static {
    /// Returns every person, oldest first.
    fn list_persons(&self) -> impl Future<Output = Result<Vec<Person>, PersistenceError>> + Send;

    /// Looks up a person by id.
    fn find_person(
        &self,
        id: PersonId,
    ) -> impl Future<Output = Result<Option<Person>, PersistenceError>> + Send;

    /// Inserts a new person.
    fn insert_person(
        &self,
        person: &Person,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    /// Applies `update` to an existing person and returns the stored
    /// result, or `None` if no such person exists.
    fn update_person(
        &self,
        id: PersonId,
        update: &PersonUpdate,
    ) -> impl Future<Output = Result<Option<Person>, PersistenceError>> + Send;

    /// Deletes a person (and, by cascade, their events). Returns whether a
    /// row was removed.
    fn delete_person(
        &self,
        id: PersonId,
    ) -> impl Future<Output = Result<bool, PersistenceError>> + Send;
}

/// Storage operations for [`Event`] records.
pub trait EventRepository: Send + Sync + 'static {
    /// Returns every event, oldest first, optionally restricted to one type.
    fn list_events(
        &self,
        event_type: Option<EventType>,
    ) -> impl Future<Output = Result<Vec<Event>, PersistenceError>> + Send;

    /// Looks up an event by id.
    fn find_event(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, PersistenceError>> + Send;

    /// Inserts a new event.
    fn insert_event(&self, event: &Event)
    -> impl Future<Output = Result<(), PersistenceError>> + Send;

    /// Changes the type and owner of an existing event, returning the
    /// stored result or `None` if no such event exists.
    fn update_event(
        &self,
        id: EventId,
        event_type: EventType,
        person_id: PersonId,
    ) -> impl Future<Output = Result<Option<Event>, PersistenceError>> + Send;

    /// Deletes an event. Returns whether a row was removed.
    fn delete_event(&self, id: EventId)
    -> impl Future<Output = Result<bool, PersistenceError>> + Send;
}

/// A backend that stores both persons and events.
pub trait Repository: PersonRepository + EventRepository {}

impl<T> Repository for T where T: PersonRepository + EventRepository {}
