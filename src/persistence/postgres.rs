//! PostgreSQL implementation of the persistence layer.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::{EventRow, PersonRow, encode_events};
use super::{EventRepository, PersistenceError, PersonRepository};
use crate::config::DatabaseConfig;
use crate::domain::{Event, EventId, EventType, Person, PersonId, PersonUpdate};

const CREATE_PERSON_TABLE: &str = "CREATE TABLE IF NOT EXISTS person (\
     id UUID PRIMARY KEY, \
     datetime_created TIMESTAMPTZ NOT NULL, \
     datetime_modified TIMESTAMPTZ NOT NULL, \
     email VARCHAR(40), \
     events TEXT NOT NULL DEFAULT '[]', \
     first_name VARCHAR(40), \
     last_name VARCHAR(40), \
     role VARCHAR(16) NOT NULL DEFAULT 'user')";

const CREATE_EVENT_TABLE: &str = "CREATE TABLE IF NOT EXISTS event (\
     id UUID PRIMARY KEY, \
     datetime_created TIMESTAMPTZ NOT NULL, \
     event_type VARCHAR(32) NOT NULL, \
     person_id UUID NOT NULL REFERENCES person (id) ON DELETE CASCADE)";

const SELECT_PERSONS: &str = "SELECT id, datetime_created, datetime_modified, email, events, \
     first_name, last_name, role FROM person ORDER BY datetime_created ASC, id ASC";

const SELECT_PERSON_BY_ID: &str = "SELECT id, datetime_created, datetime_modified, email, events, \
     first_name, last_name, role FROM person WHERE id = $1";

const INSERT_PERSON: &str = "INSERT INTO person (id, datetime_created, datetime_modified, email, \
     events, first_name, last_name, role) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)";

const UPDATE_PERSON: &str = "UPDATE person SET email = $2, first_name = $3, last_name = $4, \
     role = $5, events = $6, datetime_modified = $7 WHERE id = $1 \
     RETURNING id, datetime_created, datetime_modified, email, events, first_name, last_name, role";

const DELETE_PERSON: &str = "DELETE FROM person WHERE id = $1";

const SELECT_EVENTS: &str = "SELECT id, datetime_created, event_type, person_id FROM event \
     WHERE ($1::TEXT IS NULL OR event_type = $1) ORDER BY datetime_created ASC, id ASC";

const SELECT_EVENT_BY_ID: &str =
    "SELECT id, datetime_created, event_type, person_id FROM event WHERE id = $1";

const INSERT_EVENT: &str =
    "INSERT INTO event (id, datetime_created, event_type, person_id) VALUES ($1, $2, $3, $4)";

const UPDATE_EVENT: &str = "UPDATE event SET event_type = $2, person_id = $3 WHERE id = $1 \
     RETURNING id, datetime_created, event_type, person_id";

const DELETE_EVENT: &str = "DELETE FROM event WHERE id = $1";

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized and targeted by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Database`] if the database cannot be
    /// reached within the configured timeout.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, PersistenceError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_with(config.connect_options.clone())
            .await?;

        tracing::info!(
            host = config.connect_options.get_host(),
            database = config.connect_options.get_database().unwrap_or_default(),
            "database connection pool opened"
        );
        Ok(Self::new(pool))
    }

    /// Creates the `person` and `event` tables if they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Database`] on database failure.
    pub async fn ensure_schema(&self) -> Result<(), PersistenceError> {
        sqlx::query(CREATE_PERSON_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_EVENT_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Closes the connection pool, waiting for checked-out connections to
    /// be returned.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database connection pool closed");
    }
}

impl PersonRepository for PostgresPersistence {
    async fn list_persons(&self) -> Result<Vec<Person>, PersistenceError> {
        let rows = sqlx::query_as::<_, PersonRow>(SELECT_PERSONS)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Person::try_from).collect()
    }

    async fn find_person(&self, id: PersonId) -> Result<Option<Person>, PersistenceError> {
        let row = sqlx::query_as::<_, PersonRow>(SELECT_PERSON_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Person::try_from).transpose()
    }

    async fn insert_person(&self, person: &Person) -> Result<(), PersistenceError> {
        let events = encode_events(&person.events)?;
        sqlx::query(INSERT_PERSON)
            .bind(person.id.as_uuid())
            .bind(person.datetime_created)
            .bind(person.datetime_modified)
            .bind(person.email.as_deref())
            .bind(events)
            .bind(person.first_name.as_deref())
            .bind(person.last_name.as_deref())
            .bind(person.role.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_person(
        &self,
        id: PersonId,
        update: &PersonUpdate,
    ) -> Result<Option<Person>, PersistenceError> {
        let events = encode_events(&update.events)?;
        let row = sqlx::query_as::<_, PersonRow>(UPDATE_PERSON)
            .bind(id.as_uuid())
            .bind(update.email.as_deref())
            .bind(update.first_name.as_deref())
            .bind(update.last_name.as_deref())
            .bind(update.role.as_str())
            .bind(events)
            .bind(update.modified_at)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Person::try_from).transpose()
    }

    async fn delete_person(&self, id: PersonId) -> Result<bool, PersistenceError> {
        let result = sqlx::query(DELETE_PERSON)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl EventRepository for PostgresPersistence {
    async fn list_events(
        &self,
        event_type: Option<EventType>,
    ) -> Result<Vec<Event>, PersistenceError> {
        let rows = sqlx::query_as::<_, EventRow>(SELECT_EVENTS)
            .bind(event_type.map(|t| t.as_str()))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn find_event(&self, id: EventId) -> Result<Option<Event>, PersistenceError> {
        let row = sqlx::query_as::<_, EventRow>(SELECT_EVENT_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Event::try_from).transpose()
    }

    async fn insert_event(&self, event: &Event) -> Result<(), PersistenceError> {
        sqlx::query(INSERT_EVENT)
            .bind(event.id.as_uuid())
            .bind(event.datetime_created)
            .bind(event.event_type.as_str())
            .bind(event.person_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_event(
        &self,
        id: EventId,
        event_type: EventType,
        person_id: PersonId,
    ) -> Result<Option<Event>, PersistenceError> {
        let row = sqlx::query_as::<_, EventRow>(UPDATE_EVENT)
            .bind(id.as_uuid())
            .bind(event_type.as_str())
            .bind(person_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Event::try_from).transpose()
    }

    async fn delete_event(&self, id: EventId) -> Result<bool, PersistenceError> {
        let result = sqlx::query(DELETE_EVENT)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
