//! In-process persistence backend.
//!
//! [`InMemoryPersistence`] keeps persons and events in `HashMap`s behind
//! [`tokio::sync::RwLock`]s. It enforces the same rules as the SQL schema:
//! unique primary keys, the `VARCHAR(40)` limit on person text columns, the
//! `event.person_id` foreign key and cascading deletes from persons to their
//! events. Data lives as long as the value.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{EventRepository, PersistenceError, PersonRepository};
use crate::domain::{Event, EventId, EventType, Person, PersonId, PersonUpdate};

/// Character limit of `person.email`, `person.first_name` and
/// `person.last_name` in the SQL schema.
const PERSON_TEXT_MAX_CHARS: usize = 40;

fn check_person_text(
    email: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<(), PersistenceError> {
    let columns = [("email", email), ("first_name", first_name), ("last_name", last_name)];
    for (column, value) in columns {
        if let Some(value) = value {
            let chars = value.chars().count();
            if chars > PERSON_TEXT_MAX_CHARS {
                return Err(PersistenceError::Constraint(format!(
                    "person.{column} is {chars} characters, limit is {PERSON_TEXT_MAX_CHARS}"
                )));
            }
        }
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Tables {
    persons: HashMap<PersonId, Person>,
    events: HashMap<EventId, Event>,
}

/// Map-backed store for persons and events.
///
/// Both tables sit behind a single lock so that cross-table rules (the
/// person reference on events, cascading deletes) are checked atomically.
/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersistence {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryPersistence {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored persons.
    pub async fn person_count(&self) -> usize {
        self.tables.read().await.persons.len()
    }

    /// Returns the number of stored events.
    pub async fn event_count(&self) -> usize {
        self.tables.read().await.events.len()
    }
}

impl PersonRepository for InMemoryPersistence {
    async fn list_persons(&self) -> Result<Vec<Person>, PersistenceError> {
        let tables = self.tables.read().await;
        let mut persons: Vec<Person> = tables.persons.values().cloned().collect();
        persons.sort_by_key(|p| (p.datetime_created, p.id));
        Ok(persons)
    }

    async fn find_person(&self, id: PersonId) -> Result<Option<Person>, PersistenceError> {
        Ok(self.tables.read().await.persons.get(&id).cloned())
    }

    async fn insert_person(&self, person: &Person) -> Result<(), PersistenceError> {
        check_person_text(
            person.email.as_deref(),
            person.first_name.as_deref(),
            person.last_name.as_deref(),
        )?;
        let mut tables = self.tables.write().await;
        if tables.persons.contains_key(&person.id) {
            return Err(PersistenceError::Conflict(format!(
                "person {} already exists",
                person.id
            )));
        }
        tables.persons.insert(person.id, person.clone());
        Ok(())
    }

    async fn update_person(
        &self,
        id: PersonId,
        update: &PersonUpdate,
    ) -> Result<Option<Person>, PersistenceError> {
        check_person_text(
            update.email.as_deref(),
            update.first_name.as_deref(),
            update.last_name.as_deref(),
        )?;
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.persons.get_mut(&id) else {
            return Ok(None);
        };
        *stored = stored.apply(update.clone());
        Ok(Some(stored.clone()))
    }

    async fn delete_person(&self, id: PersonId) -> Result<bool, PersistenceError> {
        let mut tables = self.tables.write().await;
        if tables.persons.remove(&id).is_none() {
            return Ok(false);
        }
        tables.events.retain(|_, event| event.person_id != id);
        Ok(true)
    }
}

impl EventRepository for InMemoryPersistence {
    async fn list_events(
        &self,
        event_type: Option<EventType>,
    ) -> Result<Vec<Event>, PersistenceError> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables
            .events
            .values()
            .filter(|e| event_type.is_none_or(|t| e.event_type == t))
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.datetime_created, e.id));
        Ok(events)
    }

    async fn find_event(&self, id: EventId) -> Result<Option<Event>, PersistenceError> {
        Ok(self.tables.read().await.events.get(&id).cloned())
    }

    async fn insert_event(&self, event: &Event) -> Result<(), PersistenceError> {
        let mut tables = self.tables.write().await;
        if tables.events.contains_key(&event.id) {
            return Err(PersistenceError::Conflict(format!(
                "event {} already exists",
                event.id
            )));
        }
        if !tables.persons.contains_key(&event.person_id) {
            return Err(PersistenceError::Constraint(format!(
                "event.person_id references missing person {}",
                event.person_id
            )));
        }
        tables.events.insert(event.id, event.clone());
        Ok(())
    }

    async fn update_event(
        &self,
        id: EventId,
        event_type: EventType,
        person_id: PersonId,
    ) -> Result<Option<Event>, PersistenceError> {
        let mut tables = self.tables.write().await;
        if !tables.events.contains_key(&id) {
            return Ok(None);
        }
        if !tables.persons.contains_key(&person_id) {
            return Err(PersistenceError::Constraint(format!(
                "event.person_id references missing person {person_id}"
            )));
        }
        let Some(stored) = tables.events.get_mut(&id) else {
            return Ok(None);
        };
        stored.event_type = event_type;
        stored.person_id = person_id;
        Ok(Some(stored.clone()))
    }

    async fn delete_event(&self, id: EventId) -> Result<bool, PersistenceError> {
        Ok(self.tables.write().await.events.remove(&id).is_some())
    }
}
