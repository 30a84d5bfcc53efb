//! OpenAPI document for every REST endpoint.

use utoipa::OpenApi;

use super::dto::{
    CreateEventRequest, CreatePersonRequest, DeleteRequest, UpdateEventRequest,
    UpdatePersonRequest,
};
use super::envelope::{NoData, ResponseMeta};
use super::handlers::{event, person, system};
use crate::domain::{Event, EventId, EventRef, EventType, Person, PersonId, Role};

/// Generated OpenAPI description, served at `/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "User Event Tracking Api Application",
        description = "Tracks persons and the events they generate."
    ),
    paths(
        system::home_handler,
        system::health_handler,
        system::crash_test_handler,
        person::list_persons,
        person::get_person,
        person::create_person,
        person::update_person,
        person::delete_person,
        event::list_events,
        event::get_event,
        event::create_event,
        event::update_event,
        event::delete_event,
    ),
    components(schemas(
        Person,
        Role,
        EventRef,
        Event,
        EventType,
        PersonId,
        EventId,
        ResponseMeta,
        NoData,
        CreatePersonRequest,
        UpdatePersonRequest,
        CreateEventRequest,
        UpdateEventRequest,
        DeleteRequest<PersonId>,
        DeleteRequest<EventId>,
        system::HealthResponse,
    )),
    tags(
        (name = "Persons", description = "People whose activity is tracked"),
        (name = "Events", description = "Things that happened to a person"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_resource_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/persons", "/persons/{id}", "/events", "/events/{id}", "/health"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
