//! Event CRUD handlers: list (optionally by type), get, create, update,
//! delete.

use axum::Router;
use axum::extract::State;
use axum::routing::get;

use crate::api::dto::{CreateEventRequest, DeleteRequest, EventListParams, UpdateEventRequest};
use crate::api::envelope::{Envelope, NoData};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery, parse_id};
use crate::app_state::AppState;
use crate::domain::{Event, EventId};
use crate::error::ApiError;
use crate::persistence::Repository;

/// `GET /events`: List events.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] for an unknown `keyword`, or
/// [`ApiError::Persistence`] on storage failure.
#[utoipa::path(
    get,
    path = "/events",
    tag = "Events",
    summary = "List events",
    description = "Returns every event, oldest first, optionally filtered by event type.",
    params(EventListParams),
    responses(
        (status = 200, description = "Matching events", body = Envelope<Vec<Event>>),
        (status = 400, description = "Unknown event type", body = Envelope<NoData>),
        (status = 500, description = "Storage failure", body = Envelope<NoData>),
    )
)]
pub async fn list_events<R: Repository>(
    State(state): State<AppState<R>>,
    ApiQuery(params): ApiQuery<EventListParams>,
) -> Result<Envelope<Vec<Event>>, ApiError> {
    let event_type = params.event_type()?;
    let events = state.tracking_service.list_events(event_type).await?;
    Ok(Envelope::list(events))
}

/// `GET /events/{id}`: Get one event.
///
/// # Errors
///
/// Returns [`ApiError::InvalidId`] or [`ApiError::NotFound`].
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "Events",
    summary = "Get an event",
    params(
        ("id" = String, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "The event", body = Envelope<Event>),
        (status = 400, description = "Malformed id", body = Envelope<NoData>),
        (status = 404, description = "No such event", body = Envelope<NoData>),
    )
)]
pub async fn get_event<R: Repository>(
    State(state): State<AppState<R>>,
    ApiPath(id): ApiPath<String>,
) -> Result<Envelope<Event>, ApiError> {
    let id: EventId = parse_id(&id)?;
    let event = state.tracking_service.get_event(id).await?;
    Ok(Envelope::ok(event))
}

/// `POST /events`: Record an event for an existing person.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] naming the person if it does not exist,
/// or [`ApiError::NotCreated`] if the store rejects the event.
#[utoipa::path(
    post,
    path = "/events",
    tag = "Events",
    summary = "Create an event",
    description = "Records an event. The referenced person must exist; otherwise nothing is written.",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = Envelope<Event>),
        (status = 400, description = "Invalid body or duplicate id", body = Envelope<NoData>),
        (status = 404, description = "Person not found", body = Envelope<NoData>),
    )
)]
pub async fn create_event<R: Repository>(
    State(state): State<AppState<R>>,
    ApiJson(req): ApiJson<CreateEventRequest>,
) -> Result<Envelope<Event>, ApiError> {
    let event = state.tracking_service.create_event(req.into()).await?;
    Ok(Envelope::created(event))
}

/// `PUT /events/{id}`: Change an event's type or owner.
///
/// # Errors
///
/// Returns [`ApiError::IdMismatch`] or [`ApiError::NotFound`].
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "Events",
    summary = "Update an event",
    params(
        ("id" = String, Path, description = "Event UUID, repeated in the body"),
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Updated event", body = Envelope<Event>),
        (status = 400, description = "Invalid body or id mismatch", body = Envelope<NoData>),
        (status = 404, description = "No such event or person", body = Envelope<NoData>),
    )
)]
pub async fn update_event<R: Repository>(
    State(state): State<AppState<R>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<UpdateEventRequest>,
) -> Result<Envelope<Event>, ApiError> {
    let route_id: EventId = parse_id(&id)?;
    let event = state
        .tracking_service
        .update_event(route_id, req.id, req.event_type, req.person_id)
        .await?;
    Ok(Envelope::ok(event))
}

/// `DELETE /events/{id}`: Delete an event.
///
/// # Errors
///
/// Returns [`ApiError::IdMismatch`] or [`ApiError::NotFound`].
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "Events",
    summary = "Delete an event",
    params(
        ("id" = String, Path, description = "Event UUID, repeated in the body"),
    ),
    request_body = DeleteRequest<EventId>,
    responses(
        (status = 200, description = "Event deleted", body = Envelope<NoData>),
        (status = 400, description = "Invalid body or id mismatch", body = Envelope<NoData>),
        (status = 404, description = "No such event", body = Envelope<NoData>),
    )
)]
pub async fn delete_event<R: Repository>(
    State(state): State<AppState<R>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<DeleteRequest<EventId>>,
) -> Result<Envelope<NoData>, ApiError> {
    let route_id: EventId = parse_id(&id)?;
    state.tracking_service.delete_event(route_id, req.id).await?;
    Ok(Envelope::empty())
}

/// Event routes.
pub fn routes<R: Repository>() -> Router<AppState<R>> {
    Router::new()
        .route("/events", get(list_events::<R>).post(create_event::<R>))
        .route(
            "/events/{id}",
            get(get_event::<R>)
                .put(update_event::<R>)
                .delete(delete_event::<R>),
        )
}
