//! Person CRUD handlers: list, get, create, update, delete.

use axum::Router;
use axum::extract::State;
use axum::routing::get;

use crate::api::dto::{CreatePersonRequest, DeleteRequest, UpdatePersonRequest};
use crate::api::envelope::{Envelope, NoData};
use crate::api::extract::{ApiJson, ApiPath, parse_id};
use crate::app_state::AppState;
use crate::domain::{Person, PersonId};
use crate::error::ApiError;
use crate::persistence::Repository;

/// `GET /persons`: List all persons.
///
/// # Errors
///
/// Returns [`ApiError::Persistence`] on storage failure.
#[utoipa::path(
    get,
    path = "/persons",
    tag = "Persons",
    summary = "List persons",
    description = "Returns every person, oldest first. An empty store yields an empty array.",
    responses(
        (status = 200, description = "All persons", body = Envelope<Vec<Person>>),
        (status = 500, description = "Storage failure", body = Envelope<NoData>),
    )
)]
pub async fn list_persons<R: Repository>(
    State(state): State<AppState<R>>,
) -> Result<Envelope<Vec<Person>>, ApiError> {
    let persons = state.tracking_service.list_persons().await?;
    Ok(Envelope::list(persons))
}

/// `GET /persons/{id}`: Get one person.
///
/// # Errors
///
/// Returns [`ApiError::InvalidId`] or [`ApiError::NotFound`].
#[utoipa::path(
    get,
    path = "/persons/{id}",
    tag = "Persons",
    summary = "Get a person",
    params(
        ("id" = String, Path, description = "Person UUID"),
    ),
    responses(
        (status = 200, description = "The person", body = Envelope<Person>),
        (status = 400, description = "Malformed id", body = Envelope<NoData>),
        (status = 404, description = "No such person", body = Envelope<NoData>),
    )
)]
pub async fn get_person<R: Repository>(
    State(state): State<AppState<R>>,
    ApiPath(id): ApiPath<String>,
) -> Result<Envelope<Person>, ApiError> {
    let id: PersonId = parse_id(&id)?;
    let person = state.tracking_service.get_person(id).await?;
    Ok(Envelope::ok(person))
}

/// `POST /persons`: Create a person.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] for a malformed body or
/// [`ApiError::NotCreated`] if the store rejects it.
#[utoipa::path(
    post,
    path = "/persons",
    tag = "Persons",
    summary = "Create a person",
    description = "Creates a person. `id` and `datetime_created` are generated when omitted; `events` always starts empty.",
    request_body = CreatePersonRequest,
    responses(
        (status = 201, description = "Person created", body = Envelope<Person>),
        (status = 400, description = "Invalid body or duplicate id", body = Envelope<NoData>),
    )
)]
pub async fn create_person<R: Repository>(
    State(state): State<AppState<R>>,
    ApiJson(req): ApiJson<CreatePersonRequest>,
) -> Result<Envelope<Person>, ApiError> {
    let person = state.tracking_service.create_person(req.into()).await?;
    Ok(Envelope::created(person))
}

/// `PUT /persons/{id}`: Replace a person's mutable fields.
///
/// # Errors
///
/// Returns [`ApiError::IdMismatch`] when the body id differs from the
/// route, or [`ApiError::NotFound`].
#[utoipa::path(
    put,
    path = "/persons/{id}",
    tag = "Persons",
    summary = "Update a person",
    description = "Replaces email, names, role and events. `datetime_created` is kept and `datetime_modified` set to now.",
    params(
        ("id" = String, Path, description = "Person UUID, repeated in the body"),
    ),
    request_body = UpdatePersonRequest,
    responses(
        (status = 200, description = "Updated person", body = Envelope<Person>),
        (status = 400, description = "Invalid body or id mismatch", body = Envelope<NoData>),
        (status = 404, description = "No such person", body = Envelope<NoData>),
    )
)]
pub async fn update_person<R: Repository>(
    State(state): State<AppState<R>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<UpdatePersonRequest>,
) -> Result<Envelope<Person>, ApiError> {
    let route_id: PersonId = parse_id(&id)?;
    let (body_id, update) = req.into_parts();
    let person = state
        .tracking_service
        .update_person(route_id, body_id, update)
        .await?;
    Ok(Envelope::ok(person))
}

/// `DELETE /persons/{id}`: Delete a person and their events.
///
/// # Errors
///
/// Returns [`ApiError::IdMismatch`] or [`ApiError::NotFound`].
#[utoipa::path(
    delete,
    path = "/persons/{id}",
    tag = "Persons",
    summary = "Delete a person",
    description = "Deletes a person. Their events are deleted with them.",
    params(
        ("id" = String, Path, description = "Person UUID, repeated in the body"),
    ),
    request_body = DeleteRequest<PersonId>,
    responses(
        (status = 200, description = "Person deleted", body = Envelope<NoData>),
        (status = 400, description = "Invalid body or id mismatch", body = Envelope<NoData>),
        (status = 404, description = "No such person", body = Envelope<NoData>),
    )
)]
pub async fn delete_person<R: Repository>(
    State(state): State<AppState<R>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<DeleteRequest<PersonId>>,
) -> Result<Envelope<NoData>, ApiError> {
    let route_id: PersonId = parse_id(&id)?;
    state
        .tracking_service
        .delete_person(route_id, req.id)
        .await?;
    Ok(Envelope::empty())
}

/// Person routes.
pub fn routes<R: Repository>() -> Router<AppState<R>> {
    Router::new()
        .route("/persons", get(list_persons::<R>).post(create_person::<R>))
        .route(
            "/persons/{id}",
            get(get_person::<R>)
                .put(update_person::<R>)
                .delete(delete_person::<R>),
        )
}
