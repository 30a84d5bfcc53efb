//! Human-readable `details` strings used in response envelopes.

use std::fmt::Display;

/// Details for any successful request.
#[must_use]
pub fn successful_message() -> String {
    "The request was successful".to_string()
}

/// Details for a successful list request that found nothing.
#[must_use]
pub fn empty_collection_message() -> String {
    "The request was successful, however, there are no items in the database to retrieve."
        .to_string()
}

/// Details for a malformed request.
#[must_use]
pub fn bad_request_message() -> String {
    "The request is invalid. Please ensure the data in your request is correct and try again."
        .to_string()
}

/// Details for a route id that differs from the id in the request body.
#[must_use]
pub fn route_request_mismatch_message(id: impl Display, request_id: impl Display) -> String {
    format!(
        "The id in the route ({id}) does not match the id in the request body ({request_id}). \
         Please ensure the ids match and try again."
    )
}

/// Details for a create request the store rejected.
#[must_use]
pub fn not_created_message(entity: &str) -> String {
    format!(
        "The {entity} was not created. Please ensure the data in your request is correct and try again."
    )
}

/// Details for an unexpected server-side failure.
#[must_use]
pub fn internal_server_error_message() -> String {
    "An unknown error occurred while processing the request.".to_string()
}

/// Details for an entity lookup that found nothing.
#[must_use]
pub fn not_found_by_id_message(entity: &str, id: impl Display) -> String {
    format!(
        "The {entity} with `id` {id} could not be found. \
         Please ensure the `id` in your request is correct and try again"
    )
}

/// Details for a path no route matches.
#[must_use]
pub fn route_not_found_message(path: impl Display) -> String {
    format!(
        "The route {path} does not exist. \
         Please ensure the URL in your request is correct and try again."
    )
}

/// Details for a known path requested with an unsupported method.
#[must_use]
pub fn method_not_allowed_message(method: impl Display, path: impl Display) -> String {
    format!(
        "The method {method} is not allowed for the route {path}. \
         Please ensure the method in your request is correct and try again."
    )
}

/// Appends the underlying error to a details message.
#[must_use]
pub fn with_error_details(message: &str, cause: impl Display) -> String {
    format!("{message} Details: \n {cause}")
}
