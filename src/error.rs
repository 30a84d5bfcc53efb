//! API error type with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for the API. Each variant maps to
//! a specific HTTP status code and is rendered with the same
//! [`Envelope`] as successful responses, with `data: null`.
//!
//! | Variant         | HTTP Status               |
//! |-----------------|---------------------------|
//! | `InvalidId`     | 400 Bad Request           |
//! | `InvalidRequest`| 400 Bad Request           |
//! | `IdMismatch`    | 400 Bad Request           |
//! | `NotCreated`    | 400 Bad Request           |
//! | `NotFound`      | 404 Not Found             |
//! | `Persistence`   | 500 Internal Server Error |
//! | `Internal`      | 500 Internal Server Error |
//!
//! The underlying cause (driver errors, JSON parse errors) is never part of
//! the rendered body. It travels in an [`ErrorCause`] response extension and
//! [`expose_error_details`] appends it to `details` when the deployment
//! allows it.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::envelope::{Envelope, NoData, custom_response};
use crate::api::messages;
use crate::persistence::PersistenceError;

/// Server-side error enum with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A path segment that should be an id is not a UUID.
    #[error("invalid id `{raw}`: {reason}")]
    InvalidId {
        /// The offending path segment.
        raw: String,
        /// Why it did not parse.
        reason: String,
    },

    /// The request body, query string or a path segment is malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The id in the route differs from the id in the body.
    #[error("route id {route} does not match body id {body}")]
    IdMismatch {
        /// Id taken from the URL path.
        route: String,
        /// Id taken from the request body.
        body: String,
    },

    /// No entity with the given id exists.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `Person`.
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// The store refused to create the entity.
    #[error("{entity} not created: {source}")]
    NotCreated {
        /// Entity kind, e.g. `Event`.
        entity: &'static str,
        /// What the store reported.
        #[source]
        source: PersistenceError,
    },

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Shorthand for [`ApiError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for [`ApiError::IdMismatch`].
    pub fn id_mismatch(route: impl ToString, body: impl ToString) -> Self {
        Self::IdMismatch {
            route: route.to_string(),
            body: body.to_string(),
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidId { .. }
            | Self::InvalidRequest(_)
            | Self::IdMismatch { .. }
            | Self::NotCreated { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the client-facing `details` text, without the cause.
    #[must_use]
    pub fn details(&self) -> String {
        match self {
            Self::InvalidId { .. } | Self::InvalidRequest(_) => messages::bad_request_message(),
            Self::IdMismatch { route, body } => {
                messages::route_request_mismatch_message(route, body)
            }
            Self::NotFound { entity, id } => messages::not_found_by_id_message(entity, id),
            Self::NotCreated { entity, .. } => messages::not_created_message(entity),
            Self::Persistence(_) | Self::Internal(_) => messages::internal_server_error_message(),
        }
    }

    /// Returns the underlying cause, if this variant has one worth showing.
    #[must_use]
    pub fn cause(&self) -> Option<String> {
        match self {
            Self::InvalidId { raw, reason } => Some(format!("invalid id `{raw}`: {reason}")),
            Self::InvalidRequest(cause) | Self::Internal(cause) => Some(cause.clone()),
            Self::NotCreated { source, .. } => Some(source.to_string()),
            Self::Persistence(source) => Some(source.to_string()),
            Self::IdMismatch { .. } | Self::NotFound { .. } => None,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

/// Details and cause of a failed request, attached to the response as an
/// extension for [`expose_error_details`].
#[derive(Debug, Clone)]
pub struct ErrorCause {
    /// Public details already present in the body.
    pub details: String,
    /// Underlying error text.
    pub cause: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let details = self.details();
        let cause = self.cause();
        let mut response = custom_response::<NoData>(None, details.clone(), status).into_response();
        if let Some(cause) = cause {
            response
                .extensions_mut()
                .insert(ErrorCause { details, cause });
        }
        response
    }
}

/// Middleware that rewrites error bodies to include their [`ErrorCause`]
/// when `show_error_details` is enabled.
pub async fn expose_error_details(
    State(show_error_details): State<bool>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(ErrorCause { details, cause }) = response.extensions_mut().remove::<ErrorCause>()
    else {
        return response;
    };
    if !show_error_details {
        return response;
    }

    let status = response.status();
    let details = messages::with_error_details(&details, cause);
    let envelope: Envelope<NoData> = custom_response(None, details, status);
    envelope.into_response()
}
