//! The `{ data, response }` envelope wrapping every response body.
//!
//! ```json
//! {
//!   "data": { "id": "…", "email": "…" },
//!   "response": {
//!     "details": "The request was successful",
//!     "message": "Ok",
//!     "status": 200
//!   }
//! }
//! ```
//!
//! Failures use the same shape with `data: null`; see
//! [`crate::error::ApiError`].

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::messages;

/// Uniform response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Envelope<T> {
    /// The payload, or `null` when there is nothing to return.
    pub data: Option<T>,
    /// Outcome description.
    pub response: ResponseMeta,
}

/// Outcome description embedded in every [`Envelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResponseMeta {
    /// Human-readable explanation.
    pub details: String,
    /// Short status word such as `Ok` or `Not Found`.
    pub message: String,
    /// Copy of the HTTP status code.
    pub status: u16,
}

/// Payload type of envelopes whose `data` is always `null`: deletes and
/// every error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoData;

/// Returns the short status word for `status`.
///
/// Every 2xx reads as `Ok`; other codes use their canonical reason phrase.
#[must_use]
pub fn status_message(status: StatusCode) -> &'static str {
    if status.is_success() {
        return "Ok";
    }
    status.canonical_reason().unwrap_or("Unknown")
}

/// Builds an envelope from its parts.
#[must_use]
pub fn custom_response<T>(
    data: Option<T>,
    details: impl Into<String>,
    status: StatusCode,
) -> Envelope<T> {
    Envelope {
        data,
        response: ResponseMeta {
            details: details.into(),
            message: status_message(status).to_string(),
            status: status.as_u16(),
        },
    }
}

impl<T> Envelope<T> {
    /// `200 Ok` carrying `data`.
    #[must_use]
    pub fn ok(data: T) -> Self {
        custom_response(Some(data), messages::successful_message(), StatusCode::OK)
    }

    /// `201 Ok` carrying the newly created `data`.
    #[must_use]
    pub fn created(data: T) -> Self {
        custom_response(Some(data), messages::successful_message(), StatusCode::CREATED)
    }

    /// Returns the status this envelope is sent with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl Envelope<NoData> {
    /// `200 Ok` with `data: null`.
    #[must_use]
    pub fn empty() -> Self {
        custom_response(None, messages::successful_message(), StatusCode::OK)
    }
}

impl<T> Envelope<Vec<T>> {
    /// `200 Ok` carrying a list. An empty list is still a success, with
    /// details saying so.
    #[must_use]
    pub fn list(items: Vec<T>) -> Self {
        let details = if items.is_empty() {
            messages::empty_collection_message()
        } else {
            messages::successful_message()
        };
        custom_response(Some(items), details, StatusCode::OK)
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn status_words() {
        assert_eq!(status_message(StatusCode::OK), "Ok");
        assert_eq!(status_message(StatusCode::CREATED), "Ok");
        assert_eq!(status_message(StatusCode::BAD_REQUEST), "Bad Request");
        assert_eq!(status_message(StatusCode::NOT_FOUND), "Not Found");
        assert_eq!(
            status_message(StatusCode::INTERNAL_SERVER_ERROR),
            "Internal Server Error"
        );
    }

    #[test]
    fn envelope_serializes_null_data() {
        let envelope = custom_response::<NoData>(None, "nothing here", StatusCode::NOT_FOUND);
        let Ok(value) = serde_json::to_value(&envelope) else {
            panic!("serialization failed");
        };
        assert_eq!(
            value,
            serde_json::json!({
                "data": null,
                "response": { "details": "nothing here", "message": "Not Found", "status": 404 }
            })
        );
    }

    #[test]
    fn empty_list_is_success_with_explanation() {
        let envelope = Envelope::<Vec<u8>>::list(Vec::new());
        assert_eq!(envelope.status(), StatusCode::OK);
        assert_eq!(envelope.data, Some(Vec::new()));
        assert_eq!(envelope.response.details, messages::empty_collection_message());

        let envelope = Envelope::list(vec![1u8]);
        assert_eq!(envelope.response.details, messages::successful_message());
    }

    #[test]
    fn created_duplicates_status_in_body() {
        let envelope = Envelope::created("x");
        assert_eq!(envelope.status(), StatusCode::CREATED);
        assert_eq!(envelope.response.status, 201);
        assert_eq!(envelope.response.message, "Ok");
    }
}
