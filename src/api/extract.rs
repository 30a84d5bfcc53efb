//! Request extractors that fail with an [`ApiError`] envelope instead of
//! axum's plain-text rejections.

use std::str::FromStr;

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// `Json<T>` whose rejection is an [`ApiError::InvalidRequest`].
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Path<T>` whose rejection (e.g. a segment that is not valid UTF-8) is an
/// [`ApiError::InvalidRequest`].
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// `Query<T>` whose rejection is an [`ApiError::InvalidRequest`].
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Parses a route id segment.
///
/// # Errors
///
/// Returns [`ApiError::InvalidId`] if `raw` is not a UUID.
pub fn parse_id<I>(raw: &str) -> Result<I, ApiError>
where
    I: FromStr<Err = uuid::Error>,
{
    raw.parse().map_err(|e: uuid::Error| ApiError::InvalidId {
        raw: raw.to_string(),
        reason: e.to_string(),
    })
}
