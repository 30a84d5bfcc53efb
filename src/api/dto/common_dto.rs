//! Shared request shapes.

use serde::Deserialize;
use utoipa::ToSchema;

/// Request body for `DELETE /persons/{id}` and `DELETE /events/{id}`.
///
/// The body must repeat the id from the route; any other fields are
/// ignored.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DeleteRequest<I> {
    /// Must equal the id in the route.
    pub id: I,
}
