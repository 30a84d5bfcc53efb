//! Data Transfer Objects for REST request deserialization.
//!
//! Responses reuse the domain types directly inside an
//! [`Envelope`](crate::api::envelope::Envelope); only request bodies and
//! query strings get dedicated shapes here.

pub mod common_dto;
pub mod event_dto;
pub mod person_dto;

pub use common_dto::*;
pub use event_dto::*;
pub use person_dto::*;
