//! Service layer: business logic orchestration.
//!
//! [`TrackingService`] applies defaults, checks ids and references, and
//! delegates storage to a [`crate::persistence::Repository`].

pub mod tracking_service;

pub use tracking_service::{NewEvent, NewPerson, TrackingService};
