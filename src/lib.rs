//! # event-tracking-api
//!
//! REST API for tracking persons and the events (clicks, signups, feedback
//! submissions) they generate.
//!
//! Every response, success or failure, is wrapped in the same
//! `{ data, response: { details, message, status } }` envelope.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── TrackingService (service/)
//!     │
//!     ├── Repository traits (persistence/)
//!     │
//!     ├── PostgreSQL (sqlx)  or  in-memory maps
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
