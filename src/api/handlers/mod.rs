//! REST endpoint handlers organized by resource.

pub mod event;
pub mod person;
pub mod system;

use axum::Router;

use crate::app_state::AppState;
use crate::persistence::Repository;

/// Composes all resource routes.
pub fn routes<R: Repository>() -> Router<AppState<R>> {
    Router::new()
        .merge(person::routes::<R>())
        .merge(event::routes::<R>())
}
