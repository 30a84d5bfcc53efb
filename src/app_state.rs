//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::persistence::Repository;
use crate::service::TrackingService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Generic over the repository so handlers are statically dispatched.
/// `Clone` is implemented by hand so `R` itself need not be `Clone`.
#[derive(Debug)]
pub struct AppState<R> {
    /// Service for all person and event operations.
    pub tracking_service: Arc<TrackingService<R>>,
    /// Whether error responses include the underlying error text.
    pub show_error_details: bool,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            tracking_service: Arc::clone(&self.tracking_service),
            show_error_details: self.show_error_details,
        }
    }
}

impl<R: Repository> AppState<R> {
    /// Wraps `repo` in a [`TrackingService`] and builds the state.
    #[must_use]
    pub fn new(repo: R, show_error_details: bool) -> Self {
        Self {
            tracking_service: Arc::new(TrackingService::new(repo)),
            show_error_details,
        }
    }
}
