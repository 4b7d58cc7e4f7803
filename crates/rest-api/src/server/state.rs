//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::service::{DummyService, HelloService};
use crate::storage::DummyStorage;

/// Application state shared across all request handlers.
///
/// Cheap to clone: Axum clones the state for each request.
#[derive(Clone)]
pub struct AppState {
    pub hello_service: Arc<dyn HelloService>,
}

impl AppState {
    pub fn new(hello_service: Arc<dyn HelloService>) -> Self {
        Self { hello_service }
    }
}

impl Default for AppState {
    /// Default state wired to the dummy service and storage, suitable for tests.
    fn default() -> Self {
        Self::new(Arc::new(DummyService::new(Arc::new(DummyStorage))))
    }
}
