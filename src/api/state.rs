//! Application state - Dependency injection container.
//!
//! Provides centralized access to the category service and the
//! underlying database handle.

use std::sync::Arc;

use crate::infra::{BackendKind, Database, Selection};
use crate::services::{CategoryService, ServiceContainer, Services};

/// Application state containing all services (DI container).
///
/// Nothing in here knows which repository backend was selected beyond
/// the informational `backend` tag reported by health checks.
#[derive(Clone)]
pub struct AppState {
    /// Category service
    pub category_service: Arc<dyn CategoryService>,
    /// Database handle
    pub database: Arc<Database>,
    /// Backend chosen by the selector at startup
    pub backend: BackendKind,
}

impl AppState {
    /// Create application state from the startup backend selection.
    pub fn from_selection(database: Arc<Database>, selection: &Selection) -> Self {
        let container = Services::from_selection(selection);

        Self {
            category_service: container.categories(),
            database,
            backend: selection.backend,
        }
    }

    /// Create new application state with manually injected services.
    pub fn new(
        category_service: Arc<dyn CategoryService>,
        database: Arc<Database>,
        backend: BackendKind,
    ) -> Self {
        Self {
            category_service,
            database,
            backend,
        }
    }
}
