//! Service Container - Centralized service access.
//!
//! Wires the backend selection produced at startup into the service
//! layer; everything downstream depends on service traits only.

use std::sync::Arc;

use super::{CategoryManager, CategoryService};
use crate::infra::Selection;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get category service
    fn categories(&self) -> Arc<dyn CategoryService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    category_service: Arc<dyn CategoryService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(category_service: Arc<dyn CategoryService>) -> Self {
        Self { category_service }
    }

    /// Create service container from the selected repository backend
    pub fn from_selection(selection: &Selection) -> Self {
        let category_service = Arc::new(CategoryManager::new(selection.repository.clone()));

        Self { category_service }
    }
}

impl ServiceContainer for Services {
    fn categories(&self) -> Arc<dyn CategoryService> {
        self.category_service.clone()
    }
}
