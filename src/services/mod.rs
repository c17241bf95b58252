//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

pub mod category_service;
pub mod container;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use category_service::{CategoryManager, CategoryService};

#[cfg(any(test, feature = "test-utils"))]
pub use category_service::MockCategoryService;
