//! Repository layer - Data access abstraction
//!
//! One contract, two interchangeable backends, and the startup selector
//! that decides which backend a process runs on.

mod category_repository;
pub(crate) mod entities;
mod orm_store;
mod selector;
mod sql_store;

pub use category_repository::{CategoryRepository, TransFn, TxHandle};
pub use orm_store::CategoryOrmStore;
pub use selector::{select_backend, BackendKind, Selection};
pub use sql_store::CategorySqlStore;

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
