//! Infrastructure layer - External systems integration
//!
//! This module handles the persistence concerns:
//! - Database connections and migrations
//! - The category repository contract and its two backends
//! - Backend selection at startup

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{
    select_backend, BackendKind, CategoryOrmStore, CategoryRepository, CategorySqlStore,
    Selection, TransFn, TxHandle,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockCategoryRepository;
