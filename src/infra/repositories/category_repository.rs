//! Category repository contract shared by both persistence backends.
//!
//! The trait is the sole dependency surface of the domain layer: callers
//! never learn which backend serves them. Mechanical CRUD only; business
//! rules (uniqueness probing, dependents protection) live in the service.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use sea_orm::DatabaseTransaction;
use sqlx::{Postgres, Transaction};
use tokio::sync::Mutex;

use crate::domain::Category;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Handle to an open backend transaction.
///
/// Carries whichever driver transaction the owning backend opened. A
/// repository bound via [`CategoryRepository::with_tx`] only picks the
/// handle up when the variant matches its own backend; otherwise the
/// receiver is returned unchanged so composition across backend
/// boundaries stays a safe no-op.
#[derive(Clone)]
pub enum TxHandle {
    /// sea-orm transaction (preferred backend)
    Orm(Arc<DatabaseTransaction>),
    /// Raw sqlx transaction (degraded backend)
    Sql(Arc<Mutex<Transaction<'static, Postgres>>>),
}

/// Callback executed against a transaction-scoped repository by
/// [`CategoryRepository::trans`]. The repository handed to the callback
/// must not outlive it.
pub type TransFn =
    Box<dyn FnOnce(Arc<dyn CategoryRepository>) -> BoxFuture<'static, AppResult<()>> + Send>;

/// Category repository trait for dependency injection.
///
/// Cancellation rides on the futures themselves: dropping an in-flight
/// call aborts the underlying database operation.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a category, assigning id and audit timestamps.
    /// Fails with `AlreadyExists` when the code collides.
    async fn insert(&self, category: Category) -> AppResult<Category>;

    /// Find a category by id; `NotFound` when absent.
    async fn find_one(&self, id: i64) -> AppResult<Category>;

    /// Find a category by code. A missing code is `Ok(None)`, not an
    /// error: this call doubles as the existence probe before inserts.
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Category>>;

    /// Replace all business fields of the row with a matching id;
    /// `NotFound` when the id does not exist.
    async fn update(&self, category: Category) -> AppResult<()>;

    /// Delete the row. The dependents check is the domain service's job.
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// All enabled categories ordered by `sort` then `id`, ascending.
    async fn find_all(&self) -> AppResult<Vec<Category>>;

    /// Children of a parent ordered by `sort` then `id`, ascending.
    async fn find_by_parent_id(&self, parent_id: i64) -> AppResult<Vec<Category>>;

    /// Page through all categories (1-indexed page). Returns the page
    /// rows and the unfiltered total row count.
    async fn list(&self, page: u64, page_size: u64) -> AppResult<(Vec<Category>, u64)>;

    /// Bind this repository to an open transaction. Returns the receiver
    /// unchanged when the handle belongs to the other backend.
    fn with_tx(&self, tx: &TxHandle) -> Arc<dyn CategoryRepository>;

    /// Run `f` against a transaction-scoped repository: commit on
    /// success, roll back on error. Nested calls are rejected.
    async fn trans(&self, f: TransFn) -> AppResult<()>;
}
