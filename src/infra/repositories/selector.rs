//! Backend selection and degradation policy.
//!
//! The selector is handed both candidate connections at bootstrap and
//! decides once, for the process lifetime, which repository backend to
//! build. There is no live failover afterwards: a backend that dies
//! later surfaces driver errors to callers instead of switching.
//!
//! Construction stays silent: the selection outcome is reported through
//! the returned [`Selection`] value and logged by the caller, not from
//! inside the repository wiring.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sqlx::PgPool;

use super::category_repository::CategoryRepository;
use super::orm_store::CategoryOrmStore;
use super::sql_store::CategorySqlStore;
use crate::errors::{AppError, AppResult};

/// Which repository backend was selected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// SeaORM over the mapping-layer connection (preferred)
    Orm,
    /// Raw sqlx over the direct-SQL connection (degraded)
    Sql,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Orm => write!(f, "sea-orm"),
            BackendKind::Sql => write!(f, "sqlx"),
        }
    }
}

/// Outcome of backend selection
pub struct Selection {
    pub repository: Arc<dyn CategoryRepository>,
    pub backend: BackendKind,
    /// Reason the preferred backend was skipped, set on the degraded path
    pub degraded: Option<String>,
}

/// Choose the repository backend from the candidate connections.
///
/// Preference order: mapping layer first, direct SQL as the degraded
/// fallback. With neither connection available no repository can be
/// constructed and startup must abort.
pub fn select_backend(
    orm: Option<DatabaseConnection>,
    sql: Option<PgPool>,
) -> AppResult<Selection> {
    if let Some(db) = orm {
        return Ok(Selection {
            repository: Arc::new(CategoryOrmStore::new(db)),
            backend: BackendKind::Orm,
            degraded: None,
        });
    }

    if let Some(pool) = sql {
        return Ok(Selection {
            repository: Arc::new(CategorySqlStore::new(pool)),
            backend: BackendKind::Sql,
            degraded: Some("mapping-layer connection unavailable".to_string()),
        });
    }

    Err(AppError::internal(
        "no database connection available for the category repository",
    ))
}
