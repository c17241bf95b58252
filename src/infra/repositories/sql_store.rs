//! Direct-SQL backend for the category repository.
//!
//! Degraded backend: hand-written statements over a raw sqlx pool, used
//! when the mapping layer failed to initialize. Behavior must stay
//! identical to the SeaORM backend; only the driver mechanics differ.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgExecutor;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tokio::sync::Mutex;

use super::category_repository::{CategoryRepository, TransFn, TxHandle};
use crate::config::STATUS_ENABLED;
use crate::domain::{Category, CategoryStatus};
use crate::errors::{AppError, AppResult};

const SELECT_COLUMNS: &str =
    "id, name, code, parent_id, level, sort, description, status, created_at, updated_at";

/// Row shape shared by every SELECT in this backend
#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    code: String,
    parent_id: i64,
    level: i32,
    sort: i32,
    description: Option<String>,
    status: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            code: row.code,
            parent_id: row.parent_id,
            level: row.level,
            sort: row.sort,
            description: row.description,
            status: CategoryStatus::from(row.status),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Executor the store issues statements against.
#[derive(Clone)]
enum SqlConn {
    Pool(PgPool),
    Tx(Arc<Mutex<Transaction<'static, Postgres>>>),
}

/// Dispatch a query body onto the pool or the bound transaction.
macro_rules! with_executor {
    ($self:ident, $ex:ident => $body:expr) => {
        match &$self.conn {
            SqlConn::Pool(pool) => {
                let $ex = pool;
                $body
            }
            SqlConn::Tx(txn) => {
                let mut guard = txn.lock().await;
                let $ex = &mut **guard;
                $body
            }
        }
    };
}

/// Raw sqlx implementation of the category repository
#[derive(Clone)]
pub struct CategorySqlStore {
    conn: SqlConn,
}

impl CategorySqlStore {
    /// Create new repository instance
    pub fn new(pool: PgPool) -> Self {
        Self {
            conn: SqlConn::Pool(pool),
        }
    }

    async fn insert_on<'e, E>(ex: E, mut data: Category) -> AppResult<Category>
    where
        E: PgExecutor<'e>,
    {
        let now = Utc::now();
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO categories \
             (name, code, parent_id, level, sort, description, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING id",
        )
        .bind(&data.name)
        .bind(&data.code)
        .bind(data.parent_id)
        .bind(data.level)
        .bind(data.sort)
        .bind(&data.description)
        .bind(i16::from(data.status))
        .bind(now)
        .bind(now)
        .fetch_one(ex)
        .await
        .map_err(map_write_err)?;

        data.id = id;
        data.created_at = now;
        data.updated_at = now;
        Ok(data)
    }

    async fn find_one_on<'e, E>(ex: E, id: i64) -> AppResult<Category>
    where
        E: PgExecutor<'e>,
    {
        let row: Option<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {} FROM categories WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(ex)
        .await
        .map_err(AppError::Sql)?;

        row.map(Category::from).ok_or(AppError::NotFound)
    }

    async fn find_by_code_on<'e, E>(ex: E, code: &str) -> AppResult<Option<Category>>
    where
        E: PgExecutor<'e>,
    {
        let row: Option<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {} FROM categories WHERE code = $1",
            SELECT_COLUMNS
        ))
        .bind(code)
        .fetch_optional(ex)
        .await
        .map_err(AppError::Sql)?;

        Ok(row.map(Category::from))
    }

    async fn update_on<'e, E>(ex: E, data: Category) -> AppResult<()>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE categories \
             SET name = $1, code = $2, parent_id = $3, level = $4, sort = $5, \
                 description = $6, status = $7, updated_at = $8 \
             WHERE id = $9",
        )
        .bind(&data.name)
        .bind(&data.code)
        .bind(data.parent_id)
        .bind(data.level)
        .bind(data.sort)
        .bind(&data.description)
        .bind(i16::from(data.status))
        .bind(Utc::now())
        .bind(data.id)
        .execute(ex)
        .await
        .map_err(map_write_err)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn delete_on<'e, E>(ex: E, id: i64) -> AppResult<()>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(ex)
            .await
            .map_err(AppError::Sql)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn find_all_on<'e, E>(ex: E) -> AppResult<Vec<Category>>
    where
        E: PgExecutor<'e>,
    {
        let rows: Vec<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {} FROM categories WHERE status = $1 ORDER BY sort ASC, id ASC",
            SELECT_COLUMNS
        ))
        .bind(STATUS_ENABLED)
        .fetch_all(ex)
        .await
        .map_err(AppError::Sql)?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_by_parent_id_on<'e, E>(ex: E, parent_id: i64) -> AppResult<Vec<Category>>
    where
        E: PgExecutor<'e>,
    {
        let rows: Vec<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {} FROM categories WHERE parent_id = $1 ORDER BY sort ASC, id ASC",
            SELECT_COLUMNS
        ))
        .bind(parent_id)
        .fetch_all(ex)
        .await
        .map_err(AppError::Sql)?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn count_on<'e, E>(ex: E) -> AppResult<u64>
    where
        E: PgExecutor<'e>,
    {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(ex)
            .await
            .map_err(AppError::Sql)?;

        Ok(total as u64)
    }

    async fn page_on<'e, E>(ex: E, page: u64, page_size: u64) -> AppResult<Vec<Category>>
    where
        E: PgExecutor<'e>,
    {
        let offset = page.saturating_sub(1) * page_size;
        let rows: Vec<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {} FROM categories ORDER BY sort ASC, id ASC LIMIT $1 OFFSET $2",
            SELECT_COLUMNS
        ))
        .bind(page_size as i64)
        .bind(offset as i64)
        .fetch_all(ex)
        .await
        .map_err(AppError::Sql)?;

        Ok(rows.into_iter().map(Category::from).collect())
    }
}

#[async_trait]
impl CategoryRepository for CategorySqlStore {
    async fn insert(&self, category: Category) -> AppResult<Category> {
        with_executor!(self, ex => Self::insert_on(ex, category).await)
    }

    async fn find_one(&self, id: i64) -> AppResult<Category> {
        with_executor!(self, ex => Self::find_one_on(ex, id).await)
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Category>> {
        with_executor!(self, ex => Self::find_by_code_on(ex, code).await)
    }

    async fn update(&self, category: Category) -> AppResult<()> {
        with_executor!(self, ex => Self::update_on(ex, category).await)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        with_executor!(self, ex => Self::delete_on(ex, id).await)
    }

    async fn find_all(&self) -> AppResult<Vec<Category>> {
        with_executor!(self, ex => Self::find_all_on(ex).await)
    }

    async fn find_by_parent_id(&self, parent_id: i64) -> AppResult<Vec<Category>> {
        with_executor!(self, ex => Self::find_by_parent_id_on(ex, parent_id).await)
    }

    async fn list(&self, page: u64, page_size: u64) -> AppResult<(Vec<Category>, u64)> {
        // Two statements share one executor scope
        match &self.conn {
            SqlConn::Pool(pool) => {
                let total = Self::count_on(pool).await?;
                let rows = Self::page_on(pool, page, page_size).await?;
                Ok((rows, total))
            }
            SqlConn::Tx(txn) => {
                let mut guard = txn.lock().await;
                let conn = &mut **guard;
                let total = Self::count_on(&mut *conn).await?;
                let rows = Self::page_on(&mut *conn, page, page_size).await?;
                Ok((rows, total))
            }
        }
    }

    fn with_tx(&self, tx: &TxHandle) -> Arc<dyn CategoryRepository> {
        match tx {
            TxHandle::Sql(txn) => Arc::new(Self {
                conn: SqlConn::Tx(txn.clone()),
            }),
            // Foreign handle: hand back the receiver unchanged
            _ => Arc::new(self.clone()),
        }
    }

    async fn trans(&self, f: TransFn) -> AppResult<()> {
        let pool = match &self.conn {
            SqlConn::Pool(pool) => pool.clone(),
            SqlConn::Tx(_) => {
                return Err(AppError::internal("nested transactions are not supported"))
            }
        };

        let txn = Arc::new(Mutex::new(pool.begin().await.map_err(AppError::Sql)?));
        let scoped: Arc<dyn CategoryRepository> = Arc::new(Self {
            conn: SqlConn::Tx(txn.clone()),
        });

        let result = f(scoped).await;

        // The callback future owned the only other clone of the handle.
        let txn = Arc::try_unwrap(txn)
            .map_err(|_| AppError::internal("transaction handle escaped its scope"))?
            .into_inner();

        match result {
            Ok(()) => txn.commit().await.map_err(AppError::Sql),
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(err)
            }
        }
    }
}

/// Map driver write failures, surfacing unique-key collisions as conflicts.
fn map_write_err(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::already_exists("Category code")
        }
        _ => AppError::Sql(err),
    }
}
