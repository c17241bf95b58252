//! Object-relational mapping backend for the category repository.
//!
//! Preferred backend: all statements go through SeaORM query builders.
//! Behavior must stay identical to the direct-SQL backend; only the
//! driver mechanics differ.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, SqlErr, TransactionTrait,
};

use super::category_repository::{CategoryRepository, TransFn, TxHandle};
use super::entities::category::{self, ActiveModel, Entity as CategoryEntity};
use crate::config::STATUS_ENABLED;
use crate::domain::Category;
use crate::errors::{AppError, AppResult};

/// Connection the store issues statements against.
#[derive(Clone)]
enum OrmConn {
    Pool(DatabaseConnection),
    Tx(Arc<DatabaseTransaction>),
}

/// Dispatch a query body onto the pooled connection or the bound transaction.
macro_rules! with_conn {
    ($self:ident, $conn:ident => $body:expr) => {
        match &$self.conn {
            OrmConn::Pool($conn) => $body,
            OrmConn::Tx(txn) => {
                let $conn = txn.as_ref();
                $body
            }
        }
    };
}

/// SeaORM implementation of the category repository
#[derive(Clone)]
pub struct CategoryOrmStore {
    conn: OrmConn,
}

impl CategoryOrmStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            conn: OrmConn::Pool(db),
        }
    }

    async fn insert_on<C: ConnectionTrait>(conn: &C, data: Category) -> AppResult<Category> {
        let now = Utc::now();
        let active = ActiveModel {
            id: NotSet,
            name: Set(data.name),
            code: Set(data.code),
            parent_id: Set(data.parent_id),
            level: Set(data.level),
            sort: Set(data.sort),
            description: Set(data.description),
            status: Set(data.status.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(conn).await.map_err(map_write_err)?;
        Ok(Category::from(model))
    }

    async fn find_one_on<C: ConnectionTrait>(conn: &C, id: i64) -> AppResult<Category> {
        CategoryEntity::find_by_id(id)
            .one(conn)
            .await
            .map_err(AppError::from)?
            .map(Category::from)
            .ok_or(AppError::NotFound)
    }

    async fn find_by_code_on<C: ConnectionTrait>(
        conn: &C,
        code: &str,
    ) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find()
            .filter(category::Column::Code.eq(code))
            .one(conn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Category::from))
    }

    async fn update_on<C: ConnectionTrait>(conn: &C, data: Category) -> AppResult<()> {
        let active = ActiveModel {
            id: Set(data.id),
            name: Set(data.name),
            code: Set(data.code),
            parent_id: Set(data.parent_id),
            level: Set(data.level),
            sort: Set(data.sort),
            description: Set(data.description),
            status: Set(data.status.into()),
            created_at: NotSet,
            updated_at: Set(Utc::now()),
        };

        match active.update(conn).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(AppError::NotFound),
            Err(err) => Err(map_write_err(err)),
        }
    }

    async fn delete_on<C: ConnectionTrait>(conn: &C, id: i64) -> AppResult<()> {
        let result = CategoryEntity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn find_all_on<C: ConnectionTrait>(conn: &C) -> AppResult<Vec<Category>> {
        let models = CategoryEntity::find()
            .filter(category::Column::Status.eq(STATUS_ENABLED))
            .order_by_asc(category::Column::Sort)
            .order_by_asc(category::Column::Id)
            .all(conn)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn find_by_parent_id_on<C: ConnectionTrait>(
        conn: &C,
        parent_id: i64,
    ) -> AppResult<Vec<Category>> {
        let models = CategoryEntity::find()
            .filter(category::Column::ParentId.eq(parent_id))
            .order_by_asc(category::Column::Sort)
            .order_by_asc(category::Column::Id)
            .all(conn)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn list_on<C: ConnectionTrait>(
        conn: &C,
        page: u64,
        page_size: u64,
    ) -> AppResult<(Vec<Category>, u64)> {
        let total = CategoryEntity::find()
            .count(conn)
            .await
            .map_err(AppError::from)?;

        let offset = page.saturating_sub(1) * page_size;
        let models = CategoryEntity::find()
            .order_by_asc(category::Column::Sort)
            .order_by_asc(category::Column::Id)
            .offset(offset)
            .limit(page_size)
            .all(conn)
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Category::from).collect(), total))
    }
}

#[async_trait]
impl CategoryRepository for CategoryOrmStore {
    async fn insert(&self, category: Category) -> AppResult<Category> {
        with_conn!(self, conn => Self::insert_on(conn, category).await)
    }

    async fn find_one(&self, id: i64) -> AppResult<Category> {
        with_conn!(self, conn => Self::find_one_on(conn, id).await)
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Category>> {
        with_conn!(self, conn => Self::find_by_code_on(conn, code).await)
    }

    async fn update(&self, category: Category) -> AppResult<()> {
        with_conn!(self, conn => Self::update_on(conn, category).await)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        with_conn!(self, conn => Self::delete_on(conn, id).await)
    }

    async fn find_all(&self) -> AppResult<Vec<Category>> {
        with_conn!(self, conn => Self::find_all_on(conn).await)
    }

    async fn find_by_parent_id(&self, parent_id: i64) -> AppResult<Vec<Category>> {
        with_conn!(self, conn => Self::find_by_parent_id_on(conn, parent_id).await)
    }

    async fn list(&self, page: u64, page_size: u64) -> AppResult<(Vec<Category>, u64)> {
        with_conn!(self, conn => Self::list_on(conn, page, page_size).await)
    }

    fn with_tx(&self, tx: &TxHandle) -> Arc<dyn CategoryRepository> {
        match tx {
            TxHandle::Orm(txn) => Arc::new(Self {
                conn: OrmConn::Tx(txn.clone()),
            }),
            // Foreign handle: hand back the receiver unchanged
            _ => Arc::new(self.clone()),
        }
    }

    async fn trans(&self, f: TransFn) -> AppResult<()> {
        let db = match &self.conn {
            OrmConn::Pool(db) => db.clone(),
            OrmConn::Tx(_) => {
                return Err(AppError::internal("nested transactions are not supported"))
            }
        };

        let txn = Arc::new(db.begin().await.map_err(AppError::Database)?);
        let scoped: Arc<dyn CategoryRepository> = Arc::new(Self {
            conn: OrmConn::Tx(txn.clone()),
        });

        let result = f(scoped).await;

        // The callback future owned the only other clone of the handle.
        let txn = Arc::try_unwrap(txn)
            .map_err(|_| AppError::internal("transaction handle escaped its scope"))?;

        match result {
            Ok(()) => txn.commit().await.map_err(AppError::Database),
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
fn map_write_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::already_exists("Category code"),
        _ => AppError::Database(err),
    }
}
