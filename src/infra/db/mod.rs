//! Database connection and initialization.
//!
//! Bootstrap produces both candidate connections for the backend
//! selector: the SeaORM mapping-layer connection and a raw sqlx pool.
//! Either may be absent; deciding what that means is the selector's job.

use sea_orm::{ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;
use crate::errors::{AppError, AppResult};

pub mod migrations;

pub use migrations::Migrator;

/// Maximum connections held by the raw sqlx pool
const SQL_POOL_MAX_CONNECTIONS: u32 = 5;

/// Database wrapper holding the candidate connections
#[derive(Clone)]
pub struct Database {
    orm: Option<DatabaseConnection>,
    pool: Option<PgPool>,
    orm_failure: Option<String>,
}

impl Database {
    /// Initialize both candidate connections and run migrations.
    ///
    /// A failed mapping-layer connection is recorded, not fatal; the
    /// selector may still run on the raw pool. Whether the process can
    /// start with neither connection is the selector's decision.
    pub async fn connect(config: &Config) -> Self {
        let (orm, orm_failure) = match SeaDatabase::connect(&config.database_url).await {
            Ok(connection) => {
                if let Err(e) = Migrator::up(&connection, None).await {
                    tracing::error!("Failed to run migrations: {}", e);
                    (None, Some(format!("migrations failed: {}", e)))
                } else {
                    tracing::info!("Database connected and migrations applied");
                    (Some(connection), None)
                }
            }
            Err(e) => (None, Some(e.to_string())),
        };

        let pool = match PgPoolOptions::new()
            .max_connections(SQL_POOL_MAX_CONNECTIONS)
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                tracing::error!("Direct SQL pool unavailable: {}", e);
                None
            }
        };

        Self {
            orm,
            pool,
            orm_failure,
        }
    }

    /// Connect the mapping layer only, without running migrations
    /// (for CLI commands that manage migrations manually).
    pub async fn connect_without_migrations(config: &Config) -> Result<Self, DbErr> {
        let connection = SeaDatabase::connect(&config.database_url).await?;
        Ok(Self {
            orm: Some(connection),
            pool: None,
            orm_failure: None,
        })
    }

    /// Get the mapping-layer candidate connection.
    pub fn orm(&self) -> Option<DatabaseConnection> {
        self.orm.clone()
    }

    /// Get the direct-SQL candidate connection.
    pub fn pool(&self) -> Option<PgPool> {
        self.pool.clone()
    }

    /// Why the mapping-layer connection is absent, when it is.
    pub fn orm_failure(&self) -> Option<&str> {
        self.orm_failure.as_deref()
    }

    fn require_orm(&self) -> AppResult<&DatabaseConnection> {
        self.orm
            .as_ref()
            .ok_or_else(|| AppError::internal("mapping-layer connection is not available"))
    }

    /// Run pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(self.require_orm()?, None)
            .await
            .map_err(AppError::from)
    }

    /// Rollback the last migration.
    pub async fn rollback_migration(&self) -> AppResult<()> {
        Migrator::down(self.require_orm()?, Some(1))
            .await
            .map_err(AppError::from)
    }

    /// Get migration status (list all migrations with applied status).
    pub async fn migration_status(&self) -> AppResult<Vec<(String, bool)>> {
        use sea_orm::{EntityTrait, QueryOrder};
        use sea_orm_migration::seaql_migrations;

        let connection = self.require_orm()?;

        // Get applied migrations from database
        let applied: std::collections::HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(connection)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        // Map all defined migrations with their applied status
        let migrations: Vec<(String, bool)> = Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect();

        Ok(migrations)
    }

    /// Reset database and run all migrations fresh.
    pub async fn fresh_migrations(&self) -> AppResult<()> {
        Migrator::fresh(self.require_orm()?)
            .await
            .map_err(AppError::from)
    }

    /// Check database connectivity on whichever connection is present.
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(connection) = &self.orm {
            connection
                .execute(Statement::from_string(
                    connection.get_database_backend(),
                    "SELECT 1".to_string(),
                ))
                .await?;
            return Ok(());
        }

        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
            return Ok(());
        }

        Err(AppError::internal("no database connection available"))
    }
}
