//! # Registrar DB
//!
//! Database pool and storage helpers for the Registrar API.
//!
//! - [`init_db_pool`]: builds the PostgreSQL pool from [`DatabaseConfig`]
//! - [`prepare_schema`]: applies migrations, dropping everything first when
//!   `DATABASE_DROP_ON_START` is set
//! - [`lookup`]: row-locking existence lookup for bulk batches
//! - [`cascade`]: deletes driven by the relation table in `registrar_core`
//!
//! The pool is created once at startup and handed to the application state;
//! nothing here keeps global state.
//!
//! # Example
//!
//! ```ignore
//! use registrar_config::DatabaseConfig;
//! use registrar_db::{init_db_pool, prepare_schema};
//!
//! let config = DatabaseConfig::from_env()?;
//! let pool = init_db_pool(&config).await?;
//! prepare_schema(&pool, config.drop_on_start).await?;
//! ```

pub mod cascade;
pub mod lookup;

use registrar_config::DatabaseConfig;
use registrar_core::AppError;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

pub use cascade::{delete_batch, delete_cascading, delete_cascading_with};
pub use lookup::{RowLookup, ensure_exists, ensure_present};

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Initializes a PostgreSQL connection pool.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
}

/// Brings the schema up to date.
///
/// With `drop_on_start` the `public` schema is dropped and recreated first,
/// which discards every table and row.
pub async fn prepare_schema(pool: &PgPool, drop_on_start: bool) -> Result<(), MigrateError> {
    if drop_on_start {
        warn!("Dropping existing tables. DATABASE_DROP_ON_START=true");
        sqlx::query("DROP SCHEMA IF EXISTS public CASCADE")
            .execute(pool)
            .await?;
        sqlx::query("CREATE SCHEMA public").execute(pool).await?;
    }

    MIGRATOR.run(pool).await?;
    info!("Database schema is up to date");
    Ok(())
}

/// Maps a unique-constraint violation to 409 and anything else to 500.
pub fn conflict_on_unique(err: sqlx::Error, message: impl FnOnce() -> String) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::conflict(message());
        }
    }
    AppError::database(err)
}
