//! SQLite-based store using `SeaORM`.
//!
//! A single `SqliteStore` implements `CompanyRepository`,
//! `CandidateRepository` and `DocumentRepository` against one local
//! database file. The schema is migrated when the store is opened.

mod candidate_repo;
mod company_repo;
mod document_repo;
pub(crate) mod entity;
mod migration;

use std::path::Path;

use sea_orm::{Database, DatabaseConnection, DbErr, SqlErr};
use sea_orm_migration::MigratorTrait;
use workdoc_core::error::{CoreError, CoreResult};

use migration::Migrator;

/// SQLite-based store for companies, the subdomain pool and documents.
pub struct SqliteStore {
    /// Shared `SeaORM` database connection.
    pub(crate) db: DatabaseConnection,
}

impl SqliteStore {
    /// Open (or create) the database at `db_path` and migrate it.
    ///
    /// # Errors
    /// Returns `CoreError::StorageError` if directory creation, database
    /// connection, or schema migration fails.
    pub async fn new(db_path: &Path) -> CoreResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::StorageError(format!("Failed to create directory: {e}")))?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let db = Database::connect(&db_url)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to connect to SQLite: {e}")))?;

        Migrator::up(&db, None)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to run migrations: {e}")))?;

        log::debug!("Opened SQLite store at {}", db_path.display());
        Ok(Self { db })
    }
}

/// Whether the error is a unique constraint violation.
fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn storage_error(action: &str, err: &DbErr) -> CoreError {
    CoreError::StorageError(format!("Failed to {action}: {err}"))
}

fn parse_timestamp(field: &str, value: &str) -> CoreResult<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| CoreError::SerializationError(format!("Invalid {field}: {e}")))
}
