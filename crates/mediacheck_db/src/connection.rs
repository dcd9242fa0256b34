//! Database connection management.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Read-only connection to the application database being audited.
#[derive(Debug, Clone)]
pub struct MediaDb {
    pool: SqlitePool,
}

impl MediaDb {
    /// Open an existing application database at the given path.
    ///
    /// The database is opened read-only and is never created: a missing file
    /// is reported as [`DbError::NotFound`].
    pub async fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(DbError::not_found("Database", path.display().to_string()));
        }

        info!("Opening application database: {}", path.display());

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false)
            .pragma("temp_store", "MEMORY");

        // Scans run one after another, a second connection would sit idle.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        debug!("Database connection established");

        Ok(Self { pool })
    }

    /// Open an in-memory database (for testing).
    pub async fn open_in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::new().filename(":memory:");

        let pool = SqlitePoolOptions::new()
            .max_connections(1) // In-memory must be single connection to share state
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Check if the database is healthy.
    pub async fn health_check(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = MediaDb::open_in_memory().await.unwrap();
        db.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MediaDb::open(dir.path().join("nope.sqlite3"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_open_is_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.sqlite3");

        // Seed a real file with a writable pool first.
        let seed = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(&path)
                    .create_if_missing(true),
            )
            .await
            .unwrap();
        sqlx::query("CREATE TABLE things (id INTEGER PRIMARY KEY, file TEXT)")
            .execute(&seed)
            .await
            .unwrap();
        sqlx::query("INSERT INTO things (file) VALUES ('a.png')")
            .execute(&seed)
            .await
            .unwrap();
        seed.close().await;

        let db = MediaDb::open(&path).await.unwrap();
        db.health_check().await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM things")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);

        let write = sqlx::query("INSERT INTO things (file) VALUES ('b.png')")
            .execute(db.pool())
            .await;
        assert!(write.is_err());

        db.close().await;
    }
}
