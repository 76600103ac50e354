//! Database initialization
//!
//! Opens (creating if needed) the single SQLite file that backs the
//! persistent store and makes sure the schema exists.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// How long a connection waits on a locked database before failing
pub const BUSY_TIMEOUT_MS: u64 = 5000;

const MAX_CONNECTIONS: u32 = 5;

/// Open the database file and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // WAL lets GET aggregation read while a POST is writing
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS));

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_recommendations_table(&pool).await?;

    Ok(pool)
}

/// Create the recommendations table
///
/// One row per submitted reason. Place records are aggregated at read time
/// by grouping on the identity key `place_name || '|' || address`.
pub async fn create_recommendations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS recommendations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            place_name TEXT NOT NULL,
            address TEXT NOT NULL DEFAULT '',
            x REAL,
            y REAL,
            reason TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_recommendations_place_key ON recommendations(place_name || '|' || address)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_database_creates_file_and_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("recommendations.db");

        let pool = init_database(&db_path).await.unwrap();
        assert!(db_path.exists());

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type='table' AND name = 'recommendations'",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(tables, vec!["recommendations".to_string()]);

        pool.close().await;
    }

    #[tokio::test]
    async fn test_init_database_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("recommendations.db");

        let pool = init_database(&db_path).await.unwrap();
        sqlx::query("INSERT INTO recommendations (place_name, reason) VALUES ('Cafe A', 'quiet')")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;

        // Reopening must keep existing rows
        let pool = init_database(&db_path).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recommendations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let address: String = sqlx::query_scalar("SELECT address FROM recommendations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(address, "");

        pool.close().await;
    }
}
