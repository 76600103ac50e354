//! SQLite store
//!
//! One row per submitted reason. Place records are aggregated per request by
//! grouping rows on the identity key `place_name || '|' || address`, so two
//! pairs that join to the same key are one place, as in the memory store.
//! Reasons are collected with `json_group_array` so any reason text
//! round-trips verbatim.

use async_trait::async_trait;
use chrono::Utc;
use placerec_common::db::init_database;
use placerec_common::{Error, Place, PlaceListing, Result, Submission};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::path::Path;
use tracing::info;

use super::RecommendationStore;

/// Every place, name, address and coordinates taken from its first row,
/// in first-submission order
const LIST_PLACES_SQL: &str = r#"
    SELECT head.place_name, head.address, head.x, head.y, grouped.reasons
    FROM (
        SELECT MIN(id) AS first_id,
               json_group_array(reason ORDER BY id) AS reasons
        FROM recommendations
        GROUP BY place_name || '|' || address
    ) AS grouped
    JOIN recommendations AS head ON head.id = grouped.first_id
    ORDER BY grouped.first_id
"#;

/// Same aggregation restricted to one identity
const GET_PLACE_SQL: &str = r#"
    SELECT head.place_name, head.address, head.x, head.y, grouped.reasons
    FROM (
        SELECT MIN(id) AS first_id,
               json_group_array(reason ORDER BY id) AS reasons
        FROM recommendations
        WHERE place_name || '|' || address = ?
        GROUP BY place_name || '|' || address
    ) AS grouped
    JOIN recommendations AS head ON head.id = grouped.first_id
"#;

/// SQLite-backed store
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database file
    pub async fn open(db_path: &Path) -> Result<Self> {
        let pool = init_database(db_path).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn place_from_row(row: &SqliteRow) -> Result<Place> {
    let reasons: String = row.try_get("reasons")?;
    let reasons: Vec<String> = serde_json::from_str(&reasons)
        .map_err(|e| Error::Internal(format!("Failed to decode reasons: {}", e)))?;

    Ok(Place {
        place_name: row.try_get("place_name")?,
        address: row.try_get("address")?,
        x: row.try_get("x")?,
        y: row.try_get("y")?,
        reasons,
    })
}

#[async_trait]
impl RecommendationStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn list(&self) -> Result<PlaceListing> {
        let rows = sqlx::query(LIST_PLACES_SQL).fetch_all(&self.pool).await?;

        let places = rows
            .iter()
            .map(place_from_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(PlaceListing::new(places))
    }

    async fn upsert_reason(&self, submission: Submission) -> Result<Place> {
        let created_at = Utc::now().to_rfc3339();

        // Insert and read back in one transaction so a failed read leaves no row
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO recommendations (place_name, address, x, y, reason, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(submission.place_name())
        .bind(submission.address())
        .bind(submission.x())
        .bind(submission.y())
        .bind(submission.reason())
        .bind(&created_at)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query(GET_PLACE_SQL)
            .bind(submission.key())
            .fetch_one(&mut *tx)
            .await?;
        let place = place_from_row(&row)?;

        tx.commit().await?;

        Ok(place)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("SQLite store closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn open_temp_store() -> (TempDir, SqliteStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteStore::open(&temp_dir.path().join("recommendations.db"))
            .await
            .unwrap();
        (temp_dir, store)
    }

    fn submission(name: &str, address: &str, reason: &str) -> Submission {
        Submission::new(name, Some(address.to_string()), Some(10.0), Some(20.0), reason).unwrap()
    }

    #[tokio::test]
    async fn test_empty_database_lists_nothing() {
        let (_dir, store) = open_temp_store().await;
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_returns_aggregated_record() {
        let (_dir, store) = open_temp_store().await;

        let place = store
            .upsert_reason(submission("Cafe A", "123 Main St", "great coffee"))
            .await
            .unwrap();
        assert_eq!(place.place_name, "Cafe A");
        assert_eq!(place.address, "123 Main St");
        assert_eq!(place.x, Some(10.0));
        assert_eq!(place.y, Some(20.0));
        assert_eq!(place.reasons, vec!["great coffee"]);

        let place = store
            .upsert_reason(submission("Cafe A", "123 Main St", "quiet"))
            .await
            .unwrap();
        assert_eq!(place.reasons, vec!["great coffee", "quiet"]);
    }

    #[tokio::test]
    async fn test_one_row_per_reason() {
        let (_dir, store) = open_temp_store().await;

        for reason in ["a", "b", "c"] {
            store.upsert_reason(submission("Cafe A", "1 St", reason)).await.unwrap();
        }

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recommendations")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(rows, 3);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_keeps_first_submission_order() {
        let (_dir, store) = open_temp_store().await;

        store.upsert_reason(submission("Zeta", "", "a")).await.unwrap();
        store.upsert_reason(submission("Alpha", "", "b")).await.unwrap();
        store.upsert_reason(submission("Zeta", "", "c")).await.unwrap();

        let listing = store.list().await.unwrap();
        let keys: Vec<String> = listing.iter().map(|p| p.key()).collect();
        assert_eq!(keys, vec!["Zeta|", "Alpha|"]);
        assert_eq!(listing.get("Zeta|").unwrap().reasons, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_reasons_round_trip_verbatim() {
        let (_dir, store) = open_temp_store().await;
        let tricky = ["a|||b", "quote \" and comma ,", "맛있는 커피", "  padded  ", "[\"json\"]"];

        for reason in tricky {
            store.upsert_reason(submission("Cafe A", "1 St", reason)).await.unwrap();
        }

        let listing = store.list().await.unwrap();
        assert_eq!(listing.get("Cafe A|1 St").unwrap().reasons, tricky.to_vec());
    }

    #[tokio::test]
    async fn test_missing_coordinates_stay_null() {
        let (_dir, store) = open_temp_store().await;

        let place = store
            .upsert_reason(Submission::new("Cafe A", None, None, None, "quiet").unwrap())
            .await
            .unwrap();
        assert_eq!(place.address, "");
        assert!(place.x.is_none());
        assert!(place.y.is_none());
    }

    #[tokio::test]
    async fn test_pairs_joining_to_same_key_are_one_place() {
        let (_dir, store) = open_temp_store().await;

        store.upsert_reason(submission("a|b", "c", "one")).await.unwrap();
        let place = store.upsert_reason(submission("a", "b|c", "two")).await.unwrap();

        // First submission names the record
        assert_eq!(place.place_name, "a|b");
        assert_eq!(place.address, "c");
        assert_eq!(place.reasons, vec!["one", "two"]);

        let listing = store.list().await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing.get("a|b|c").unwrap().reasons, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("recommendations.db");

        let store = SqliteStore::open(&db_path).await.unwrap();
        store.upsert_reason(submission("Cafe A", "1 St", "great coffee")).await.unwrap();
        store.close().await;

        let store = SqliteStore::open(&db_path).await.unwrap();
        let place = store.upsert_reason(submission("Cafe A", "1 St", "quiet")).await.unwrap();
        assert_eq!(place.reasons, vec!["great coffee", "quiet"]);
        store.close().await;
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let (_dir, store) = open_temp_store().await;
        let store = Arc::new(store);

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .upsert_reason(submission("Cafe A", "1 St", &format!("reason {}", i)))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let listing = store.list().await.unwrap();
        assert_eq!(listing.get("Cafe A|1 St").unwrap().reasons.len(), 20);
    }

    #[tokio::test]
    async fn test_closed_store_reports_database_error() {
        let (_dir, store) = open_temp_store().await;
        store.close().await;

        let err = store.list().await.unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }
}
