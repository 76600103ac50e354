//! Recommendation stores
//!
//! A store holds place records keyed by identity (`placeName|address`) and
//! supports two operations: list everything, and append a reason to a place
//! (creating the place on first submission).

use async_trait::async_trait;
use placerec_common::config::StoreBackend;
use placerec_common::{Place, PlaceListing, Result, Submission};
use std::path::Path;
use std::sync::Arc;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Storage contract shared by all backends
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Backend identifier ("memory", "sqlite")
    fn backend(&self) -> &'static str;

    /// All place records in first-submission order
    async fn list(&self) -> Result<PlaceListing>;

    /// Append the submission's reason to its place, creating the place if the
    /// identity key is new. Returns the updated record.
    async fn upsert_reason(&self, submission: Submission) -> Result<Place>;

    /// Release backend resources. Called once after the server stops
    /// accepting requests.
    async fn close(&self);
}

/// Shared handle used by the HTTP layer
pub type SharedStore = Arc<dyn RecommendationStore>;

/// Open the configured backend
///
/// `db_path` is only used by the SQLite backend.
pub async fn open_store(backend: StoreBackend, db_path: &Path) -> Result<SharedStore> {
    let store: SharedStore = match backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Sqlite => Arc::new(SqliteStore::open(db_path).await?),
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_store_selects_backend() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("recommendations.db");

        let memory = open_store(StoreBackend::Memory, &db_path).await.unwrap();
        assert_eq!(memory.backend(), "memory");
        assert!(!db_path.exists(), "memory backend must not touch the database");

        let sqlite = open_store(StoreBackend::Sqlite, &db_path).await.unwrap();
        assert_eq!(sqlite.backend(), "sqlite");
        assert!(db_path.exists());
        sqlite.close().await;
    }
}
