//! In-memory store
//!
//! Records live for the lifetime of the process. Appends happen under a
//! single write lock, so concurrent submissions for the same place never lose
//! a reason.

use async_trait::async_trait;
use placerec_common::{Place, PlaceListing, Result, Submission};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::RecommendationStore;

#[derive(Debug, Default)]
struct Records {
    /// Places in first-submission order
    places: Vec<Place>,
    /// Identity key -> index into `places`
    index: HashMap<String, usize>,
}

/// Process-memory backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecommendationStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<PlaceListing> {
        let records = self.records.read().await;
        Ok(PlaceListing::new(records.places.clone()))
    }

    async fn upsert_reason(&self, submission: Submission) -> Result<Place> {
        let key = submission.key();
        let mut records = self.records.write().await;

        let existing = records.index.get(&key).copied();
        let slot = match existing {
            Some(slot) => slot,
            None => {
                let slot = records.places.len();
                records.places.push(Place::from_submission(&submission));
                records.index.insert(key.clone(), slot);
                debug!(key = %key, "Created place record");
                slot
            }
        };

        let place = &mut records.places[slot];
        place.reasons.push(submission.reason().to_string());
        Ok(place.clone())
    }

    async fn close(&self) {
        let records = self.records.read().await;
        info!(
            places = records.places.len(),
            "Memory store closed; records are discarded with the process"
        );
    }
}
