use std::sync::Arc;

use roadmap_core::model::ProgressRecord;
use storage::{KeyValueStore, StorageError};
use tracing::{debug, warn};

/// Storage key of the serialized progress record.
pub const PROGRESS_KEY: &str = "prerequisiteRoadmapProgress";

/// Loads and saves the progress record as one JSON object.
#[derive(Clone)]
pub struct ProgressStore {
    kv: Arc<dyn KeyValueStore>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load the persisted record.
    ///
    /// Missing, unreadable or malformed state yields an empty record.
    pub async fn load(&self) -> ProgressRecord {
        self.try_load().await.unwrap_or_else(|err| {
            warn!(error = %err, "progress storage unavailable, starting empty");
            ProgressRecord::new()
        })
    }

    /// Load the persisted record, surfacing backend failures.
    ///
    /// Missing or malformed state still yields an empty record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend read fails.
    pub async fn try_load(&self) -> Result<ProgressRecord, StorageError> {
        Ok(self
            .kv
            .get(PROGRESS_KEY)
            .await?
            .map_or_else(ProgressRecord::new, |raw| parse_record(&raw)))
    }

    /// Overwrite the persisted record with `record`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the backend write fails.
    pub async fn save(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let raw = serde_json::to_string(record)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.kv.set(PROGRESS_KEY, &raw).await?;
        debug!(entries = record.len(), "progress saved");
        Ok(())
    }
}

/// Decode a stored progress document, substituting an empty record for
/// anything that is not a JSON object of booleans.
#[must_use]
pub fn parse_record(raw: &str) -> ProgressRecord {
    serde_json::from_str(raw).unwrap_or_else(|err| {
        warn!(error = %err, "discarding malformed progress record");
        ProgressRecord::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::InMemoryStore;

    fn store() -> (InMemoryStore, ProgressStore) {
        let kv = InMemoryStore::new();
        let store = ProgressStore::new(Arc::new(kv.clone()));
        (kv, store)
    }

    #[tokio::test]
    async fn load_without_state_is_empty() {
        let (_, store) = store();
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_json_loads_as_empty() {
        let (kv, store) = store();
        kv.set(PROGRESS_KEY, "{not json").await.unwrap();
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn wrong_shape_loads_as_empty() {
        let (kv, store) = store();
        for raw in ["null", "[true]", r#"{"Python_https://youtu.be/p": "yes"}"#, "42"] {
            kv.set(PROGRESS_KEY, raw).await.unwrap();
            assert!(store.load().await.is_empty(), "{raw} should load as empty");
        }
    }

    #[tokio::test]
    async fn try_load_treats_missing_and_malformed_as_empty() {
        let (kv, store) = store();
        assert!(store.try_load().await.unwrap().is_empty());
        kv.set(PROGRESS_KEY, "[]").await.unwrap();
        assert!(store.try_load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let (_, store) = store();
        let record = ProgressRecord::new()
            .with_completion("Linear Algebra", "https://youtu.be/v1", true)
            .with_completion("Deep_Learning", "https://youtu.be/d_1", true)
            .with_completion("Python", "https://youtu.be/p", false);

        store.save(&record).await.unwrap();
        assert_eq!(store.load().await, record);
    }

    #[tokio::test]
    async fn reads_records_written_with_plain_concatenated_keys() {
        let (kv, store) = store();
        kv.set(
            PROGRESS_KEY,
            r#"{"Linear Algebra_https://www.youtube.com/watch?v=fNk_zzaMoSs":true}"#,
        )
        .await
        .unwrap();
        let record = store.load().await;
        assert!(record.is_completed(
            "Linear Algebra",
            "https://www.youtube.com/watch?v=fNk_zzaMoSs"
        ));
    }
}
