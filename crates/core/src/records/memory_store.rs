use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::errors::{Error, Result};
use crate::records::records_model::{merge_fields, Document, MergeWrite};
use crate::records::records_traits::RecordStoreTrait;

type Collections = HashMap<String, BTreeMap<String, Document>>;

/// Process-local store for dry runs and tests.
#[derive(Default)]
pub struct InMemoryRecordStore {
    collections: RwLock<Collections>,
    fail_writes: AtomicBool,
    batches: AtomicUsize,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every following batch with `Error::Persistence`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of committed batches.
    pub fn batch_count(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }

    /// Seed a document as if an outside writer had stored it.
    pub fn insert(&self, collection: &str, id: &str, document: Document) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| Error::Unexpected("record store lock poisoned".to_string()))?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }
}

#[async_trait]
impl RecordStoreTrait for InMemoryRecordStore {
    async fn merge_set_batch(&self, collection: &str, writes: Vec<MergeWrite>) -> Result<usize> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Persistence(format!(
                "batch of {} rejected for '{}'",
                writes.len(),
                collection
            )));
        }

        let mut collections = self
            .collections
            .write()
            .map_err(|_| Error::Unexpected("record store lock poisoned".to_string()))?;
        let documents = collections.entry(collection.to_string()).or_default();

        let count = writes.len();
        for write in writes {
            merge_fields(documents.entry(write.id).or_default(), &write.fields);
        }
        self.batches.fetch_add(1, Ordering::SeqCst);
        Ok(count)
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| Error::Unexpected("record store lock poisoned".to_string()))?;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    fn list_ids(&self, collection: &str) -> Result<Vec<String>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| Error::Unexpected("record store lock poisoned".to_string()))?;
        Ok(collections
            .get(collection)
            .map(|documents| documents.keys().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn fields(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_merge_creates_then_merges() {
        let store = InMemoryRecordStore::new();
        store
            .merge_set_batch(
                "sector_analytics",
                vec![MergeWrite::new("Energy", fields(json!({"pe_today": 20.0})))],
            )
            .await
            .unwrap();
        store
            .merge_set_batch(
                "sector_analytics",
                vec![MergeWrite::new(
                    "Energy",
                    fields(json!({"market_breadth_pct": 55.0})),
                )],
            )
            .await
            .unwrap();

        let document = store.get("sector_analytics", "Energy").unwrap().unwrap();
        assert_eq!(
            Value::Object(document),
            json!({"pe_today": 20.0, "market_breadth_pct": 55.0})
        );
        assert_eq!(store.batch_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_batch_changes_nothing() {
        let store = InMemoryRecordStore::new();
        store.set_fail_writes(true);

        let result = store
            .merge_set_batch(
                "sector_analytics",
                vec![MergeWrite::new("Energy", fields(json!({"pe_today": 20.0})))],
            )
            .await;

        assert!(matches!(result, Err(Error::Persistence(_))));
        assert!(store.list_ids("sector_analytics").unwrap().is_empty());
    }

    #[test]
    fn test_list_ids_is_sorted_and_scoped() {
        let store = InMemoryRecordStore::new();
        store.insert("a", "Utilities", Document::new()).unwrap();
        store.insert("a", "Energy", Document::new()).unwrap();
        store.insert("b", "Other", Document::new()).unwrap();

        assert_eq!(store.list_ids("a").unwrap(), vec!["Energy", "Utilities"]);
        assert!(store.get("b", "Energy").unwrap().is_none());
    }
}
