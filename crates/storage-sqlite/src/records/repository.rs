use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use serde_json::Value;

use sectorwatch_core::records::{merge_fields, Document, MergeWrite, RecordStoreTrait};
use sectorwatch_core::Result;

use super::model::DocumentDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::documents;

pub struct SqliteRecordStore {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SqliteRecordStore {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SqliteRecordStore { pool, writer }
    }

    /// When the document was last merged, if it exists.
    pub fn updated_at(&self, collection: &str, id: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        let stamp = documents::table
            .find((collection, id))
            .select(documents::updated_at)
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(stamp)
    }
}

fn parse_document(collection: &str, id: &str, raw: &str) -> std::result::Result<Document, StorageError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(document) => Ok(document),
        other => Err(StorageError::CorruptDocument {
            collection: collection.to_string(),
            id: id.to_string(),
            message: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read-merge-write one document on the writer's connection.
fn merge_one(
    conn: &mut SqliteConnection,
    collection: &str,
    write: MergeWrite,
    stamp: &str,
) -> std::result::Result<(), StorageError> {
    let existing = documents::table
        .find((collection, write.id.as_str()))
        .select(documents::data)
        .first::<String>(conn)
        .optional()?;

    let mut document = match existing {
        Some(raw) => parse_document(collection, &write.id, &raw)?,
        None => Document::new(),
    };
    merge_fields(&mut document, &write.fields);

    let row = DocumentDB {
        collection: collection.to_string(),
        id: write.id,
        data: serde_json::to_string(&document)?,
        updated_at: stamp.to_string(),
    };

    diesel::insert_into(documents::table)
        .values(&row)
        .on_conflict((documents::collection, documents::id))
        .do_update()
        .set((
            documents::data.eq(&row.data),
            documents::updated_at.eq(&row.updated_at),
        ))
        .execute(conn)?;

    Ok(())
}

#[async_trait]
impl RecordStoreTrait for SqliteRecordStore {
    async fn merge_set_batch(&self, collection: &str, writes: Vec<MergeWrite>) -> Result<usize> {
        let collection = collection.to_string();
        let count = writes.len();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let stamp = Utc::now().to_rfc3339();
                for write in writes {
                    merge_one(conn, &collection, write, &stamp)?;
                }
                debug!("Merged {} documents into '{}'", count, collection);
                Ok(count)
            })
            .await
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let mut conn = get_connection(&self.pool)?;
        let raw = documents::table
            .find((collection, id))
            .select(documents::data)
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        match raw {
            Some(raw) => Ok(Some(parse_document(collection, id, &raw)?)),
            None => Ok(None),
        }
    }

    fn list_ids(&self, collection: &str) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        let ids = documents::table
            .filter(documents::collection.eq(collection))
            .select(documents::id)
            .order(documents::id.asc())
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use serde_json::json;
    use tempfile::tempdir;

    async fn create_test_store() -> (SqliteRecordStore, Arc<DbPool>, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let pool = create_pool(&db_path_str).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());

        (SqliteRecordStore::new(Arc::clone(&pool), writer), pool, temp_dir)
    }

    fn write(id: &str, value: Value) -> MergeWrite {
        MergeWrite::new(id, value.as_object().cloned().unwrap())
    }

    #[tokio::test]
    async fn test_merge_creates_and_preserves_fields() {
        let (store, _pool, _dir) = create_test_store().await;

        store
            .merge_set_batch(
                "sector_analytics",
                vec![write("Energy", json!({"preview_summary": "Oil up.", "pe_today": 9.0}))],
            )
            .await
            .unwrap();
        store
            .merge_set_batch(
                "sector_analytics",
                vec![write("Energy", json!({"pe_today": 11.0, "market_breadth_pct": 50.0}))],
            )
            .await
            .unwrap();

        let document = store.get("sector_analytics", "Energy").unwrap().unwrap();
        assert_eq!(
            Value::Object(document),
            json!({"preview_summary": "Oil up.", "pe_today": 11.0, "market_breadth_pct": 50.0})
        );
    }

    #[tokio::test]
    async fn test_repeated_merge_leaves_document_unchanged() {
        let (store, _pool, _dir) = create_test_store().await;
        let patch = json!({"top_stocks": [{"symbol": "XOM", "marketCap": 4.5e11}]});

        store
            .merge_set_batch("sector_analytics", vec![write("Energy", patch.clone())])
            .await
            .unwrap();
        let once = store.get("sector_analytics", "Energy").unwrap();
        store
            .merge_set_batch("sector_analytics", vec![write("Energy", patch)])
            .await
            .unwrap();
        let twice = store.get("sector_analytics", "Energy").unwrap();

        assert_eq!(once, twice);
        assert!(store
            .updated_at("sector_analytics", "Energy")
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let (store, pool, _dir) = create_test_store().await;
        {
            let mut conn = get_connection(&pool).unwrap();
            diesel::sql_query(
                "INSERT INTO documents (collection, id, data, updated_at) \
                 VALUES ('sector_analytics', 'Broken', '[1, 2]', '2024-01-01T00:00:00Z')",
            )
            .execute(&mut conn)
            .unwrap();
        }

        let result = store
            .merge_set_batch(
                "sector_analytics",
                vec![
                    write("Energy", json!({"pe_today": 11.0})),
                    write("Broken", json!({"pe_today": 12.0})),
                ],
            )
            .await;

        match result {
            Err(sectorwatch_core::Error::Serialization(message)) => {
                assert!(message.contains("sector_analytics/Broken"))
            }
            other => panic!("expected a serialization error, got {:?}", other),
        }
        assert!(store.get("sector_analytics", "Energy").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_ids_is_sorted_and_scoped() {
        let (store, _pool, _dir) = create_test_store().await;

        store
            .merge_set_batch(
                "sector_analytics",
                vec![
                    write("Utilities", json!({})),
                    write("Energy", json!({})),
                ],
            )
            .await
            .unwrap();
        store
            .merge_set_batch("sp500_symbols", vec![write("XOM", json!({"sector": "Energy"}))])
            .await
            .unwrap();

        assert_eq!(
            store.list_ids("sector_analytics").unwrap(),
            vec!["Energy", "Utilities"]
        );
        assert_eq!(store.list_ids("sp500_symbols").unwrap(), vec!["XOM"]);
        assert!(store.get("sp500_symbols", "Energy").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_no_op() {
        let (store, _pool, _dir) = create_test_store().await;

        let count = store
            .merge_set_batch("sector_analytics", Vec::new())
            .await
            .unwrap();

        assert_eq!(count, 0);
        assert!(store.list_ids("sector_analytics").unwrap().is_empty());
    }
}
