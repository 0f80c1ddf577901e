use async_trait::async_trait;

use crate::errors::Result;
use crate::records::records_model::{Document, MergeWrite};

/// Document store the pipeline persists into.
#[async_trait]
pub trait RecordStoreTrait: Send + Sync {
    /// Merge every write into its document, creating missing documents.
    ///
    /// All-or-nothing: on error no document in the batch has changed.
    /// Returns the number of documents written.
    async fn merge_set_batch(&self, collection: &str, writes: Vec<MergeWrite>) -> Result<usize>;

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    fn list_ids(&self, collection: &str) -> Result<Vec<String>>;
}
