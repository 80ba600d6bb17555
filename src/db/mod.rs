use async_trait::async_trait;
use mongodb::bson::{Bson, Document};

use crate::error::StoreError;

#[cfg(test)]
pub mod memory;
pub mod mongo;

pub use mongo::Database;

/// Data access for the song collection. Documents are matched on their
/// integer `id` field, not the store-assigned `_id`.
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Drops the collection and bulk-inserts `songs`. Returns the inserted count.
    async fn replace_all(&self, songs: Vec<Document>) -> Result<u64, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    async fn find_all(&self) -> Result<Vec<Document>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, StoreError>;

    async fn exists(&self, id: i64) -> Result<bool, StoreError>;

    /// Inserts the document as given and returns its `_id`, store-assigned
    /// unless the caller supplied one.
    async fn insert(&self, song: Document) -> Result<Bson, StoreError>;

    /// `$set`-merges `fields` onto the first document with a matching id.
    /// Returns the number of documents actually modified, so a no-op write
    /// reports 0 just like a missing document.
    async fn set_fields(&self, id: i64, fields: Document) -> Result<u64, StoreError>;

    /// Deletes at most one matching document. Returns the deleted count.
    async fn delete(&self, id: i64) -> Result<u64, StoreError>;
}
