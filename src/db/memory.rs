use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use crate::db::SongStore;
use crate::error::StoreError;
use crate::models::song::song_id;

/// In-process stand-in for the MongoDB collection with the same matched /
/// modified counting rules.
#[derive(Default)]
pub struct MemoryStore {
    songs: RwLock<Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn with_object_id(song: Document) -> (Bson, Document) {
    if let Some(existing) = song.get("_id") {
        return (existing.clone(), song);
    }
    let oid = Bson::ObjectId(ObjectId::new());
    let mut stored = Document::new();
    stored.insert("_id", oid.clone());
    for (key, value) in song {
        stored.insert(key, value);
    }
    (oid, stored)
}

#[async_trait]
impl SongStore for MemoryStore {
    async fn replace_all(&self, songs: Vec<Document>) -> Result<u64, StoreError> {
        let mut stored = self.songs.write().await;
        stored.clear();
        stored.extend(songs.into_iter().map(|song| with_object_id(song).1));
        Ok(stored.len() as u64)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.songs.read().await.len() as u64)
    }

    async fn find_all(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self.songs.read().await.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, StoreError> {
        let stored = self.songs.read().await;
        Ok(stored.iter().find(|doc| song_id(doc) == Some(id)).cloned())
    }

    async fn exists(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    async fn insert(&self, song: Document) -> Result<Bson, StoreError> {
        let (oid, stored) = with_object_id(song);
        self.songs.write().await.push(stored);
        Ok(oid)
    }

    async fn set_fields(&self, id: i64, fields: Document) -> Result<u64, StoreError> {
        let mut stored = self.songs.write().await;
        let Some(doc) = stored.iter_mut().find(|doc| song_id(doc) == Some(id)) else {
            return Ok(0);
        };
        let mut modified = false;
        for (key, value) in fields {
            if doc.get(&key) != Some(&value) {
                doc.insert(key, value);
                modified = true;
            }
        }
        Ok(u64::from(modified))
    }

    async fn delete(&self, id: i64) -> Result<u64, StoreError> {
        let mut stored = self.songs.write().await;
        match stored.iter().position(|doc| song_id(doc) == Some(id)) {
            Some(index) => {
                stored.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn replace_all_discards_previous_contents() {
        let store = MemoryStore::new();
        store.insert(doc! {"id": 99, "title": "old", "lyrics": "x"}).await.unwrap();

        let n = store
            .replace_all(vec![doc! {"id": 1, "title": "A", "lyrics": "la la"}])
            .await
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(!store.exists(99).await.unwrap());
        assert!(store.find_by_id(1).await.unwrap().unwrap().get_object_id("_id").is_ok());
    }

    #[tokio::test]
    async fn noop_update_reports_zero_modified() {
        let store = MemoryStore::new();
        store.insert(doc! {"id": 1, "title": "A", "lyrics": "la"}).await.unwrap();

        assert_eq!(store.set_fields(1, doc! {"title": "A", "lyrics": "la"}).await.unwrap(), 0);
        assert_eq!(store.set_fields(1, doc! {"title": "B", "lyrics": "la"}).await.unwrap(), 1);
        assert_eq!(store.set_fields(2, doc! {"title": "B"}).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_removes_one_match() {
        let store = MemoryStore::new();
        store.insert(doc! {"id": 1}).await.unwrap();
        assert_eq!(store.delete(1).await.unwrap(), 1);
        assert_eq!(store.delete(1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn caller_supplied_id_is_kept() {
        let store = MemoryStore::new();
        let id = store.insert(doc! {"_id": "custom", "id": 5}).await.unwrap();
        assert_eq!(id, Bson::String("custom".into()));
    }
}
