use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Collection};
use tracing::{debug, info};

use crate::config::Settings;
use crate::db::SongStore;
use crate::error::StoreError;

#[derive(Clone)]
pub struct Database {
    songs: Collection<Document>,
}

impl Database {
    /// Connects to the configured MongoDB deployment and pings it, so a bad
    /// address or rejected credentials fail here rather than on first request.
    pub async fn connect(settings: &Settings) -> Result<Self, StoreError> {
        debug!("MONGODB_URI={}", settings.redacted_uri());

        let client = Client::with_uri_str(settings.connection_uri()).await?;
        let database = client.database(&settings.database);
        database.run_command(doc! { "ping": 1 }, None).await?;
        info!(
            database = %settings.database,
            collection = %settings.collection,
            "Connected to MongoDB"
        );

        Ok(Self {
            songs: database.collection(&settings.collection),
        })
    }
}

#[async_trait]
impl SongStore for Database {
    async fn replace_all(&self, songs: Vec<Document>) -> Result<u64, StoreError> {
        self.songs.drop(None).await?;
        if songs.is_empty() {
            return Ok(0);
        }
        let result = self.songs.insert_many(songs, None).await?;
        Ok(result.inserted_ids.len() as u64)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.songs.count_documents(doc! {}, None).await?)
    }

    async fn find_all(&self) -> Result<Vec<Document>, StoreError> {
        let cursor = self.songs.find(doc! {}, None).await?;
        let songs: Vec<Document> = cursor.try_collect().await?;
        Ok(songs)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, StoreError> {
        Ok(self.songs.find_one(doc! { "id": id }, None).await?)
    }

    async fn exists(&self, id: i64) -> Result<bool, StoreError> {
        let matching = self.songs.count_documents(doc! { "id": id }, None).await?;
        Ok(matching > 0)
    }

    async fn insert(&self, song: Document) -> Result<Bson, StoreError> {
        let result = self.songs.insert_one(song, None).await?;
        Ok(result.inserted_id)
    }

    async fn set_fields(&self, id: i64, fields: Document) -> Result<u64, StoreError> {
        let result = self
            .songs
            .update_one(doc! { "id": id }, doc! { "$set": fields }, None)
            .await?;
        Ok(result.modified_count)
    }

    async fn delete(&self, id: i64) -> Result<u64, StoreError> {
        let result = self.songs.delete_one(doc! { "id": id }, None).await?;
        Ok(result.deleted_count)
    }
}
