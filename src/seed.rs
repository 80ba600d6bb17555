use std::path::{Path, PathBuf};

use mongodb::bson::Document;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::db::SongStore;
use crate::error::StoreError;
use crate::models::song::{to_document, Song};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("cannot read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("seed file is not a JSON array: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("seed record {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parses seed records. Each record must carry an integer `id` plus `title`
/// and `lyrics` strings; any other fields are kept as-is.
pub fn parse_seed(raw: &str) -> Result<Vec<Document>, SeedError> {
    let records: Vec<Value> = serde_json::from_str(raw)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value::<Song>(record.clone()).map_err(|e| {
                SeedError::InvalidRecord {
                    index,
                    reason: e.to_string(),
                }
            })?;
            to_document(record).map_err(|reason| SeedError::InvalidRecord { index, reason })
        })
        .collect()
}

pub async fn load_seed(path: &Path) -> Result<Vec<Document>, SeedError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let songs = parse_seed(&raw)?;
    info!(path = %path.display(), records = songs.len(), "Loaded seed data");
    Ok(songs)
}

/// Drops the collection and loads the seed records in its place.
pub async fn reseed(store: &dyn SongStore, songs: Vec<Document>) -> Result<u64, SeedError> {
    warn!(records = songs.len(), "Replacing song collection with seed data");
    let inserted = store.replace_all(songs).await?;
    info!(inserted, "Seed data loaded");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use mongodb::bson::doc;

    #[test]
    fn bundled_seed_is_valid() {
        let songs = parse_seed(include_str!("../data/songs.json")).unwrap();
        assert!(!songs.is_empty());
    }

    #[test]
    fn extra_fields_survive() {
        let songs =
            parse_seed(r#"[{"id": 1, "title": "A", "lyrics": "la la", "year": 1999}]"#).unwrap();
        assert_eq!(songs[0].get_i32("year").unwrap(), 1999);
    }

    #[test]
    fn record_without_lyrics_is_rejected() {
        let err = parse_seed(r#"[{"id": 1, "title": "A", "lyrics": "x"}, {"id": 2, "title": "B"}]"#)
            .unwrap_err();
        assert!(matches!(err, SeedError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn non_array_is_rejected() {
        assert!(matches!(
            parse_seed(r#"{"id": 1}"#).unwrap_err(),
            SeedError::Parse(_)
        ));
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let err = load_seed(Path::new("does/not/exist.json")).await.unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }

    #[tokio::test]
    async fn reseed_replaces_contents() {
        let store = MemoryStore::new();
        store.insert(doc! {"id": 42, "title": "stale", "lyrics": ""}).await.unwrap();

        let songs = parse_seed(r#"[{"id": 1, "title": "A", "lyrics": "la la"}]"#).unwrap();
        assert_eq!(reseed(&store, songs).await.unwrap(), 1);
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.find_by_id(42).await.unwrap().is_none());
    }
}
