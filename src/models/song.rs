use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields every inserted song must carry.
pub const REQUIRED_FIELDS: [&str; 3] = ["id", "lyrics", "title"];

/// Typed view of a song record. Stored documents may carry extra fields;
/// this only checks the ones the catalog relies on.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub lyrics: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct SongCount {
    pub count: u64,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct InsertedSong {
    pub message: String,
    pub inserted_id: String,
}

/// Converts a JSON object into a BSON document. Integers that fit in 32 bits
/// are stored as `Int32`, larger ones as `Int64`.
pub fn to_document(value: Value) -> Result<Document, String> {
    match Bson::try_from(value).map_err(|e| e.to_string())? {
        Bson::Document(doc) => Ok(doc),
        other => Err(format!("expected a JSON object, got {:?}", other.element_type())),
    }
}

/// Relaxed extended JSON, e.g. `{"_id": {"$oid": "..."}, "id": 1, ...}`.
pub fn to_extjson(doc: Document) -> Value {
    Bson::Document(doc).into_relaxed_extjson()
}

/// Reads the integer `id` field of a stored document.
pub fn song_id(doc: &Document) -> Option<i64> {
    match doc.get("id") {
        Some(Bson::Int32(v)) => Some(i64::from(*v)),
        Some(Bson::Int64(v)) => Some(*v),
        _ => None,
    }
}

pub fn has_fields(body: &serde_json::Map<String, Value>, fields: &[&str]) -> bool {
    fields.iter().all(|key| body.contains_key(*key))
}
