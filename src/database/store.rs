use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::document::{Collection, Document, StoredDocument};
use super::manager::DatabaseError;
use crate::filter::{DocFilter, FindQuery};

/// Mutation applied by [`DocumentStore::update_by_id`].
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Overwrite the listed fields, leaving others untouched.
    Set(Document),
    /// Atomically add `by` to a numeric field; a missing field counts as 0.
    Inc { field: String, by: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertOneResult {
    pub fn new(id: Uuid) -> Self {
        Self { acknowledged: true, inserted_id: id.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
    pub upserted_count: u64,
}

impl UpdateResult {
    pub fn updated(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_id: None,
            upserted_count: 0,
        }
    }

    pub fn upserted(id: Uuid) -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id.to_string()),
            upserted_count: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self { acknowledged: true, deleted_count }
    }
}

/// The document database behind every handler. One handle is shared by all
/// requests, so implementations must be safe for concurrent use.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Round trip to the backing store.
    async fn ping(&self) -> Result<(), DatabaseError>;

    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<InsertOneResult, DatabaseError>;

    /// Insert `doc` only when no document has `key_field == key`; otherwise a no-op.
    async fn insert_if_absent(
        &self,
        collection: Collection,
        key_field: &str,
        key: &Value,
        doc: Document,
    ) -> Result<UpdateResult, DatabaseError>;

    async fn find(&self, collection: Collection, query: FindQuery) -> Result<Vec<StoredDocument>, DatabaseError>;

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<StoredDocument>, DatabaseError>;

    async fn update_by_id(&self, collection: Collection, id: Uuid, update: Update) -> Result<UpdateResult, DatabaseError>;

    async fn delete_by_id(&self, collection: Collection, id: Uuid) -> Result<DeleteResult, DatabaseError>;

    async fn exists(&self, collection: Collection, filter: DocFilter) -> Result<bool, DatabaseError>;
}
