use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Number, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::document::{Collection, Document, StoredDocument};
use super::manager::DatabaseError;
use super::store::{DeleteResult, DocumentStore, InsertOneResult, Update, UpdateResult};
use crate::filter::{DocFilter, FindQuery};

/// In-process document store. Collections are insertion-ordered vectors, so
/// unsorted finds and sort ties behave like the Postgres store.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<StoredDocument>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

fn increment(current: Option<&Value>, field: &str, by: i64) -> Result<Value, DatabaseError> {
    let number = match current {
        None | Some(Value::Null) => Number::from(by),
        // past i64 the counter continues as a float, like Postgres numeric
        Some(Value::Number(n)) => match n.as_i64().and_then(|i| i.checked_add(by)) {
            Some(next) => Number::from(next),
            None => Number::from_f64(n.as_f64().unwrap_or(0.0) + by as f64)
                .ok_or_else(|| DatabaseError::QueryError(format!("cannot increment field '{}'", field)))?,
        },
        Some(_) => {
            return Err(DatabaseError::QueryError(format!(
                "cannot increment non-numeric field '{}'",
                field
            )))
        }
    };
    Ok(Value::Number(number))
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<InsertOneResult, DatabaseError> {
        let id = Uuid::new_v4();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection)
            .or_default()
            .push(StoredDocument::new(id, doc));
        Ok(InsertOneResult::new(id))
    }

    async fn insert_if_absent(
        &self,
        collection: Collection,
        key_field: &str,
        key: &Value,
        doc: Document,
    ) -> Result<UpdateResult, DatabaseError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        if docs.iter().any(|d| d.doc.get(key_field) == Some(key)) {
            return Ok(UpdateResult::updated(1, 0));
        }
        let id = Uuid::new_v4();
        docs.push(StoredDocument::new(id, doc));
        Ok(UpdateResult::upserted(id))
    }

    async fn find(&self, collection: Collection, query: FindQuery) -> Result<Vec<StoredDocument>, DatabaseError> {
        let collections = self.collections.read().await;
        let filter = query.filter.unwrap_or(DocFilter::All);
        let mut found: Vec<StoredDocument> = collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(&d.doc)).cloned().collect())
            .unwrap_or_default();

        if let Some(sort) = &query.sort {
            found.sort_by(|a, b| sort.compare(&a.doc, &b.doc));
        }
        if let Some(limit) = query.limit {
            found.truncate(limit.max(0) as usize);
        }
        Ok(found)
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<StoredDocument>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn update_by_id(&self, collection: Collection, id: Uuid, update: Update) -> Result<UpdateResult, DatabaseError> {
        let mut collections = self.collections.write().await;
        let Some(target) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
        else {
            return Ok(UpdateResult::updated(0, 0));
        };

        match update {
            Update::Set(fields) => {
                let mut modified = false;
                for (k, v) in fields {
                    if target.doc.get(&k) != Some(&v) {
                        target.doc.insert(k, v);
                        modified = true;
                    }
                }
                Ok(UpdateResult::updated(1, modified as u64))
            }
            Update::Inc { field, by } => {
                let next = increment(target.doc.get(&field), &field, by)?;
                target.doc.insert(field, next);
                Ok(UpdateResult::updated(1, 1))
            }
        }
    }

    async fn delete_by_id(&self, collection: Collection, id: Uuid) -> Result<DeleteResult, DatabaseError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(DeleteResult::new(0));
        };
        let before = docs.len();
        docs.retain(|d| d.id != id);
        Ok(DeleteResult::new((before - docs.len()) as u64))
    }

    async fn exists(&self, collection: Collection, filter: DocFilter) -> Result<bool, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .is_some_and(|docs| docs.iter().any(|d| filter.matches(&d.doc))))
    }
}
