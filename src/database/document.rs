use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Free-form JSON object as held by the store.
pub type Document = Map<String, Value>;

/// Key under which a document's identifier is exposed over HTTP.
pub const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Books,
    Reviews,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Users, Collection::Books, Collection::Reviews];

    /// Table / collection name. Static, so safe to splice into SQL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Books => "books",
            Collection::Reviews => "reviews",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document together with its store-generated id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: Uuid,
    pub doc: Document,
}

impl StoredDocument {
    pub fn new(id: Uuid, doc: Document) -> Self {
        Self { id, doc }
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.doc.get(field).and_then(Value::as_str)
    }
}

// Serialized as the document's fields with the id in front under `_id`.
impl Serialize for StoredDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.doc.iter().filter(|(k, _)| k.as_str() != ID_FIELD);
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(ID_FIELD, &self.id.to_string())?;
        for (k, v) in fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Drop any client-supplied `_id`; identifiers belong to the store.
pub fn strip_id(mut doc: Document) -> Document {
    doc.remove(ID_FIELD);
    doc
}
