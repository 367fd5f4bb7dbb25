pub mod document;
pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use document::{Collection, Document, StoredDocument};
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use store::{DeleteResult, DocumentStore, InsertOneResult, Update, UpdateResult};
