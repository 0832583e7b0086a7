pub mod document;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod store;

pub use document::{Document, DocumentId};
pub use error::{Result, StoreError};
pub use memory::MemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use query::{Filter, Query};
pub use store::{DocumentStore, FieldUpdates};
