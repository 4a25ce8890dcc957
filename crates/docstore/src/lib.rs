//! Document storage for ingested resources.
//!
//! Documents are JSON values grouped into named collections inside named databases. Every
//! insert returns a store-generated [`DocumentId`]. Documents are never updated or deleted.
//!
//! ## Handles
//!
//! A store is connected once and then addressed through borrowed handles:
//!
//! ```no_run
//! use docstore::{DocumentStore, MongoConfig, MongoStore};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), docstore::StoreError> {
//! let store = MongoStore::connect(&MongoConfig::default())?;
//! let database = store.database("encounters")?;
//! let patients = database.collection("patients")?;
//! let id = patients.insert(&json!({"resourceType": "Patient"}))?;
//! assert!(patients.find(&id)?.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Backends
//!
//! - [`MongoStore`]: a MongoDB server (default `localhost:27017`)
//! - [`FileStore`]: one JSON file per document under a sharded directory tree
//! - [`MemoryStore`]: process-local, for tests and dry runs

mod file;
mod id;
mod memory;
mod mongo;
mod store;

pub use file::{FileStore, StoreConfig};
pub use id::DocumentId;
pub use memory::MemoryStore;
pub use mongo::{MongoConfig, MongoStore, DEFAULT_HOST, DEFAULT_PORT};
pub use store::{validate_name, Collection, Database, DocumentStore};

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or opened
    #[error("store connection failed: {0}")]
    Connection(String),

    /// An insert was rejected
    #[error("store write failed: {0}")]
    Write(String),

    /// A stored document could not be read back
    #[error("store read failed: {0}")]
    Read(String),

    /// Database or collection name is not usable
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Document identifier is not in a canonical form
    #[error("invalid document id: {0}")]
    InvalidId(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
