//! MongoDB-backed document store.
//!
//! Uses the driver's blocking API. The connection is checked once with a `ping` when the
//! store is opened. Each insert is a single `insertOne`, so there is no cross-document
//! atomicity. Ids are the ObjectIds the driver assigns to `_id`. `_id` is stripped again when a
//! document is read back, so callers see exactly the JSON they inserted.

use crate::store::DocumentStore;
use crate::{DocumentId, StoreError, StoreResult};
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::sync::{Client, Collection};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Host of the document database.
pub const DEFAULT_HOST: &str = "localhost";

/// Port of the document database.
pub const DEFAULT_PORT: u16 = 27017;

const DEFAULT_SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);
const ID_FIELD: &str = "_id";

/// Connection settings for a [`MongoStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MongoConfig {
    host: String,
    port: u16,
    server_selection_timeout: Duration,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl MongoConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            server_selection_timeout: DEFAULT_SERVER_SELECTION_TIMEOUT,
        }
    }

    /// How long to wait for a reachable server before giving up.
    pub fn with_server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Connection string for the configured server.
    pub fn uri(&self) -> String {
        format!(
            "mongodb://{}:{}/?serverSelectionTimeoutMS={}",
            self.host,
            self.port,
            self.server_selection_timeout.as_millis()
        )
    }
}

/// Stores documents in a MongoDB server.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    address: String,
}

impl fmt::Debug for MongoStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoStore")
            .field("address", &self.address)
            .finish()
    }
}

impl MongoStore {
    /// Connect to the server described by `config` and check that it answers.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the address is unusable or no server responds
    /// within the server selection timeout.
    pub fn connect(config: &MongoConfig) -> StoreResult<Self> {
        let address = format!("{}:{}", config.host(), config.port());

        let client = Client::with_uri_str(config.uri()).map_err(|e| {
            StoreError::Connection(format!("Invalid store address {address}: {e}"))
        })?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .run()
            .map_err(|e| {
                StoreError::Connection(format!("Cannot reach store at {address}: {e}"))
            })?;

        tracing::debug!("connected to document store at {address}");

        Ok(Self { client, address })
    }

    /// `host:port` of the connected server.
    pub fn address(&self) -> &str {
        &self.address
    }

    fn collection(&self, database: &str, collection: &str) -> Collection<Document> {
        self.client
            .database(database)
            .collection::<Document>(collection)
    }
}

impl DocumentStore for MongoStore {
    fn insert_document(
        &self,
        database: &str,
        collection: &str,
        document: &Value,
    ) -> StoreResult<DocumentId> {
        let record = bson::to_document(document)
            .map_err(|e| StoreError::Write(format!("Document is not a BSON object: {e}")))?;

        let result = self
            .collection(database, collection)
            .insert_one(record)
            .run()
            .map_err(|e| {
                StoreError::Write(format!("Insert into {database}.{collection} failed: {e}"))
            })?;

        let id = result
            .inserted_id
            .as_object_id()
            .map(DocumentId::from)
            .ok_or_else(|| {
                StoreError::Write(format!(
                    "Insert into {database}.{collection} returned a non-ObjectId id: {}",
                    result.inserted_id
                ))
            })?;

        tracing::debug!("inserted {database}.{collection}/{id}");
        Ok(id)
    }

    fn find_document(
        &self,
        database: &str,
        collection: &str,
        id: &DocumentId,
    ) -> StoreResult<Option<Value>> {
        // only ObjectIds are ever assigned here
        let DocumentId::Object(oid) = id else {
            return Ok(None);
        };

        let found = self
            .collection(database, collection)
            .find_one(doc! { "_id": *oid })
            .run()
            .map_err(|e| {
                StoreError::Read(format!("Lookup in {database}.{collection} failed: {e}"))
            })?;

        Ok(found.map(document_to_json))
    }

    fn count_documents(&self, database: &str, collection: &str) -> StoreResult<usize> {
        let count = self
            .collection(database, collection)
            .count_documents(doc! {})
            .run()
            .map_err(|e| {
                StoreError::Read(format!("Count of {database}.{collection} failed: {e}"))
            })?;

        usize::try_from(count).map_err(|e| {
            StoreError::Read(format!("Count of {database}.{collection} overflows: {e}"))
        })
    }
}

/// Convert a stored BSON document back to the JSON that was inserted.
fn document_to_json(mut document: Document) -> Value {
    document.remove(ID_FIELD);
    Bson::Document(document).into_relaxed_extjson()
}
