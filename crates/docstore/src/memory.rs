//! Process-local document store.

use crate::store::DocumentStore;
use crate::{DocumentId, StoreError, StoreResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

type Namespace = (String, String);

/// Keeps documents in memory, in insertion order per collection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<Namespace, Vec<(DocumentId, Value)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every document in a collection, oldest first.
    pub fn documents(
        &self,
        database: &str,
        collection: &str,
    ) -> StoreResult<Vec<(DocumentId, Value)>> {
        let collections = self
            .collections
            .lock()
            .map_err(|_| StoreError::Read("memory store lock poisoned".into()))?;
        Ok(collections
            .get(&namespace(database, collection))
            .cloned()
            .unwrap_or_default())
    }
}

fn namespace(database: &str, collection: &str) -> Namespace {
    (database.to_string(), collection.to_string())
}

impl DocumentStore for MemoryStore {
    fn insert_document(
        &self,
        database: &str,
        collection: &str,
        document: &Value,
    ) -> StoreResult<DocumentId> {
        let mut collections = self
            .collections
            .lock()
            .map_err(|_| StoreError::Write("memory store lock poisoned".into()))?;
        let id = DocumentId::new();
        collections
            .entry(namespace(database, collection))
            .or_default()
            .push((id, document.clone()));
        Ok(id)
    }

    fn find_document(
        &self,
        database: &str,
        collection: &str,
        id: &DocumentId,
    ) -> StoreResult<Option<Value>> {
        let collections = self
            .collections
            .lock()
            .map_err(|_| StoreError::Read("memory store lock poisoned".into()))?;
        Ok(collections
            .get(&namespace(database, collection))
            .and_then(|docs| docs.iter().find(|(doc_id, _)| doc_id == id))
            .map(|(_, document)| document.clone()))
    }

    fn count_documents(&self, database: &str, collection: &str) -> StoreResult<usize> {
        let collections = self
            .collections
            .lock()
            .map_err(|_| StoreError::Read("memory store lock poisoned".into()))?;
        Ok(collections
            .get(&namespace(database, collection))
            .map_or(0, Vec::len))
    }
}
