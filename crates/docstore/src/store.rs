//! The [`DocumentStore`] trait and its borrowed database/collection handles.

use crate::{DocumentId, StoreError, StoreResult};
use serde_json::Value;

/// Longest accepted database or collection name.
const MAX_NAME_LEN: usize = 64;

/// A backend able to persist JSON documents into named collections.
///
/// Implementors receive names that have already passed [`validate_name`] when called through
/// [`Database`] and [`Collection`] handles.
pub trait DocumentStore {
    /// Persist `document` and return its newly generated id.
    fn insert_document(
        &self,
        database: &str,
        collection: &str,
        document: &Value,
    ) -> StoreResult<DocumentId>;

    /// Fetch a previously inserted document.
    fn find_document(
        &self,
        database: &str,
        collection: &str,
        id: &DocumentId,
    ) -> StoreResult<Option<Value>>;

    /// Number of documents in a collection (zero if it was never written).
    fn count_documents(&self, database: &str, collection: &str) -> StoreResult<usize>;

    /// Handle to a named database in this store.
    fn database(&self, name: &str) -> StoreResult<Database<'_, Self>>
    where
        Self: Sized,
    {
        Database::new(self, name)
    }
}

/// Reject names that are empty, too long, or could escape the store's namespace.
///
/// Accepted: ASCII alphanumerics, `_` and `-`, not starting with `-`.
pub fn validate_name(name: &str) -> StoreResult<()> {
    let valid = !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && !name.starts_with('-')
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidName(format!(
            "'{name}' must be 1-{MAX_NAME_LEN} ASCII alphanumerics, '_' or '-'"
        )))
    }
}

/// A named database borrowed from a store.
#[derive(Debug)]
pub struct Database<'s, S> {
    store: &'s S,
    name: String,
}

impl<'s, S: DocumentStore> Database<'s, S> {
    pub fn new(store: &'s S, name: &str) -> StoreResult<Self> {
        validate_name(name)?;
        Ok(Self {
            store,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle to a named collection in this database.
    pub fn collection(&self, name: &str) -> StoreResult<Collection<'_, S>> {
        validate_name(name)?;
        Ok(Collection {
            store: self.store,
            database: &self.name,
            name: name.to_string(),
        })
    }
}

/// A named collection borrowed from a [`Database`].
#[derive(Debug)]
pub struct Collection<'d, S> {
    store: &'d S,
    database: &'d str,
    name: String,
}

impl<S: DocumentStore> Collection<'_, S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert one document. Each call is independent; there is no cross-call transaction.
    pub fn insert(&self, document: &Value) -> StoreResult<DocumentId> {
        self.store
            .insert_document(self.database, &self.name, document)
    }

    pub fn find(&self, id: &DocumentId) -> StoreResult<Option<Value>> {
        self.store.find_document(self.database, &self.name, id)
    }

    pub fn count(&self) -> StoreResult<usize> {
        self.store.count_documents(self.database, &self.name)
    }
}
