//! Persistence dispatch for mapped records.
//!
//! Each [`Record`] is routed by resource kind:
//! - `Patient` → `patients`
//! - `Observation` → `observations`
//! - anything else → skipped without error and without an id
//!
//! Inserts are independent. When a sequence is persisted, the first failed insert stops the
//! sequence and is returned; documents inserted before it stay committed.

use crate::constants::{OBSERVATIONS_COLLECTION, PATIENTS_COLLECTION};
use crate::IngestResult;
use docstore::{Database, DocumentId, DocumentStore};
use fhir::Record;

/// Collection a record is stored in, or `None` if it is skipped.
pub fn collection_for(record: &Record) -> Option<&'static str> {
    match record {
        Record::Patient(_) => Some(PATIENTS_COLLECTION),
        Record::Observation(_) => Some(OBSERVATIONS_COLLECTION),
        Record::Unrecognised { .. } => None,
    }
}

/// Persist one record.
///
/// Returns `Ok(None)` when the record's resource type is not routed anywhere.
///
/// # Errors
///
/// Returns [`crate::IngestError::StoreWrite`] if the store rejects the insert.
pub fn persist_one<S: DocumentStore>(
    database: &Database<'_, S>,
    record: &Record,
) -> IngestResult<Option<DocumentId>> {
    let Some(collection_name) = collection_for(record) else {
        tracing::warn!(
            resource_type = record.resource_type(),
            "skipping record with unrecognised resourceType"
        );
        return Ok(None);
    };

    let document = record.to_document()?;
    let collection = database.collection(collection_name)?;
    let id = collection.insert(&document)?;

    tracing::debug!(
        "stored {} as {}.{}/{}",
        record.resource_type(),
        database.name(),
        collection_name,
        id
    );
    Ok(Some(id))
}

/// Persist records in order, returning one id per stored record.
///
/// Skipped records contribute no id. Processing stops at the first error.
pub fn persist<S: DocumentStore>(
    database: &Database<'_, S>,
    records: &[Record],
) -> IngestResult<Vec<DocumentId>> {
    let mut ids = Vec::with_capacity(records.len());
    for record in records {
        if let Some(id) = persist_one(database, record)? {
            ids.push(id);
        }
    }
    Ok(ids)
}
