//! # Ingest Core
//!
//! Core business logic for turning HL7v2 messages into stored resource documents.
//!
//! This crate contains the pure pipeline:
//! - [`input`]: rebuild a raw message from a four-line input file
//! - [`hl7`]: parse the message and address its fields
//! - [`mapper`]: project PID/OBX/OBR fields into a Patient and an Observation
//! - [`dispatcher`]: route records to the `patients` / `observations` collections
//!
//! **No process concerns**: environment variables, logging setup and argument parsing
//! belong in the binary.

pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod hl7;
pub mod input;
pub mod mapper;

pub use config::{IngestConfig, ReferenceData, StoreBackend};
pub use dispatcher::{persist, persist_one};
pub use error::{IngestError, IngestResult};
pub use mapper::{map_message, MappedMessage, Mapper};

pub use docstore::{
    Database, DocumentId, DocumentStore, FileStore, MemoryStore, MongoConfig, MongoStore,
};
pub use fhir::Record;

use std::path::Path;

/// Map-then-persist over one caller-owned database handle.
///
/// The handle is borrowed for the lifetime of the service so one store connection serves
/// every message.
#[derive(Debug)]
pub struct IngestService<'d, 's, S> {
    mapper: Mapper,
    database: &'d Database<'s, S>,
}

impl<'d, 's, S: DocumentStore> IngestService<'d, 's, S> {
    pub fn new(mapper: Mapper, database: &'d Database<'s, S>) -> Self {
        Self { mapper, database }
    }

    /// Map one raw message and persist its Patient then its Observation.
    ///
    /// # Returns
    /// The generated ids, Patient first.
    pub fn ingest_message(&self, raw: &str) -> IngestResult<Vec<DocumentId>> {
        let mapped = self.mapper.map(raw)?;
        persist(self.database, &mapped.into_records())
    }

    /// Read a four-line input file and ingest its message.
    pub fn ingest_file(&self, path: &Path) -> IngestResult<Vec<DocumentId>> {
        let raw = input::read_message_file(path)?;
        let ids = self.ingest_message(&raw)?;
        tracing::info!("ingested {} ({} documents)", path.display(), ids.len());
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docstore::StoreConfig;
    use tempfile::TempDir;

    const FILE: &str = "MSH|^~\\&|MIMIC|BIDMC|EHR|HOSP|20130403153010||ORU^R01|MSG00001|P|2.5\n\
PID|1||123456^^^BIDMC^MR||van de Heuvel^Pieter||19440712|F\n\
OBX|1|NM|8310-5^Body temperature^LN||98.6|degF|||||F\n\
OBR|1|||8310-5^Body temperature\n";

    #[test]
    fn ingests_file_into_both_collections() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("input.txt");
        std::fs::write(&path, FILE).unwrap();

        let store = FileStore::connect(&StoreConfig::new(temp.path().join("data"))).unwrap();
        let database = store.database("encounters").unwrap();
        let service = IngestService::new(Mapper::default(), &database);

        let ids = service.ingest_file(&path).expect("ingest file");
        assert_eq!(ids.len(), 2);

        let patient = database
            .collection("patients")
            .unwrap()
            .find(&ids[0])
            .unwrap()
            .expect("patient stored");
        assert_eq!(patient["birthDate"], "1944-07-12");

        let observation = database
            .collection("observations")
            .unwrap()
            .find(&ids[1])
            .unwrap()
            .expect("observation stored");
        assert_eq!(observation["subject"]["reference"], "Patient/123456");
    }

    #[test]
    fn ingests_carriage_return_terminated_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("input.hl7");
        std::fs::write(&path, FILE.replace('\n', "\r")).unwrap();

        let store = MemoryStore::new();
        let database = store.database("encounters").unwrap();
        let service = IngestService::new(Mapper::default(), &database);

        let ids = service.ingest_file(&path).expect("ingest CR-terminated file");
        assert_eq!(ids.len(), 2);
        let patients = store.documents("encounters", "patients").unwrap();
        assert_eq!(patients[0].1["identifier"][0]["value"], "123456");
    }

    #[test]
    fn mapping_failure_stores_nothing() {
        let store = MemoryStore::new();
        let database = store.database("encounters").unwrap();
        let service = IngestService::new(Mapper::default(), &database);

        let raw = input::assemble_message(&FILE.replace("19440712", "1944")).unwrap();
        let err = service.ingest_message(&raw).expect_err("bad birth date");
        assert!(matches!(err, IngestError::MalformedField { .. }));
        assert_eq!(store.count_documents("encounters", "patients").unwrap(), 0);
    }
}
