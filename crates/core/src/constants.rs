//! Constants used throughout the ingestion core.
//!
//! Storage names, input-file shape, and the reference data written into every mapped
//! resource. Reference values are placeholders carried over from the source feed; they are
//! gathered into [`crate::config::ReferenceData`] so callers can override them.

/// Database every resource is written to.
pub const DEFAULT_DATABASE_NAME: &str = "encounters";

/// Environment variable selecting the store backend.
pub const STORE_BACKEND_ENV_VAR: &str = "INGEST_STORE";

/// Backend used when [`STORE_BACKEND_ENV_VAR`] is unset: the MongoDB server on
/// `localhost:27017`.
pub const MONGO_BACKEND: &str = "mongodb";

/// Backend name for the file-backed document store.
pub const FILE_BACKEND: &str = "file";

/// Default directory for the file-backed document store.
pub const DEFAULT_DATA_DIR: &str = "encounter_data";

/// Environment variable overriding [`DEFAULT_DATA_DIR`] (file backend only).
pub const DATA_DIR_ENV_VAR: &str = "INGEST_DATA_DIR";

/// Collection for Patient documents.
pub const PATIENTS_COLLECTION: &str = "patients";

/// Collection for Observation documents.
pub const OBSERVATIONS_COLLECTION: &str = "observations";

/// Lines read from each input file (MSH, PID, OBX, OBR).
pub const INPUT_SEGMENT_COUNT: usize = 4;

/// HL7 segment terminator used when assembling a message from input lines.
pub const SEGMENT_TERMINATOR: &str = "\r";

// Patient reference data

pub const MRN_IDENTIFIER_USE: &str = "usual";
pub const MRN_IDENTIFIER_LABEL: &str = "MRN";
pub const MRN_IDENTIFIER_SYSTEM: &str = "urn:oid:2.16.840.1.113883.19.5";
pub const GENDER_CODING_SYSTEM: &str = "http://hl7.org/fhir/v3/AdministrativeGender";
pub const MANAGING_ORGANIZATION_REFERENCE: &str = "Organization/2.16.840.1.113883.19.5";
pub const MANAGING_ORGANIZATION_DISPLAY: &str = "MIMIC2";

// Observation reference data

pub const LOINC_SYSTEM: &str = "http://loinc.org";
/// Fixed `issued` timestamp; the message timestamp is not mapped.
pub const OBSERVATION_ISSUED: &str = "2013-04-03T15:30:10+01:00";
pub const OBSERVATION_STATUS: &str = "final";
/// Fixed subject display; PID-5 is not mapped.
pub const SUBJECT_DISPLAY: &str = "P. van de Heuvel";
