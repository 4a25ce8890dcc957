//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the mapper and dispatcher. Environment variables are read by the binary only;
//! nothing in the core consults the process environment while handling a message.

use crate::constants::{
    DEFAULT_DATABASE_NAME, DEFAULT_DATA_DIR, FILE_BACKEND, GENDER_CODING_SYSTEM, LOINC_SYSTEM,
    MANAGING_ORGANIZATION_DISPLAY, MANAGING_ORGANIZATION_REFERENCE, MONGO_BACKEND,
    MRN_IDENTIFIER_LABEL, MRN_IDENTIFIER_SYSTEM, MRN_IDENTIFIER_USE, OBSERVATION_ISSUED,
    OBSERVATION_STATUS, SUBJECT_DISPLAY,
};
use crate::{IngestError, IngestResult};
use docstore::{MongoConfig, StoreConfig};
use std::path::PathBuf;

/// Where documents are persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// A MongoDB server (the default, `localhost:27017`).
    Mongo(MongoConfig),
    /// JSON files under a data directory.
    File(StoreConfig),
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct IngestConfig {
    backend: StoreBackend,
    database: String,
}

impl IngestConfig {
    /// Create a new `IngestConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::InvalidInput`] if `database` is not a usable store name.
    pub fn new(backend: StoreBackend, database: String) -> IngestResult<Self> {
        if database.trim().is_empty() {
            return Err(IngestError::InvalidInput(
                "database name cannot be empty".into(),
            ));
        }
        docstore::validate_name(&database)?;

        Ok(Self { backend, database })
    }

    /// Configuration for the fixed `encounters` database, with the backend taken from optional
    /// environment values.
    ///
    /// - `backend`: `mongodb` (default when `None` or blank) or `file`
    /// - `data_dir`: root of the file backend; [`DEFAULT_DATA_DIR`] when `None` or blank
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::InvalidInput`] for any other backend name.
    pub fn from_env_values(
        backend: Option<String>,
        data_dir: Option<String>,
    ) -> IngestResult<Self> {
        let backend = non_blank(backend).unwrap_or_else(|| MONGO_BACKEND.to_string());

        let backend = match backend.to_ascii_lowercase().as_str() {
            MONGO_BACKEND => StoreBackend::Mongo(MongoConfig::default()),
            FILE_BACKEND => {
                let data_dir = non_blank(data_dir).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
                StoreBackend::File(StoreConfig::new(PathBuf::from(data_dir)))
            }
            other => {
                return Err(IngestError::InvalidInput(format!(
                    "unknown store backend '{other}', expected '{MONGO_BACKEND}' or \
                     '{FILE_BACKEND}'"
                )))
            }
        };

        Self::new(backend, DEFAULT_DATABASE_NAME.to_string())
    }

    pub fn backend(&self) -> &StoreBackend {
        &self.backend
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Fixed values written into every mapped resource.
///
/// None of these come from the HL7 message. Override them here rather than in the mapper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceData {
    pub identifier_use: String,
    pub identifier_label: String,
    pub identifier_system: String,
    pub gender_system: String,
    pub organization_reference: String,
    pub organization_display: String,
    pub observation_system: String,
    pub observation_issued: String,
    pub observation_status: String,
    pub subject_display: String,
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self {
            identifier_use: MRN_IDENTIFIER_USE.into(),
            identifier_label: MRN_IDENTIFIER_LABEL.into(),
            identifier_system: MRN_IDENTIFIER_SYSTEM.into(),
            gender_system: GENDER_CODING_SYSTEM.into(),
            organization_reference: MANAGING_ORGANIZATION_REFERENCE.into(),
            organization_display: MANAGING_ORGANIZATION_DISPLAY.into(),
            observation_system: LOINC_SYSTEM.into(),
            observation_issued: OBSERVATION_ISSUED.into(),
            observation_status: OBSERVATION_STATUS.into(),
            subject_display: SUBJECT_DISPLAY.into(),
        }
    }
}
