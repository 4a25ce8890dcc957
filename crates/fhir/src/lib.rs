//! FHIR-shaped resource models for HL7 ingestion.
//!
//! This crate provides the **wire models** for the two resources produced from an HL7v2
//! message, plus the tagged [`Record`] union used to route them to storage:
//! - [`PatientResource`]
//! - [`ObservationResource`]
//!
//! This crate focuses on:
//! - the exact JSON document shape of each resource
//! - strict deserialisation (unknown keys rejected, failing path reported)
//! - discriminating on `resourceType`
//!
//! It is NOT a validating FHIR implementation. Only the handful of elements the ingestion
//! pipeline writes are modelled.

pub mod datatypes;
pub mod observation;
pub mod patient;
pub mod record;

// Re-export wire types
pub use datatypes::{CodeableConcept, Coding, Identifier, Quantity, QuantityValue, Reference};
pub use observation::ObservationResource;
pub use patient::PatientResource;
pub use record::Record;

/// Errors returned by the `fhir` crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;

/// Decode a JSON value into a wire type, reporting the path of the first mismatch.
pub(crate) fn decode<T>(value: serde_json::Value, what: &str) -> FhirResult<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_path_to_error::deserialize::<_, T>(value).map_err(|err| {
        let path = err.path().to_string();
        let source = err.into_inner();
        let path = if path.is_empty() || path == "." {
            "<root>"
        } else {
            path.as_str()
        };
        FhirError::Translation(format!("{what} schema mismatch at {path}: {source}"))
    })
}

/// Fail unless `found` is the expected `resourceType`.
pub(crate) fn expect_resource_type(expected: &str, found: &str) -> FhirResult<()> {
    if found == expected {
        Ok(())
    } else {
        Err(FhirError::InvalidInput(format!(
            "Expected resourceType '{expected}', got '{found}'"
        )))
    }
}
