//! FHIR-shaped Patient wire model.
//!
//! Responsibilities:
//! - Define the strict wire model for the Patient document
//! - Decode and encode the document as a JSON value
//! - Validate `resourceType`
//!
//! Notes:
//! - `birthDate` is carried as an ISO `YYYY-MM-DD` string; the mapper owns the reformatting
//! - `gender` is a codeable concept, not the FHIR R4 `code`, to match the stored shape

use crate::datatypes::{CodeableConcept, Identifier, Reference};
use crate::{decode, expect_resource_type, FhirError, FhirResult};
use serde::{Deserialize, Serialize};

/// Discriminant value for Patient documents.
pub const PATIENT_RESOURCE_TYPE: &str = "Patient";

// ============================================================================
// Wire types
// ============================================================================

/// Wire representation of a Patient document.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PatientResource {
    #[serde(rename = "resourceType")]
    resource_type: String,

    pub identifier: Vec<Identifier>,

    pub gender: CodeableConcept,

    #[serde(rename = "birthDate")]
    pub birth_date: String,

    #[serde(rename = "managingOrganization")]
    pub managing_organization: Reference,
}

impl PatientResource {
    /// Build a Patient document. `resourceType` is always `Patient`.
    pub fn new(
        identifier: Identifier,
        gender: CodeableConcept,
        birth_date: String,
        managing_organization: Reference,
    ) -> Self {
        Self {
            resource_type: PATIENT_RESOURCE_TYPE.to_string(),
            identifier: vec![identifier],
            gender,
            birth_date,
            managing_organization,
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Value of the first identifier, if any.
    pub fn patient_id(&self) -> Option<&str> {
        self.identifier.first().map(|i| i.value.as_str())
    }

    /// Strictly decode a JSON value, rejecting any other `resourceType`.
    pub fn from_value(value: serde_json::Value) -> FhirResult<Self> {
        let resource: Self = decode(value, PATIENT_RESOURCE_TYPE)?;
        expect_resource_type(PATIENT_RESOURCE_TYPE, &resource.resource_type)?;
        Ok(resource)
    }

    pub fn to_value(&self) -> FhirResult<serde_json::Value> {
        serde_json::to_value(self).map_err(FhirError::from)
    }
}
