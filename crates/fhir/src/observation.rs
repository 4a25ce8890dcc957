//! FHIR-shaped Observation wire model.
//!
//! The observation's coded name lives under `name` (DSTU-era element name) and the measured
//! value under `valueQuantity.value`, kept exactly as the source sent it.

use crate::datatypes::{CodeableConcept, Quantity, Reference};
use crate::{decode, expect_resource_type, FhirError, FhirResult};
use serde::{Deserialize, Serialize};

/// Discriminant value for Observation documents.
pub const OBSERVATION_RESOURCE_TYPE: &str = "Observation";

/// Prefix of `subject.reference` values pointing at a Patient.
pub const PATIENT_REFERENCE_PREFIX: &str = "Patient/";

/// Wire representation of an Observation document.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ObservationResource {
    #[serde(rename = "resourceType")]
    resource_type: String,

    pub name: CodeableConcept,

    #[serde(rename = "valueQuantity")]
    pub value_quantity: Quantity,

    pub issued: String,

    pub status: String,

    pub subject: Reference,
}

impl ObservationResource {
    /// Build an Observation document. `resourceType` is always `Observation`.
    pub fn new(
        name: CodeableConcept,
        value_quantity: Quantity,
        issued: String,
        status: String,
        subject: Reference,
    ) -> Self {
        Self {
            resource_type: OBSERVATION_RESOURCE_TYPE.to_string(),
            name,
            value_quantity,
            issued,
            status,
            subject,
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Patient id embedded in `subject.reference`, when it is a Patient reference.
    pub fn subject_patient_id(&self) -> Option<&str> {
        self.subject.reference.strip_prefix(PATIENT_REFERENCE_PREFIX)
    }

    /// Strictly decode a JSON value, rejecting any other `resourceType`.
    pub fn from_value(value: serde_json::Value) -> FhirResult<Self> {
        let resource: Self = decode(value, OBSERVATION_RESOURCE_TYPE)?;
        expect_resource_type(OBSERVATION_RESOURCE_TYPE, &resource.resource_type)?;
        Ok(resource)
    }

    pub fn to_value(&self) -> FhirResult<serde_json::Value> {
        serde_json::to_value(self).map_err(FhirError::from)
    }
}

/// Build the `subject` reference for a patient id.
pub fn patient_reference(patient_id: &str, display: &str) -> Reference {
    Reference {
        reference: format!("{PATIENT_REFERENCE_PREFIX}{patient_id}"),
        display: display.to_string(),
    }
}
