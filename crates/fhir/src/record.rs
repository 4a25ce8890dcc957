//! Tagged union over the resources the pipeline knows how to store.
//!
//! Routing on `resourceType` is an exhaustive `match` over [`Record`]. Documents carrying any
//! other `resourceType` are kept as [`Record::Unrecognised`] so callers can decide to skip them
//! explicitly rather than failing the batch.

use crate::observation::{ObservationResource, OBSERVATION_RESOURCE_TYPE};
use crate::patient::{PatientResource, PATIENT_RESOURCE_TYPE};
use crate::{FhirError, FhirResult};
use serde_json::Value;

/// One resource document, discriminated by `resourceType`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Record {
    Patient(PatientResource),
    Observation(ObservationResource),
    /// A document whose `resourceType` is not handled. Kept verbatim.
    Unrecognised {
        resource_type: String,
        document: Value,
    },
}

impl Record {
    /// Classify a JSON document by its `resourceType`.
    ///
    /// Known resource types are strictly decoded into their wire models.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidInput`] if the document is not an object or has no string
    /// `resourceType`, and [`FhirError::Translation`] if a known resource fails to decode.
    pub fn from_json(document: Value) -> FhirResult<Self> {
        let resource_type = document
            .as_object()
            .ok_or_else(|| FhirError::InvalidInput("document must be a JSON object".into()))?
            .get("resourceType")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                FhirError::InvalidInput("document has no string resourceType".into())
            })?
            .to_string();

        match resource_type.as_str() {
            PATIENT_RESOURCE_TYPE => PatientResource::from_value(document).map(Record::Patient),
            OBSERVATION_RESOURCE_TYPE => {
                ObservationResource::from_value(document).map(Record::Observation)
            }
            _ => Ok(Record::Unrecognised {
                resource_type,
                document,
            }),
        }
    }

    /// The discriminant value.
    pub fn resource_type(&self) -> &str {
        match self {
            Record::Patient(patient) => patient.resource_type(),
            Record::Observation(observation) => observation.resource_type(),
            Record::Unrecognised { resource_type, .. } => resource_type,
        }
    }

    /// The JSON document to persist.
    pub fn to_document(&self) -> FhirResult<Value> {
        match self {
            Record::Patient(patient) => patient.to_value(),
            Record::Observation(observation) => observation.to_value(),
            Record::Unrecognised { document, .. } => Ok(document.clone()),
        }
    }
}

impl From<PatientResource> for Record {
    fn from(patient: PatientResource) -> Self {
        Record::Patient(patient)
    }
}

impl From<ObservationResource> for Record {
    fn from(observation: ObservationResource) -> Self {
        Record::Observation(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patient_json() -> Value {
        json!({
            "resourceType": "Patient",
            "identifier": [{"use": "usual", "label": "MRN", "system": "urn:oid:1", "value": "9"}],
            "gender": {"coding": [{"system": "urn:gender", "code": "F"}]},
            "birthDate": "1944-07-12",
            "managingOrganization": {"reference": "Organization/1", "display": "Org"}
        })
    }

    #[test]
    fn classifies_patient() {
        let record = Record::from_json(patient_json()).expect("classify patient");
        assert!(matches!(record, Record::Patient(_)));
        assert_eq!(record.resource_type(), "Patient");
        assert_eq!(record.to_document().unwrap(), patient_json());
    }

    #[test]
    fn classifies_observation() {
        let record = Record::from_json(json!({
            "resourceType": "Observation",
            "name": {"coding": [{"system": "http://loinc.org", "code": "1", "display": "x"}]},
            "valueQuantity": {"value": 5},
            "issued": "2013-04-03T15:30:10+01:00",
            "status": "final",
            "subject": {"reference": "Patient/9", "display": "P"}
        }))
        .expect("classify observation");
        assert_eq!(record.resource_type(), "Observation");
    }

    #[test]
    fn keeps_unknown_resource_types() {
        let document = json!({"resourceType": "Medication", "code": "abc"});
        let record = Record::from_json(document.clone()).expect("classify medication");
        assert_eq!(
            record,
            Record::Unrecognised {
                resource_type: "Medication".into(),
                document: document.clone(),
            }
        );
        assert_eq!(record.to_document().unwrap(), document);
    }

    #[test]
    fn resource_type_is_case_sensitive() {
        let record = Record::from_json(json!({"resourceType": "patient"})).unwrap();
        assert!(matches!(record, Record::Unrecognised { .. }));
    }

    #[test]
    fn rejects_documents_without_discriminant() {
        assert!(matches!(
            Record::from_json(json!({"identifier": []})),
            Err(FhirError::InvalidInput(_))
        ));
        assert!(matches!(
            Record::from_json(json!(["Patient"])),
            Err(FhirError::InvalidInput(_))
        ));
    }

    #[test]
    fn malformed_known_resource_is_an_error() {
        let mut document = patient_json();
        document["birthDate"] = json!(19440712);
        assert!(matches!(
            Record::from_json(document),
            Err(FhirError::Translation(_))
        ));
    }
}
