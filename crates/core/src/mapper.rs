//! HL7v2 to resource mapping.
//!
//! One message shape is supported: a single MSH, PID, OBX and OBR segment. The first
//! occurrence of each segment is used. Field addressing (1-indexed):
//!
//! | Target                         | Source      |
//! |--------------------------------|-------------|
//! | Patient identifier value       | PID-3.1     |
//! | Patient gender code            | PID-8       |
//! | Patient birth date             | PID-7       |
//! | Observation code               | OBX-3.1     |
//! | Observation display            | OBR-4.2     |
//! | Observation value              | OBX-5       |
//! | Observation subject reference  | PID-3.1     |
//!
//! Everything else in the resources comes from [`ReferenceData`].

use crate::config::ReferenceData;
use crate::hl7::{component_value, field_value, parse_message};
use crate::{IngestError, IngestResult};
use chrono::NaiveDate;
use fhir::observation::patient_reference;
use fhir::{
    CodeableConcept, Coding, Identifier, ObservationResource, PatientResource, Quantity,
    QuantityValue, Record, Reference,
};

const BIRTH_DATE_FIELD: &str = "PID-7";
const PATIENT_ID_FIELD: &str = "PID-3.1";

/// The pair of resources produced from one message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappedMessage {
    pub patient: PatientResource,
    pub observation: ObservationResource,
}

impl MappedMessage {
    /// Records in persistence order: Patient first, then Observation.
    pub fn into_records(self) -> Vec<Record> {
        vec![self.patient.into(), self.observation.into()]
    }
}

/// Maps raw HL7 text into a [`MappedMessage`].
#[derive(Clone, Debug, Default)]
pub struct Mapper {
    reference: ReferenceData,
}

impl Mapper {
    pub fn new(reference: ReferenceData) -> Self {
        Self { reference }
    }

    /// Map one raw message.
    ///
    /// # Errors
    ///
    /// - [`IngestError::FieldNotFound`] if PID, OBX or OBR, or any addressed field or
    ///   component, is absent
    /// - [`IngestError::MalformedField`] if the text is not an MSH-led message, PID-3.1 is
    ///   empty, or PID-7 is not an 8-digit `YYYYMMDD` calendar date
    pub fn map(&self, raw: &str) -> IngestResult<MappedMessage> {
        let message = parse_message(raw)?;

        let patient_id = component_value(&message, "PID", 3, 1)?;
        if patient_id.trim().is_empty() {
            return Err(IngestError::malformed(
                PATIENT_ID_FIELD,
                "patient identifier is empty",
            ));
        }
        let gender_code = field_value(&message, "PID", 8)?;
        let birth_date = format_birth_date(&field_value(&message, "PID", 7)?)?;

        let observation_code = component_value(&message, "OBX", 3, 1)?;
        let observation_value = field_value(&message, "OBX", 5)?;
        let observation_display = component_value(&message, "OBR", 4, 2)?;

        tracing::debug!(%observation_code, "mapped PID/OBX/OBR fields");

        let reference = &self.reference;

        let patient = PatientResource::new(
            Identifier {
                use_type: reference.identifier_use.clone(),
                label: reference.identifier_label.clone(),
                system: reference.identifier_system.clone(),
                value: patient_id.clone(),
            },
            CodeableConcept::single(Coding {
                system: reference.gender_system.clone(),
                code: gender_code,
                display: None,
            }),
            birth_date,
            Reference {
                reference: reference.organization_reference.clone(),
                display: reference.organization_display.clone(),
            },
        );

        let observation = ObservationResource::new(
            CodeableConcept::single(Coding {
                system: reference.observation_system.clone(),
                code: observation_code,
                display: Some(observation_display),
            }),
            Quantity {
                value: QuantityValue::Text(observation_value),
            },
            reference.observation_issued.clone(),
            reference.observation_status.clone(),
            patient_reference(&patient_id, &reference.subject_display),
        );

        Ok(MappedMessage {
            patient,
            observation,
        })
    }
}

/// Map one raw message using the default [`ReferenceData`].
pub fn map_message(raw: &str) -> IngestResult<MappedMessage> {
    Mapper::default().map(raw)
}

/// Reformat an HL7 `YYYYMMDD` date as ISO `YYYY-MM-DD`.
///
/// The input must be exactly eight ASCII digits forming a real calendar date. Time
/// components (`YYYYMMDDHHMM...`) and already-formatted dates are rejected.
pub fn format_birth_date(raw: &str) -> IngestResult<String> {
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IngestError::malformed(
            BIRTH_DATE_FIELD,
            format!("expected 8 digits YYYYMMDD, got '{raw}'"),
        ));
    }

    // all ASCII digits, so these slices and parses cannot fail
    let year: i32 = raw[0..4].parse().unwrap_or_default();
    let month: u32 = raw[4..6].parse().unwrap_or_default();
    let day: u32 = raw[6..8].parse().unwrap_or_default();

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        IngestError::malformed(BIRTH_DATE_FIELD, format!("'{raw}' is not a calendar date"))
    })?;

    Ok(date.format("%Y-%m-%d").to_string())
}
