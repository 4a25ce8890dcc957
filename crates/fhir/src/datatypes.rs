//! Shared FHIR datatypes used by the resource wire models.

use serde::{Deserialize, Serialize};

/// Business identifier for a resource (e.g. a medical record number).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Identifier {
    #[serde(rename = "use")]
    pub use_type: String,

    pub label: String,

    pub system: String,

    pub value: String,
}

/// A code defined by a terminology system.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Coding {
    pub system: String,

    pub code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// A concept expressed as one or more codings.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CodeableConcept {
    pub coding: Vec<Coding>,
}

impl CodeableConcept {
    /// A concept with exactly one coding.
    pub fn single(coding: Coding) -> Self {
        Self {
            coding: vec![coding],
        }
    }
}

/// A reference from one resource to another, with a human-readable display.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Reference {
    pub reference: String,

    pub display: String,
}

/// Measured amount. The value is kept exactly as the source supplied it.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Quantity {
    pub value: QuantityValue,
}

/// Quantity value: HL7 text copied verbatim, or a JSON number from another producer.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum QuantityValue {
    Text(String),
    Number(serde_json::Number),
}

impl From<&str> for QuantityValue {
    fn from(value: &str) -> Self {
        QuantityValue::Text(value.to_string())
    }
}
