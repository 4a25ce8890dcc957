//! Field addressing over parsed HL7v2 messages.
//!
//! Locations are written `SEG-F` for a whole field and `SEG-F.C` for a component, both
//! 1-indexed (`PID-3.1` is the first component of the third PID field). Components are read
//! from the first repetition of a field. The first occurrence of a segment is used.

use crate::{IngestError, IngestResult};
use hl7_parser::Message;

/// Parse a raw message. `\r`, `\n` and `\r\n` are all accepted as segment terminators.
///
/// # Errors
///
/// Returns [`IngestError::MalformedField`] if the text is not an MSH-led HL7v2 message.
pub fn parse_message(raw: &str) -> IngestResult<Message<'_>> {
    Message::parse_with_lenient_newlines(raw, true)
        .map_err(|e| IngestError::malformed("message", e.to_string()))
}

/// Raw value of a whole field.
///
/// # Errors
///
/// Returns [`IngestError::FieldNotFound`] if the segment or field is absent.
pub fn field_value(message: &Message<'_>, segment: &str, field: usize) -> IngestResult<String> {
    let value = message
        .segment(segment)
        .ok_or_else(|| IngestError::FieldNotFound(format!("segment {segment}")))?
        .field(field)
        .ok_or_else(|| IngestError::FieldNotFound(format!("{segment}-{field}")))?
        .raw_value();
    Ok(value.to_string())
}

/// Raw value of one component of a field.
///
/// # Errors
///
/// Returns [`IngestError::FieldNotFound`] if the segment, field or component is absent.
pub fn component_value(
    message: &Message<'_>,
    segment: &str,
    field: usize,
    component: usize,
) -> IngestResult<String> {
    let value = message
        .segment(segment)
        .ok_or_else(|| IngestError::FieldNotFound(format!("segment {segment}")))?
        .field(field)
        .ok_or_else(|| IngestError::FieldNotFound(format!("{segment}-{field}")))?
        .component(component)
        .ok_or_else(|| IngestError::FieldNotFound(format!("{segment}-{field}.{component}")))?
        .raw_value();
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: &str = "MSH|^~\\&|MIMIC|BIDMC|EHR|HOSP|20130403153010||ORU^R01|MSG00001|P|2.5\r\
PID|1||123456^^^BIDMC^MR||van de Heuvel^Pieter||19700101|M\r\
OBX|1|NM|8310-5^Body temperature^LN||98.6|degF|||||F\r\
OBR|1|||8310-5^Body temperature";

    #[test]
    fn reads_fields_and_components() {
        let message = parse_message(MESSAGE).expect("parse message");

        assert_eq!(field_value(&message, "PID", 7).unwrap(), "19700101");
        assert_eq!(field_value(&message, "PID", 8).unwrap(), "M");
        assert_eq!(field_value(&message, "OBX", 5).unwrap(), "98.6");
        assert_eq!(component_value(&message, "PID", 3, 1).unwrap(), "123456");
        assert_eq!(component_value(&message, "OBX", 3, 1).unwrap(), "8310-5");
        assert_eq!(
            component_value(&message, "OBR", 4, 2).unwrap(),
            "Body temperature"
        );
    }

    #[test]
    fn accepts_newline_terminated_segments() {
        let text = MESSAGE.replace('\r', "\n");
        let message = parse_message(&text).expect("parse message");
        assert_eq!(component_value(&message, "OBR", 4, 2).unwrap(), "Body temperature");

        let text = MESSAGE.replace('\r', "\r\n");
        let message = parse_message(&text).expect("parse message");
        assert_eq!(field_value(&message, "PID", 8).unwrap(), "M");
    }

    #[test]
    fn repeated_field_uses_first_repetition() {
        let text = MESSAGE.replace("123456^^^BIDMC^MR", "123456^^^BIDMC^MR~999^^^OTHER^MR");
        let message = parse_message(&text).unwrap();
        assert_eq!(component_value(&message, "PID", 3, 1).unwrap(), "123456");
    }

    #[test]
    fn missing_locations_name_what_is_absent() {
        let message = parse_message(MESSAGE).unwrap();

        match field_value(&message, "NTE", 1) {
            Err(IngestError::FieldNotFound(msg)) => assert!(msg.contains("NTE")),
            other => panic!("expected FieldNotFound, got {other:?}"),
        }
        match field_value(&message, "PID", 30) {
            Err(IngestError::FieldNotFound(msg)) => assert_eq!(msg, "PID-30"),
            other => panic!("expected FieldNotFound, got {other:?}"),
        }
        match component_value(&message, "OBR", 4, 9) {
            Err(IngestError::FieldNotFound(msg)) => assert_eq!(msg, "OBR-4.9"),
            other => panic!("expected FieldNotFound, got {other:?}"),
        }
    }

    #[test]
    fn non_hl7_text_is_malformed() {
        for raw in ["", "hello world", "PID|1||123456"] {
            match parse_message(raw) {
                Err(IngestError::MalformedField { field, .. }) => assert_eq!(field, "message"),
                other => panic!("expected MalformedField for {raw:?}, got {other:?}"),
            }
        }
    }
}
