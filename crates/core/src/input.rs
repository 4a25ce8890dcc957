//! Assembly of HL7 messages from line-oriented input files.
//!
//! An input file holds one segment per line: MSH, PID, OBX, OBR. The message is rebuilt by
//! terminating the first three lines with `\r` and appending the fourth unterminated.

use crate::constants::{INPUT_SEGMENT_COUNT, SEGMENT_TERMINATOR};
use crate::{IngestError, IngestResult};
use std::fs;
use std::path::Path;

/// Rebuild a raw HL7 message from file contents.
///
/// Lines may end in `\n`, `\r\n` or a bare `\r`. Trailing whitespace is stripped from each
/// line. Lines after the fourth are ignored.
///
/// # Errors
///
/// Returns [`IngestError::InvalidInput`] if there are fewer than four lines.
pub fn assemble_message(text: &str) -> IngestResult<String> {
    let normalised = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalised
        .lines()
        .take(INPUT_SEGMENT_COUNT)
        .map(str::trim_end)
        .collect();

    if lines.len() < INPUT_SEGMENT_COUNT {
        return Err(IngestError::InvalidInput(format!(
            "expected {INPUT_SEGMENT_COUNT} segment lines (MSH, PID, OBX, OBR), found {}",
            lines.len()
        )));
    }

    Ok(lines.join(SEGMENT_TERMINATOR))
}

/// Read an input file and assemble its message.
pub fn read_message_file(path: &Path) -> IngestResult<String> {
    let text = fs::read_to_string(path)?;
    assemble_message(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FILE: &str = "MSH|^~\\&|MIMIC|BIDMC\n\
PID|1||123456||Doe^Jane||19700101|F   \n\
OBX|1|NM|8310-5^Temp||98.6\n\
OBR|1|||8310-5^Body temperature\n";

    #[test]
    fn joins_lines_with_segment_terminator() {
        let message = assemble_message(FILE).unwrap();
        assert_eq!(
            message,
            "MSH|^~\\&|MIMIC|BIDMC\rPID|1||123456||Doe^Jane||19700101|F\r\
OBX|1|NM|8310-5^Temp||98.6\rOBR|1|||8310-5^Body temperature"
        );
        assert!(!message.ends_with('\r'));
    }

    #[test]
    fn handles_crlf_files_and_extra_lines() {
        let text = FILE.replace('\n', "\r\n") + "NTE|1||ignored\r\n";
        let message = assemble_message(&text).unwrap();
        assert_eq!(message.matches('\r').count(), 3);
        assert!(!message.contains("NTE"));
    }

    #[test]
    fn handles_carriage_return_only_files() {
        let text =
            "MSH|^~\\&|A\rPID|1||123456||D^J||19700101|M\rOBX|1|NM|X||98.6\rOBR|1|||X^Name\r";
        let message = assemble_message(text).expect("CR-terminated file");
        assert_eq!(
            message,
            "MSH|^~\\&|A\rPID|1||123456||D^J||19700101|M\rOBX|1|NM|X||98.6\rOBR|1|||X^Name"
        );
    }

    #[test]
    fn accepts_missing_final_newline() {
        let text = FILE.trim_end();
        assert_eq!(assemble_message(text).unwrap(), assemble_message(FILE).unwrap());
    }

    #[test]
    fn rejects_short_files() {
        let text = "MSH|^~\\&\nPID|1||123\nOBX|1\n";
        assert!(matches!(
            assemble_message(text),
            Err(IngestError::InvalidInput(_))
        ));
    }

    #[test]
    fn reads_from_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("message.hl7");
        std::fs::write(&path, FILE).unwrap();

        assert_eq!(
            read_message_file(&path).unwrap(),
            assemble_message(FILE).unwrap()
        );
        assert!(matches!(
            read_message_file(&temp.path().join("missing.hl7")),
            Err(IngestError::Io(_))
        ));
    }
}
