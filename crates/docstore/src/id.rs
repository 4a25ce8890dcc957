//! Store-generated document identifiers.
//!
//! Two canonical forms exist, both lowercase hexadecimal:
//! - **32 characters**: a v4 UUID in simple form, generated by the file and memory stores
//!   (`550e8400e29b41d4a716446655440000`)
//! - **24 characters**: a BSON ObjectId, generated by MongoDB (`507f1f77bcf86cd799439011`)
//!
//! File-backed documents are sharded on disk by the first four characters of their id:
//! `parent_dir/<id[0..2]>/<id[2..4]>/<id>.json`

use crate::{StoreError, StoreResult};
use mongodb::bson::oid::ObjectId;
use std::path::{Path, PathBuf};
use std::{fmt, str::FromStr};
use uuid::Uuid;

const UUID_HEX_LEN: usize = 32;
const OBJECT_ID_HEX_LEN: usize = 24;

/// Identifier assigned to a document when it is inserted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentId {
    Uuid(Uuid),
    Object(ObjectId),
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentId {
    /// Generates a fresh random UUID identifier.
    pub fn new() -> Self {
        Self::Uuid(Uuid::new_v4())
    }

    /// Validates an identifier that must already be canonical.
    ///
    /// Hyphenated or upper-case forms are rejected rather than normalised.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidId`] if `input` is not canonical.
    pub fn parse(input: &str) -> StoreResult<Self> {
        if !Self::is_canonical(input) {
            return Err(StoreError::InvalidId(format!(
                "document id must be 32 or 24 lowercase hex characters, got: '{input}'"
            )));
        }
        if input.len() == OBJECT_ID_HEX_LEN {
            return ObjectId::parse_str(input)
                .map(Self::Object)
                .map_err(|e| StoreError::InvalidId(format!("'{input}': {e}")));
        }
        Uuid::parse_str(input)
            .map(Self::Uuid)
            .map_err(|e| StoreError::InvalidId(format!("'{input}': {e}")))
    }

    /// Returns true if `input` is 32 or 24 lowercase hex characters.
    pub fn is_canonical(input: &str) -> bool {
        matches!(input.len(), UUID_HEX_LEN | OBJECT_ID_HEX_LEN)
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Returns `parent_dir/<s1>/<s2>/<id>.json`.
    pub fn sharded_file(&self, parent_dir: &Path) -> PathBuf {
        let canonical = self.to_string();
        parent_dir
            .join(&canonical[0..2])
            .join(&canonical[2..4])
            .join(format!("{canonical}.json"))
    }
}

impl From<ObjectId> for DocumentId {
    fn from(oid: ObjectId) -> Self {
        Self::Object(oid)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(uuid) => write!(f, "{}", uuid.simple()),
            Self::Object(oid) => write!(f, "{}", oid.to_hex()),
        }
    }
}

impl FromStr for DocumentId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentId::parse(s)
    }
}
