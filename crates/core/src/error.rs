use docstore::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("malformed field {field}: {reason}")]
    MalformedField { field: String, reason: String },

    #[error("field not found: {0}")]
    FieldNotFound(String),

    #[error("store connection failed: {0}")]
    StoreConnection(String),
    #[error("store write failed: {0}")]
    StoreWrite(String),
    #[error("store read failed: {0}")]
    StoreRead(String),

    #[error("resource error: {0}")]
    Resource(#[from] fhir::FhirError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    pub(crate) fn malformed(field: &str, reason: impl Into<String>) -> Self {
        IngestError::MalformedField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for IngestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Connection(msg) => IngestError::StoreConnection(msg),
            StoreError::Write(msg) => IngestError::StoreWrite(msg),
            StoreError::Read(msg) => IngestError::StoreRead(msg),
            StoreError::InvalidName(_) | StoreError::InvalidId(_) => {
                IngestError::InvalidInput(err.to_string())
            }
        }
    }
}

pub type IngestResult<T> = std::result::Result<T, IngestError>;
