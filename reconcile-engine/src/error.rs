use thiserror::Error;

use crate::record::RecordId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A row failed the schema: missing/empty required field or wrong type.
    #[error("invalid field '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// A live edited row references an id the snapshot does not contain.
    #[error("record not found: {id}")]
    NotFound { id: RecordId },

    /// Backend failure. The message comes from the backend and is not interpreted.
    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl Error {
    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        Error::Validation { field: field.to_string(), reason: reason.into() }
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
