use crate::events::{Event, RejectReason};
use crate::store::Record;
use chrono::NaiveDate;
use thiserror::Error;

/// Failures raised by a storage backend or the gateway decoding its records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt {record} record: {message}")]
    Corrupt { record: Record, message: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("{0}")]
    Validation(String),

    #[error("A diary entry already exists for {0}")]
    DuplicateEntry(NaiveDate),

    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("Malformed import: {0}")]
    MalformedImport(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl JournalError {
    /// The `DiaryRejected` event for errors that reject a diary submission.
    pub fn rejection(&self) -> Option<Event> {
        let reason = match self {
            JournalError::Validation(message) => RejectReason::Invalid {
                message: message.clone(),
            },
            JournalError::DuplicateEntry(day) => RejectReason::DuplicateEntry { day: *day },
            _ => return None,
        };
        Some(Event::DiaryRejected { reason })
    }
}

pub type Result<T> = std::result::Result<T, JournalError>;
