use super::Record;
use crate::error::StoreResult;

/// Abstract interface for raw record I/O.
/// This trait handles the "how" of storage (filesystem, remote, memory),
/// while `StateGateway` handles the "what" (schema, fallbacks, reconciliation).
pub trait StorageBackend {
    /// Read the raw body of a record.
    /// Returns Ok(None) when the record was never written.
    /// Returns Err(Unavailable) only when the storage itself cannot be reached.
    fn read_record(&self, record: Record) -> StoreResult<Option<String>>;

    /// Replace the body of a record.
    /// MUST not leave a half-written record behind.
    fn write_record(&self, record: Record, body: &str) -> StoreResult<()>;

    /// Human readable location (directory, URL) for messages.
    fn location(&self) -> String;
}

impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn read_record(&self, record: Record) -> StoreResult<Option<String>> {
        (**self).read_record(record)
    }

    fn write_record(&self, record: Record, body: &str) -> StoreResult<()> {
        (**self).write_record(record, body)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}
