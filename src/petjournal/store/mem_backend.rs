use super::backend::StorageBackend;
use super::Record;
use crate::error::{StoreError, StoreResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the journal is single-threaded,
/// which lets `StorageBackend` take `&self` everywhere.
#[derive(Default)]
pub struct MemBackend {
    records: RefCell<HashMap<Record, String>>,
    writes: Cell<usize>,
    simulate_write_error: Cell<bool>,
    fail_write_in: Cell<Option<usize>>,
    simulate_unavailable: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record with an arbitrary body (e.g. corrupt JSON).
    pub fn with_raw(self, record: Record, body: impl Into<String>) -> Self {
        self.records.borrow_mut().insert(record, body.into());
        self
    }

    /// Make every write fail.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Let `n - 1` writes through, fail the `n`th once, then recover.
    /// Simulates a save that breaks partway through its records.
    pub fn fail_nth_write(&self, n: usize) {
        self.fail_write_in.set(Some(n));
    }

    /// Make every read and write fail as if the store were unreachable.
    pub fn set_simulate_unavailable(&self, simulate: bool) {
        self.simulate_unavailable.set(simulate);
    }

    pub fn raw(&self, record: Record) -> Option<String> {
        self.records.borrow().get(&record).cloned()
    }

    /// Number of successful record writes so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl StorageBackend for MemBackend {
    fn read_record(&self, record: Record) -> StoreResult<Option<String>> {
        if self.simulate_unavailable.get() {
            return Err(StoreError::Unavailable("simulated outage".to_string()));
        }
        Ok(self.records.borrow().get(&record).cloned())
    }

    fn write_record(&self, record: Record, body: &str) -> StoreResult<()> {
        if self.simulate_unavailable.get() {
            return Err(StoreError::Unavailable("simulated outage".to_string()));
        }
        if self.simulate_write_error.get() {
            return Err(StoreError::Unavailable("simulated write error".to_string()));
        }
        if let Some(left) = self.fail_write_in.get() {
            if left <= 1 {
                self.fail_write_in.set(None);
                return Err(StoreError::Unavailable("simulated write error".to_string()));
            }
            self.fail_write_in.set(Some(left - 1));
        }
        self.records.borrow_mut().insert(record, body.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn location(&self) -> String {
        "memory://petjournal".to_string()
    }
}
