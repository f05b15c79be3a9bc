use super::backend::StorageBackend;
use super::Record;
use crate::error::{StoreError, StoreResult};
use crate::model::State;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Outcome of a forgiving [`StateGateway::load`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Records that could not be read and were replaced by their defaults.
    pub fallbacks: Vec<(Record, StoreError)>,
    /// Whether the cached stats disagreed with the collections.
    pub drift_corrected: bool,
}

impl LoadReport {
    /// True when at least one record fell back because storage was unreachable.
    pub fn storage_unavailable(&self) -> bool {
        self.fallbacks
            .iter()
            .any(|(_, e)| matches!(e, StoreError::Unavailable(_)))
    }

    /// The first collection that failed to parse. Saving would replace it
    /// with an empty list. Corrupt stats are not listed: they are rebuilt.
    pub fn damaged_collection(&self) -> Option<Record> {
        self.fallbacks.iter().find_map(|(record, e)| match e {
            StoreError::Corrupt { .. } if *record != Record::Stats => Some(*record),
            _ => None,
        })
    }
}

/// Health of a single persisted record, as seen by `doctor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordHealth {
    Ok { items: usize },
    Missing,
    Corrupt(String),
    Unavailable(String),
}

/// Maps the journal [`State`] onto the four persisted records.
pub struct StateGateway<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> StateGateway<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn location(&self) -> String {
        self.backend.location()
    }

    fn read<T: DeserializeOwned>(&self, record: Record) -> StoreResult<Option<T>> {
        let Some(body) = self.backend.read_record(record)? else {
            return Ok(None);
        };
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                record,
                message: e.to_string(),
            })
    }

    fn write<T: Serialize + ?Sized>(&self, record: Record, value: &T) -> StoreResult<()> {
        let body = serde_json::to_string_pretty(value).map_err(|e| StoreError::Corrupt {
            record,
            message: e.to_string(),
        })?;
        self.backend.write_record(record, &body)
    }

    /// Load every record exactly as stored. The first failure aborts.
    pub fn load_strict(&self) -> StoreResult<State> {
        Ok(State {
            pets: self.read(Record::Pets)?.unwrap_or_default(),
            notes: self.read(Record::Notes)?.unwrap_or_default(),
            diaries: self.read(Record::Diaries)?.unwrap_or_default(),
            stats: self.read(Record::Stats)?.unwrap_or_default(),
        })
    }

    /// Load the journal without ever failing: each unreadable record is
    /// replaced by its default, then the stats are reconciled.
    pub fn load(&self) -> (State, LoadReport) {
        let mut report = LoadReport::default();
        let mut state = State {
            pets: self.read_or_default(Record::Pets, &mut report),
            notes: self.read_or_default(Record::Notes, &mut report),
            diaries: self.read_or_default(Record::Diaries, &mut report),
            stats: self.read_or_default(Record::Stats, &mut report),
        };

        report.drift_corrected = state.reconcile();
        if report.drift_corrected {
            tracing::info!("stats drifted from stored collections; reconciled");
        }
        tracing::debug!(
            location = %self.location(),
            pets = state.pets.len(),
            notes = state.notes.len(),
            diaries = state.diaries.len(),
            "journal loaded"
        );
        (state, report)
    }

    fn read_or_default<T: DeserializeOwned + Default>(
        &self,
        record: Record,
        report: &mut LoadReport,
    ) -> T {
        match self.read(record) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(%record, error = %e, "falling back to empty record");
                report.fallbacks.push((record, e));
                T::default()
            }
        }
    }

    /// Write all four records. Stats go last so an interrupted save leaves
    /// at worst stale counters, which the next load reconciles.
    pub fn save_all(&self, state: &State) -> StoreResult<()> {
        self.write(Record::Pets, &state.pets)?;
        self.write(Record::Notes, &state.notes)?;
        self.write(Record::Diaries, &state.diaries)?;
        self.write(Record::Stats, &state.stats)?;
        Ok(())
    }

    /// Check each record independently.
    pub fn inspect(&self) -> Vec<(Record, RecordHealth)> {
        Record::ALL
            .iter()
            .map(|&record| (record, self.record_health(record)))
            .collect()
    }

    fn record_health(&self, record: Record) -> RecordHealth {
        let body = match self.backend.read_record(record) {
            Ok(Some(body)) => body,
            Ok(None) => return RecordHealth::Missing,
            Err(StoreError::Corrupt { message, .. }) => return RecordHealth::Corrupt(message),
            Err(e) => return RecordHealth::Unavailable(e.to_string()),
        };

        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(serde_json::Value::Array(items)) => {
                if record == Record::Stats {
                    return RecordHealth::Corrupt("expected an object".to_string());
                }
                match self.read_typed_len(record) {
                    Ok(_) => RecordHealth::Ok { items: items.len() },
                    Err(e) => RecordHealth::Corrupt(e),
                }
            }
            Ok(_) if record == Record::Stats => match self.read_typed_len(record) {
                Ok(_) => RecordHealth::Ok { items: 1 },
                Err(e) => RecordHealth::Corrupt(e),
            },
            Ok(_) => RecordHealth::Corrupt("expected an array".to_string()),
            Err(e) => RecordHealth::Corrupt(e.to_string()),
        }
    }

    fn read_typed_len(&self, record: Record) -> std::result::Result<(), String> {
        let result = match record {
            Record::Pets => self.read::<Vec<crate::model::Pet>>(record).map(|_| ()),
            Record::Notes => self.read::<Vec<crate::model::Note>>(record).map(|_| ()),
            Record::Diaries => self.read::<Vec<crate::model::DiaryEntry>>(record).map(|_| ()),
            Record::Stats => self.read::<crate::model::Stats>(record).map(|_| ()),
        };
        result.map_err(|e| match e {
            StoreError::Corrupt { message, .. } => message,
            other => other.to_string(),
        })
    }
}
