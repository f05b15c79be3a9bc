use crate::commands::{CmdMessage, CmdResult};
use crate::store::backend::StorageBackend;
use crate::store::gateway::{RecordHealth, StateGateway};
use crate::store::Record;

#[derive(Debug)]
pub struct Diagnosis {
    pub records: Vec<(Record, RecordHealth)>,
    /// Human readable `counter: stored -> actual` lines.
    pub drift: Vec<String>,
}

impl Diagnosis {
    pub fn healthy(&self) -> bool {
        self.drift.is_empty()
            && self
                .records
                .iter()
                .all(|(_, h)| matches!(h, RecordHealth::Ok { .. } | RecordHealth::Missing))
    }

    /// Stats can be rewritten only when every other record was read cleanly;
    /// otherwise saving would replace a damaged record with an empty one.
    pub fn can_repair(&self) -> bool {
        !self.drift.is_empty()
            && self.records.iter().all(|(record, h)| match h {
                RecordHealth::Ok { .. } | RecordHealth::Missing => true,
                RecordHealth::Corrupt(_) => *record == Record::Stats,
                RecordHealth::Unavailable(_) => false,
            })
    }
}

/// Inspect every record and compare the stored counters with the collections.
pub fn diagnose<B: StorageBackend>(gateway: &StateGateway<B>) -> Diagnosis {
    let records = gateway.inspect();
    let mut drift = Vec::new();

    let stats_corrupt = records
        .iter()
        .any(|(r, h)| *r == Record::Stats && matches!(h, RecordHealth::Corrupt(_)));
    if stats_corrupt {
        drift.push("stats: unreadable -> rebuilt from collections".to_string());
    } else if let Ok(stored) = gateway.load_strict() {
        let mut actual = stored.clone();
        actual.reconcile();

        let (before, after) = (&stored.stats, &actual.stats);
        if before.dog_count != after.dog_count {
            drift.push(format!("dogCount: {} -> {}", before.dog_count, after.dog_count));
        }
        if before.cat_count != after.cat_count {
            drift.push(format!("catCount: {} -> {}", before.cat_count, after.cat_count));
        }
        if before.total_diary_count != after.total_diary_count {
            drift.push(format!(
                "totalDiaryCount: {} -> {}",
                before.total_diary_count, after.total_diary_count
            ));
        }
        if before.last_entry_timestamp != after.last_entry_timestamp {
            drift.push("lastEntryTimestamp: missing -> newest diary".to_string());
        }
    }

    Diagnosis { records, drift }
}

pub fn report(diagnosis: &Diagnosis, repaired: bool) -> CmdResult {
    let mut result = CmdResult::default();

    for (record, health) in &diagnosis.records {
        let message = match health {
            RecordHealth::Ok { items } => {
                CmdMessage::info(format!("{:<8} ok ({} item(s))", record.key(), items))
            }
            RecordHealth::Missing => {
                CmdMessage::info(format!("{:<8} not written yet", record.key()))
            }
            RecordHealth::Corrupt(why) => {
                CmdMessage::error(format!("{:<8} corrupt: {}", record.key(), why))
            }
            RecordHealth::Unavailable(why) => {
                CmdMessage::error(format!("{:<8} unavailable: {}", record.key(), why))
            }
        };
        result.add_message(message);
    }

    for line in &diagnosis.drift {
        result.add_message(CmdMessage::warning(format!("  drift {}", line)));
    }

    if diagnosis.healthy() {
        result.add_message(CmdMessage::success("No inconsistencies found."));
    } else if repaired {
        result.add_message(CmdMessage::success("Stats rewritten from the collections."));
    } else {
        result.add_message(CmdMessage::warning(
            "Inconsistencies found. Damaged records were left untouched.",
        ));
    }
    result
}
