//! # Storage Layer
//!
//! The journal persists four named records: `pets`, `notes`, `diaries` and
//! `stats`. Each record is one JSON document.
//!
//! Storage is split in two, the way a key-value store sits under a repository:
//!
//! - [`backend::StorageBackend`]: raw record I/O (the "how"). It knows
//!   nothing about the record contents.
//!   - [`fs_backend::FsBackend`]: one `<record>.json` file per record in a
//!     data directory, written atomically.
//!   - [`remote_backend::RemoteBackend`]: an HTTP document store
//!     (`GET`/`PUT {base}/{record}`).
//!   - [`mem_backend::MemBackend`]: in-process, for tests. Can simulate
//!     failures.
//! - [`gateway::StateGateway`]: decodes records into a [`State`](crate::model::State)
//!   and back (the "what"). Loading never fails: unreadable records fall back
//!   to their defaults and the stats are reconciled from the collections.
//!
//! ```text
//! <data dir>/
//! ├── pets.json
//! ├── notes.json
//! ├── diaries.json
//! └── stats.json
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod backend;
pub mod fs_backend;
pub mod gateway;
pub mod mem_backend;
pub mod remote_backend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Record {
    Pets,
    Notes,
    Diaries,
    Stats,
}

impl Record {
    /// Write order: collections first, derived stats last.
    pub const ALL: [Record; 4] = [Record::Pets, Record::Notes, Record::Diaries, Record::Stats];

    pub fn key(self) -> &'static str {
        match self {
            Record::Pets => "pets",
            Record::Notes => "notes",
            Record::Diaries => "diaries",
            Record::Stats => "stats",
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
