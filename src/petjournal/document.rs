//! The whole-journal transfer document used by export and import.
//!
//! ```json
//! { "version": 1, "exportedAt": "...", "pets": [], "notes": [], "diaries": [], "stats": {} }
//! ```
//!
//! Written as pretty JSON, optionally gzip-compressed. Readers detect gzip by
//! its magic bytes, so the file extension does not matter on import.

use crate::error::{JournalError, Result};
use crate::model::{DiaryEntry, Note, Pet, State, Stats};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

pub const DOCUMENT_VERSION: u32 = 1;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalDocument<'a> {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub pets: &'a [Pet],
    pub notes: &'a [Note],
    pub diaries: &'a [DiaryEntry],
    pub stats: &'a Stats,
}

impl<'a> JournalDocument<'a> {
    pub fn new(state: &'a State, exported_at: DateTime<Utc>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            exported_at,
            pets: &state.pets,
            notes: &state.notes,
            diaries: &state.diaries,
            stats: &state.stats,
        }
    }

    pub fn write_to<W: Write>(&self, mut writer: W, compress: bool) -> Result<()> {
        if compress {
            let mut encoder = GzEncoder::new(&mut writer, Compression::default());
            serde_json::to_writer_pretty(&mut encoder, self)?;
            encoder.finish()?;
        } else {
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Loose shape accepted on import; required collections are checked by hand
/// so the error names what is missing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomingDocument {
    version: Option<u32>,
    pets: Option<Vec<Pet>>,
    notes: Option<Vec<Note>>,
    diaries: Option<Vec<DiaryEntry>>,
    stats: Option<Stats>,
}

/// Decode an import document into a reconciled [`State`].
///
/// `pets` and `diaries` must be present. `notes` and `stats` default to
/// empty; the stats counters are always recomputed from the collections.
pub fn parse(bytes: &[u8]) -> Result<State> {
    let json = if bytes.starts_with(&GZIP_MAGIC) {
        let mut decoded = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut decoded)
            .map_err(|e| JournalError::MalformedImport(format!("bad gzip stream: {}", e)))?;
        decoded
    } else {
        bytes.to_vec()
    };

    let incoming: IncomingDocument = serde_json::from_slice(&json)
        .map_err(|e| JournalError::MalformedImport(e.to_string()))?;

    if let Some(version) = incoming.version {
        if version > DOCUMENT_VERSION {
            return Err(JournalError::MalformedImport(format!(
                "unsupported document version {}",
                version
            )));
        }
    }

    let pets = incoming
        .pets
        .ok_or_else(|| JournalError::MalformedImport("missing \"pets\"".to_string()))?;
    let diaries = incoming
        .diaries
        .ok_or_else(|| JournalError::MalformedImport("missing \"diaries\"".to_string()))?;

    let mut state = State {
        pets,
        notes: incoming.notes.unwrap_or_default(),
        diaries,
        stats: incoming.stats.unwrap_or_default(),
    };
    state.reconcile();
    Ok(state)
}
