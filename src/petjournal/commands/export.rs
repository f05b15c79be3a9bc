use crate::commands::{CmdMessage, CmdResult};
use crate::document::JournalDocument;
use crate::error::Result;
use crate::model::State;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub fn default_filename(now: DateTime<Utc>) -> PathBuf {
    PathBuf::from(format!(
        "petjournal-{}.json",
        now.format("%Y-%m-%d_%H-%M-%S")
    ))
}

/// Paths ending in `.gz` get a gzip-compressed document.
pub fn wants_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Write the whole journal to `path` (or a timestamped file in the current
/// directory). Never touches the state.
pub fn run(state: &State, path: Option<&Path>, now: DateTime<Utc>) -> Result<CmdResult> {
    let target = path.map(Path::to_path_buf).unwrap_or_else(|| default_filename(now));

    let file = File::create(&target)?;
    JournalDocument::new(state, now).write_to(BufWriter::new(file), wants_gzip(&target))?;
    tracing::info!(path = %target.display(), "journal exported");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} pets, {} notes and {} diary entries to {}",
        state.pets.len(),
        state.notes.len(),
        state.diaries.len(),
        target.display()
    )));
    Ok(result)
}
