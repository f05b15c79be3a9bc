use crate::commands::CmdResult;
use crate::document;
use crate::error::Result;
use crate::events::Event;
use crate::model::State;
use std::fs;
use std::path::Path;

/// Read and validate an import document without touching the journal.
pub fn read_path(path: &Path) -> Result<State> {
    let bytes = fs::read(path)?;
    document::parse(&bytes)
}

/// Replace the whole journal with an already validated state.
pub fn apply(state: &mut State, imported: State) -> CmdResult {
    *state = imported;
    tracing::info!(
        pets = state.pets.len(),
        notes = state.notes.len(),
        diaries = state.diaries.len(),
        "journal replaced by import"
    );

    let mut result = CmdResult::default();
    result.push_event(Event::StateImported {
        pets: state.pets.len(),
        notes: state.notes.len(),
        diaries: state.diaries.len(),
    });
    result
}
