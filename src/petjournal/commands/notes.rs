use crate::commands::{pets, CmdResult};
use crate::error::{JournalError, Result};
use crate::events::Event;
use crate::model::{Note, Reward, Species, State};
use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

/// Species handed out for completing a note, independent of any draw.
pub const COMPLETION_BONUS: Species = Species::Cat;

pub fn add(state: &mut State, content: &str, now: DateTime<Utc>) -> Result<CmdResult> {
    let content = content.trim();
    if content.is_empty() {
        return Err(JournalError::Validation(
            "Note content cannot be empty".to_string(),
        ));
    }

    let note = Note::new(content.to_string(), now);
    state.notes.insert(0, note.clone());

    let mut result = CmdResult::default();
    result.push_event(Event::NoteAdded { note });
    Ok(result)
}

/// Remove a note. Deleting an id that is not there does nothing.
pub fn delete(state: &mut State, id: Uuid) -> CmdResult {
    let mut result = CmdResult::default();
    if take(state, id).is_some() {
        result.push_event(Event::NoteDeleted { id });
    }
    result
}

/// Remove a note and award the completion bonus pet.
pub fn complete<R: Rng + ?Sized>(
    state: &mut State,
    rng: &mut R,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let note = take(state, id).ok_or_else(|| JournalError::NotFound(format!("note {}", id)))?;

    let mut result = CmdResult::default();
    result.push_event(Event::NoteCompleted { note });

    let breed = pets::choose_breed(rng, COMPLETION_BONUS);
    pets::award(state, Reward::new(COMPLETION_BONUS, Some(breed)), now, &mut result);
    Ok(result)
}

fn take(state: &mut State, id: Uuid) -> Option<Note> {
    let index = state.notes.iter().position(|n| n.id == id)?;
    Some(state.notes.remove(index))
}
