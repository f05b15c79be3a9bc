use crate::commands::{pets, CmdResult};
use crate::error::{JournalError, Result};
use crate::events::Event;
use crate::model::{calendar_day, DiaryEntry, State};
use crate::rules::{DiaryPolicy, Rules};
use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

/// Accept a diary entry and award its pet.
///
/// Under [`DiaryPolicy::OncePerDay`] a second entry on the same calendar day
/// (as seen from `rules.offset`) is rejected with `DuplicateEntry`.
pub fn submit<R: Rng + ?Sized>(
    state: &mut State,
    rules: &Rules,
    rng: &mut R,
    content: &str,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let content = content.trim();
    if content.is_empty() {
        return Err(JournalError::Validation(
            "Diary content cannot be empty".to_string(),
        ));
    }

    if rules.diary() == DiaryPolicy::OncePerDay {
        let today = calendar_day(now, rules.offset);
        if state
            .diaries
            .iter()
            .any(|d| calendar_day(d.created_at, rules.offset) == today)
        {
            tracing::debug!(%today, "diary rejected: already written today");
            return Err(JournalError::DuplicateEntry(today));
        }
    }

    let reward = pets::choose_reward(rng);
    let entry = DiaryEntry::new(content.to_string(), reward, now);
    state.diaries.insert(0, entry.clone());
    state.stats.total_diary_count += 1;
    state.stats.last_entry_timestamp = Some(now);
    state.stats.penalties_charged = 0;

    let mut result = CmdResult::default();
    let pet = pets::award(state, reward, now, &mut result);
    result.push_event(Event::DiarySaved { entry, pet });
    Ok(result)
}

/// Remove a diary entry. Absent ids are ignored.
pub fn delete(state: &mut State, id: Uuid) -> CmdResult {
    let mut result = CmdResult::default();
    let before = state.diaries.len();
    state.diaries.retain(|d| d.id != id);
    state.stats.total_diary_count = state.diaries.len();

    if state.diaries.len() != before {
        result.push_event(Event::DiaryDeleted { id });
    }
    result
}
