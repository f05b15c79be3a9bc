use crate::model::{calendar_day, State};
use crate::rules::{self, PenaltyPolicy, Rules, StreakVerdict};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counters and streak summary shown on the journal's front page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub dog_count: usize,
    pub cat_count: usize,
    pub total_diary_count: usize,
    pub note_count: usize,
    pub last_entry: Option<DateTime<Utc>>,
    pub days_since_last_entry: Option<i64>,
    pub wrote_today: bool,
    pub show_warning: bool,
    pub rules: String,
}

pub fn run(state: &State, rules: &Rules, now: DateTime<Utc>) -> StatusReport {
    let today = calendar_day(now, rules.offset);
    let wrote_today = state
        .diaries
        .iter()
        .any(|d| calendar_day(d.created_at, rules.offset) == today);

    StatusReport {
        dog_count: state.stats.dog_count,
        cat_count: state.stats.cat_count,
        total_diary_count: state.stats.total_diary_count,
        note_count: state.notes.len(),
        last_entry: state.stats.last_entry_timestamp,
        days_since_last_entry: rules::days_since_last_entry(&state.stats, now),
        wrote_today,
        show_warning: rules.penalty() == PenaltyPolicy::Enabled
            && matches!(
                rules::assess(&state.stats, now),
                StreakVerdict::Warning { .. }
            ),
        rules: rules.preset().to_string(),
    }
}
