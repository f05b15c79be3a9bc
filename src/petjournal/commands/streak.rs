use crate::commands::{pets, CmdResult};
use crate::events::Event;
use crate::model::State;
use crate::rules::{self, PenaltyPolicy, Rules, StreakVerdict};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Apply the missed-days rule.
///
/// Each eviction owed for the current gap is charged once: the count is kept
/// in `stats.penalties_charged` (cleared by the next diary entry), so running
/// the check again on the same gap only removes pets that became due since.
/// Evictions stop early when the farm is empty.
pub fn check_missed_days<R: Rng + ?Sized>(
    state: &mut State,
    rules: &Rules,
    rng: &mut R,
    now: DateTime<Utc>,
) -> CmdResult {
    let mut result = CmdResult::default();
    if rules.penalty() == PenaltyPolicy::Disabled {
        return result;
    }

    match rules::assess(&state.stats, now) {
        StreakVerdict::NoEntryYet | StreakVerdict::OnTrack => {}
        StreakVerdict::Warning { days } => {
            result.push_event(Event::Warning {
                days_since_last_entry: days,
            });
        }
        StreakVerdict::Penalty { days, owed } => {
            let charged = state.stats.penalties_charged;
            let due = owed.saturating_sub(charged);
            tracing::debug!(days, owed, charged, due, "streak penalty");
            if due == 0 {
                return result;
            }

            state.stats.penalties_charged = owed;
            for _ in 0..due {
                if pets::evict(state, rng, &mut result).is_none() {
                    break;
                }
            }
        }
    }

    result
}
