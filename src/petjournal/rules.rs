//! # Rules
//!
//! The habit rules come as two coherent presets and nothing in between:
//!
//! | preset    | diaries per day | streak penalty |
//! |-----------|-----------------|----------------|
//! | `strict`  | one             | on             |
//! | `relaxed` | unlimited       | off            |
//!
//! The streak penalty works on whole days since the last diary entry:
//! one to two days raise a warning, and every full [`PENALTY_INTERVAL_DAYS`]
//! costs one pet.

use crate::error::{JournalError, Result};
use crate::model::Stats;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::fmt;
use std::str::FromStr;

pub const PENALTY_INTERVAL_DAYS: i64 = 3;
pub const WARNING_THRESHOLD_DAYS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RulePreset {
    #[default]
    Strict,
    Relaxed,
}

impl FromStr for RulePreset {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(RulePreset::Strict),
            "relaxed" => Ok(RulePreset::Relaxed),
            other => Err(JournalError::Config(format!(
                "unknown rules preset '{}' (expected 'strict' or 'relaxed')",
                other
            ))),
        }
    }
}

impl fmt::Display for RulePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulePreset::Strict => f.write_str("strict"),
            RulePreset::Relaxed => f.write_str("relaxed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiaryPolicy {
    OncePerDay,
    Unlimited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenaltyPolicy {
    Enabled,
    Disabled,
}

/// The active rule set plus the offset used to decide calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    preset: RulePreset,
    pub offset: FixedOffset,
}

impl Rules {
    pub fn new(preset: RulePreset, offset: FixedOffset) -> Self {
        Self { preset, offset }
    }

    pub fn strict() -> Self {
        Self::new(RulePreset::Strict, utc())
    }

    pub fn relaxed() -> Self {
        Self::new(RulePreset::Relaxed, utc())
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn preset(&self) -> RulePreset {
        self.preset
    }

    pub fn diary(&self) -> DiaryPolicy {
        match self.preset {
            RulePreset::Strict => DiaryPolicy::OncePerDay,
            RulePreset::Relaxed => DiaryPolicy::Unlimited,
        }
    }

    pub fn penalty(&self) -> PenaltyPolicy {
        match self.preset {
            RulePreset::Strict => PenaltyPolicy::Enabled,
            RulePreset::Relaxed => PenaltyPolicy::Disabled,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::strict()
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Where the streak stands at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakVerdict {
    NoEntryYet,
    OnTrack,
    Warning { days: i64 },
    Penalty { days: i64, owed: u32 },
}

/// Whole days elapsed between `last` and `now`, floored. A clock that went
/// backwards counts as zero.
pub fn days_between(last: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(last).num_days().max(0)
}

pub fn days_since_last_entry(stats: &Stats, now: DateTime<Utc>) -> Option<i64> {
    stats.last_entry_timestamp.map(|last| days_between(last, now))
}

pub fn assess(stats: &Stats, now: DateTime<Utc>) -> StreakVerdict {
    let Some(days) = days_since_last_entry(stats, now) else {
        return StreakVerdict::NoEntryYet;
    };

    if days >= PENALTY_INTERVAL_DAYS {
        let owed = u32::try_from(days / PENALTY_INTERVAL_DAYS).unwrap_or(u32::MAX);
        StreakVerdict::Penalty { days, owed }
    } else if days >= WARNING_THRESHOLD_DAYS {
        StreakVerdict::Warning { days }
    } else {
        StreakVerdict::OnTrack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn stats_at(last: Option<DateTime<Utc>>) -> Stats {
        Stats {
            last_entry_timestamp: last,
            ..Default::default()
        }
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 10, 20, 0, 0).unwrap()
    }

    #[test]
    fn no_entry_means_no_verdict() {
        assert_eq!(assess(&stats_at(None), base()), StreakVerdict::NoEntryYet);
    }

    #[test]
    fn under_a_day_is_on_track() {
        let stats = stats_at(Some(base()));
        assert_eq!(
            assess(&stats, base() + Duration::hours(23)),
            StreakVerdict::OnTrack
        );
    }

    #[test]
    fn one_and_two_days_warn() {
        let stats = stats_at(Some(base()));
        assert_eq!(
            assess(&stats, base() + Duration::days(1)),
            StreakVerdict::Warning { days: 1 }
        );
        assert_eq!(
            assess(&stats, base() + Duration::days(2) + Duration::hours(23)),
            StreakVerdict::Warning { days: 2 }
        );
    }

    #[test]
    fn penalty_owes_one_pet_per_three_days() {
        let stats = stats_at(Some(base()));
        assert_eq!(
            assess(&stats, base() + Duration::days(3)),
            StreakVerdict::Penalty { days: 3, owed: 1 }
        );
        assert_eq!(
            assess(&stats, base() + Duration::days(7)),
            StreakVerdict::Penalty { days: 7, owed: 2 }
        );
    }

    #[test]
    fn clock_going_backwards_is_zero_days() {
        assert_eq!(days_between(base(), base() - Duration::days(2)), 0);
    }

    #[test]
    fn presets_are_coherent_pairs() {
        let strict = Rules::strict();
        assert_eq!(strict.diary(), DiaryPolicy::OncePerDay);
        assert_eq!(strict.penalty(), PenaltyPolicy::Enabled);

        let relaxed = Rules::relaxed();
        assert_eq!(relaxed.diary(), DiaryPolicy::Unlimited);
        assert_eq!(relaxed.penalty(), PenaltyPolicy::Disabled);
    }

    #[test]
    fn preset_parses_case_insensitively() {
        assert_eq!("Relaxed".parse::<RulePreset>().unwrap(), RulePreset::Relaxed);
        assert!("lenient".parse::<RulePreset>().is_err());
    }
}
