//! Events emitted by committed journal operations.
//!
//! Clients render from these instead of inspecting the state themselves. Every
//! event also maps to a ready-made [`CmdMessage`] for text front-ends.

use crate::commands::CmdMessage;
use crate::model::{DiaryEntry, Note, Pet};
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    Invalid { message: String },
    DuplicateEntry { day: NaiveDate },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    DiarySaved { entry: DiaryEntry, pet: Pet },
    DiaryRejected { reason: RejectReason },
    DiaryDeleted { id: Uuid },
    NoteAdded { note: Note },
    NoteDeleted { id: Uuid },
    NoteCompleted { note: Note },
    PetAwarded { pet: Pet },
    PetLost { pet: Pet },
    Warning { days_since_last_entry: i64 },
    StateImported {
        pets: usize,
        notes: usize,
        diaries: usize,
    },
}

impl Event {
    pub fn message(&self) -> CmdMessage {
        match self {
            Event::DiarySaved { pet, .. } => CmdMessage::success(format!(
                "Diary saved! You earned a {}.",
                pet.reward()
            )),
            Event::DiaryRejected { reason } => match reason {
                RejectReason::Invalid { message } => CmdMessage::warning(message.clone()),
                RejectReason::DuplicateEntry { day } => CmdMessage::warning(format!(
                    "You already wrote a diary entry for {}. Come back tomorrow!",
                    day
                )),
            },
            Event::DiaryDeleted { .. } => CmdMessage::info("Diary entry deleted."),
            Event::NoteAdded { note } => {
                CmdMessage::success(format!("Note added: {}", note.content))
            }
            Event::NoteDeleted { .. } => CmdMessage::info("Note deleted."),
            Event::NoteCompleted { note } => {
                CmdMessage::success(format!("Note completed: {}", note.content))
            }
            Event::PetAwarded { pet } => {
                CmdMessage::success(format!("A {} joined the farm.", pet.reward()))
            }
            Event::PetLost { pet } => CmdMessage::error(format!(
                "{} {} left the farm because the diary was neglected...",
                pet.species.emoji(),
                pet.species
            )),
            Event::Warning {
                days_since_last_entry,
            } => CmdMessage::warning(format!(
                "{} day(s) since your last diary entry. Write today or pets will start leaving!",
                days_since_last_entry
            )),
            Event::StateImported {
                pets,
                notes,
                diaries,
            } => CmdMessage::success(format!(
                "Imported {} pets, {} notes and {} diary entries.",
                pets, notes, diaries
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::model::{Reward, Species};
    use chrono::Utc;

    #[test]
    fn pet_lost_is_an_error_level_message() {
        let pet = Pet::new(Reward::new(Species::Dog, None), Utc::now());
        let msg = Event::PetLost { pet }.message();
        assert!(matches!(msg.level, MessageLevel::Error));
        assert!(msg.content.contains("dog"));
    }

    #[test]
    fn events_serialize_with_tag() {
        let json = serde_json::to_value(Event::Warning {
            days_since_last_entry: 2,
        })
        .unwrap();
        assert_eq!(json["event"], "warning");
        assert_eq!(json["days_since_last_entry"], 2);
    }
}
