//! # Command Layer
//!
//! The rules of the journal. Each submodule holds pure functions over a
//! mutable [`State`](crate::model::State): no storage, no terminal, no clock.
//! The current time and the random source are always passed in, which keeps
//! every rule deterministic under test.
//!
//! Commands validate before they mutate, so an `Err` always leaves the state
//! untouched. Persisting the result (and rolling back when that fails) is the
//! API layer's job.
//!
//! Commands return a [`CmdResult`] carrying the [`Event`]s they produced and a
//! human readable message per event.
//!
//! - [`diary`]: submit and delete diary entries
//! - [`pets`]: reward selection, awards and evictions
//! - [`streak`]: the missed-days check
//! - [`notes`]: add, delete and complete notes
//! - [`status`]: counters and streak summary for display
//! - [`export`] / [`import`]: whole-journal documents
//! - [`doctor`]: storage health and counter drift
//! - [`helpers`]: selector resolution

use crate::events::Event;
use serde::Serialize;

pub mod diary;
pub mod doctor;
pub mod export;
pub mod helpers;
pub mod import;
pub mod notes;
pub mod pets;
pub mod status;
pub mod streak;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub events: Vec<Event>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    /// Record an event together with its message.
    pub fn push_event(&mut self, event: Event) {
        self.messages.push(event.message());
        self.events.push(event);
    }

    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn merge(&mut self, other: CmdResult) {
        self.events.extend(other.events);
        self.messages.extend(other.messages);
    }

    pub fn pets_lost(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::PetLost { .. }))
            .count()
    }
}
