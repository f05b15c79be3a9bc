//! # API Facade
//!
//! The single entry point for journal operations, whatever the front-end.
//!
//! `JournalApi` owns the live [`State`] together with the gateway, the rules,
//! the random source and the clock. Every mutating method follows one path:
//!
//! 1. snapshot the state
//! 2. run the command function from [`crate::commands`] on the live state
//! 3. if anything changed, save all records through the gateway
//! 4. if the save fails, put the snapshot back and return `Persistence`
//!
//! So a caller only ever sees events for changes that are on disk (or in the
//! remote store), and the in-memory state never runs ahead of storage.
//!
//! Methods take `&mut self`, which makes the facade the journal's only writer.
//!
//! ## Generic parameters
//!
//! - `B: StorageBackend`: `FsBackend` or `RemoteBackend` in production,
//!   `MemBackend` in tests
//! - `R: Rng`: `StdRng` from entropy in production, seeded in tests
//!
//! The facade does no printing and holds no business rules.

use crate::commands::{self, status::StatusReport, CmdResult};
use crate::error::{JournalError, Result, StoreError};
use crate::model::State;
use crate::rules::Rules;
use crate::store::backend::StorageBackend;
use crate::store::gateway::{LoadReport, StateGateway};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use uuid::Uuid;

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

pub struct JournalApi<B: StorageBackend, R: Rng = StdRng> {
    gateway: StateGateway<B>,
    state: State,
    rules: Rules,
    rng: R,
    clock: Clock,
    load_report: LoadReport,
}

impl<B: StorageBackend> JournalApi<B, StdRng> {
    /// Load the journal from `backend`. Never fails: unreadable records fall
    /// back to empty ones and are listed in [`JournalApi::load_report`].
    pub fn open(backend: B, rules: Rules) -> Self {
        Self::open_with_rng(backend, rules, StdRng::from_entropy())
    }
}

impl<B: StorageBackend, R: Rng> JournalApi<B, R> {
    pub fn open_with_rng(backend: B, rules: Rules, rng: R) -> Self {
        let gateway = StateGateway::new(backend);
        let (state, load_report) = gateway.load();
        Self {
            gateway,
            state,
            rules,
            rng,
            clock: Box::new(Utc::now),
            load_report,
        }
    }

    /// Replace the wall clock, e.g. to replay a scenario in tests.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn gateway(&self) -> &StateGateway<B> {
        &self.gateway
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Discard the in-memory state and load it again from storage.
    pub fn reload(&mut self) -> &LoadReport {
        let (state, report) = self.gateway.load();
        self.state = state;
        self.load_report = report;
        &self.load_report
    }

    pub fn submit_diary(&mut self, content: &str) -> Result<CmdResult> {
        let now = self.now();
        self.commit("submit_diary", |state, rules, rng| {
            commands::diary::submit(state, rules, rng, content, now)
        })
    }

    pub fn check_missed_days(&mut self) -> Result<CmdResult> {
        let now = self.now();
        self.commit("check_missed_days", |state, rules, rng| {
            Ok(commands::streak::check_missed_days(state, rules, rng, now))
        })
    }

    pub fn add_note(&mut self, content: &str) -> Result<CmdResult> {
        let now = self.now();
        self.commit("add_note", |state, _, _| {
            commands::notes::add(state, content, now)
        })
    }

    pub fn delete_note(&mut self, id: Uuid) -> Result<CmdResult> {
        self.commit("delete_note", |state, _, _| {
            Ok(commands::notes::delete(state, id))
        })
    }

    pub fn complete_note(&mut self, id: Uuid) -> Result<CmdResult> {
        let now = self.now();
        self.commit("complete_note", |state, _, rng| {
            commands::notes::complete(state, rng, id, now)
        })
    }

    pub fn delete_diary(&mut self, id: Uuid) -> Result<CmdResult> {
        self.commit("delete_diary", |state, _, _| {
            Ok(commands::diary::delete(state, id))
        })
    }

    /// Map a CLI selector (index, uuid or uuid prefix) to a note id.
    pub fn resolve_note(&self, selector: &str) -> Result<Uuid> {
        commands::helpers::resolve(&self.state.notes, selector, "note")
    }

    pub fn resolve_diary(&self, selector: &str) -> Result<Uuid> {
        commands::helpers::resolve(&self.state.diaries, selector, "diary entry")
    }

    pub fn status(&self) -> StatusReport {
        commands::status::run(&self.state, &self.rules, self.now())
    }

    pub fn export_document(&self, path: Option<&Path>) -> Result<CmdResult> {
        commands::export::run(&self.state, path, self.now())
    }

    /// Replace the whole journal with the document at `path`, then reload.
    /// A malformed document leaves the journal untouched.
    pub fn import_document(&mut self, path: &Path) -> Result<CmdResult> {
        let imported = commands::import::read_path(path)?;
        // An import replaces every collection, damaged ones included.
        let result = self.commit_with("import_document", true, |state, _, _| {
            Ok(commands::import::apply(state, imported))
        })?;
        self.reload();
        Ok(result)
    }

    /// Report record health and counter drift; rewrite the stats when that is
    /// safe to do.
    pub fn doctor(&mut self) -> Result<CmdResult> {
        let diagnosis = commands::doctor::diagnose(&self.gateway);
        let mut repaired = false;

        if diagnosis.can_repair() {
            self.ensure_writable(false)?;
            let (state, report) = self.gateway.load();
            self.gateway.save_all(&state)?;
            tracing::info!("stats rewritten by doctor");
            self.state = state;
            self.load_report = report;
            repaired = true;
        }

        Ok(commands::doctor::report(&diagnosis, repaired))
    }

    /// Refuse to save over records that failed to load. A save writes every
    /// record, so it would turn an outage or a damaged collection into an
    /// empty one. `replaces_all` lets a full import overwrite damaged data.
    fn ensure_writable(&self, replaces_all: bool) -> Result<()> {
        if self.load_report.storage_unavailable() {
            return Err(JournalError::Persistence(StoreError::Unavailable(format!(
                "{} could not be read at load; refusing to overwrite it",
                self.gateway.location()
            ))));
        }
        if replaces_all {
            return Ok(());
        }
        if let Some(record) = self.load_report.damaged_collection() {
            return Err(JournalError::Persistence(StoreError::Corrupt {
                record,
                message: "could not be parsed at load; refusing to replace it. \
                          Fix the file or import a backup"
                    .to_string(),
            }));
        }
        Ok(())
    }

    /// Run `op` against the live state and persist the outcome, or roll back.
    fn commit<F>(&mut self, name: &'static str, op: F) -> Result<CmdResult>
    where
        F: FnOnce(&mut State, &Rules, &mut R) -> Result<CmdResult>,
    {
        self.commit_with(name, false, op)
    }

    fn commit_with<F>(
        &mut self,
        name: &'static str,
        replaces_all: bool,
        op: F,
    ) -> Result<CmdResult>
    where
        F: FnOnce(&mut State, &Rules, &mut R) -> Result<CmdResult>,
    {
        let snapshot = self.state.clone();

        let result = match op(&mut self.state, &self.rules, &mut self.rng) {
            Ok(result) => result,
            Err(e) => {
                self.state = snapshot;
                tracing::debug!(op = name, error = %e, "rejected");
                return Err(e);
            }
        };

        if self.state == snapshot && !replaces_all {
            tracing::debug!(op = name, "no changes to save");
            return Ok(result);
        }

        if let Err(e) = self.ensure_writable(replaces_all) {
            self.state = snapshot;
            return Err(e);
        }

        if let Err(e) = self.gateway.save_all(&self.state) {
            tracing::warn!(op = name, error = %e, "save failed, rolling back");
            self.state = snapshot;
            // Records written before the failure now disagree with memory.
            // A snapshot holding a fallback for a damaged record is not restored.
            if self.load_report.damaged_collection().is_none() {
                if let Err(restore) = self.gateway.save_all(&self.state) {
                    tracing::warn!(error = %restore, "could not restore previous records");
                }
            }
            return Err(e.into());
        }

        tracing::debug!(op = name, events = result.events.len(), "committed");
        Ok(result)
    }
}
