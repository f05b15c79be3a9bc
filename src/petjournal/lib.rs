//! # Pet Journal Architecture
//!
//! Pet Journal is a **habit-streak library**: write a diary entry a day and a
//! pet joins your farm; skip days and pets start leaving. The `petjournal`
//! binary is one client of it, not the other way round.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints events, owns exit codes         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns the live State, clock and random source             │
//! │  - Saves after every change, rolls back when saving fails   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - The rules: rewards, duplicate days, streak penalty       │
//! │  - Pure functions over &mut State, returning events         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - StateGateway: four JSON records, fallbacks, reconcile    │
//! │  - Backends: local files, HTTP document store, memory       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O in the core
//!
//! From `api.rs` inward nothing writes to stdout or stderr and nothing calls
//! `std::process::exit`. Diagnostics go through `tracing`; the binary decides
//! where they end up.
//!
//! ## Testing
//!
//! 1. **Commands**: most of the rule tests, with a seeded `StdRng` and fixed
//!    timestamps.
//! 2. **Store**: backends and the gateway, against `MemBackend` and `tempfile`.
//! 3. **API**: durability (commit, rollback, blocked writes) and whole scenarios.
//! 4. **CLI**: `assert_cmd` runs of the binary against a temp data dir.

pub mod api;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod model;
pub mod rules;
pub mod store;
