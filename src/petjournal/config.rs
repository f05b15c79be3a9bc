//! # Configuration
//!
//! Loaded with [`confique`] from, in priority order:
//! 1. **Environment variables**: `PETJOURNAL_RULES`, `PETJOURNAL_STORAGE`, ...
//! 2. **Config file**: `petjournal.toml` in the OS config directory (via `directories`).
//! 3. **Compiled defaults**.
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `rules` | `PETJOURNAL_RULES` | `strict` | `strict` (one diary a day, streak penalty) or `relaxed` |
//! | `utc_offset_minutes` | `PETJOURNAL_UTC_OFFSET_MINUTES` | local offset | where calendar days begin |
//! | `storage.backend` | `PETJOURNAL_STORAGE` | `local` | `local` or `remote` |
//! | `storage.data_dir` | `PETJOURNAL_DATA_DIR` | OS data dir | directory for local records |
//! | `storage.remote_url` | `PETJOURNAL_REMOTE_URL` | | document store base URL |
//! | `storage.remote_token` | `PETJOURNAL_REMOTE_TOKEN` | | bearer token |
//! | `storage.timeout_secs` | `PETJOURNAL_TIMEOUT_SECS` | `10` | HTTP timeout |

use crate::error::{JournalError, Result};
use crate::rules::{RulePreset, Rules};
use chrono::{FixedOffset, Local, Offset};
use confique::Config;
use directories::ProjectDirs;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "petjournal.toml";

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "petjournal", "petjournal")
}

/// `<config dir>/petjournal.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[derive(Config, Debug, Clone)]
pub struct JournalConfig {
    /// Rule preset: "strict" or "relaxed".
    #[config(default = "strict", env = "PETJOURNAL_RULES")]
    pub rules: String,

    /// Minutes east of UTC used to decide calendar days. Local offset when unset.
    #[config(env = "PETJOURNAL_UTC_OFFSET_MINUTES")]
    pub utc_offset_minutes: Option<i32>,

    #[config(nested)]
    pub storage: StorageConfig,
}

#[derive(Config, Debug, Clone)]
pub struct StorageConfig {
    /// "local" or "remote".
    #[config(default = "local", env = "PETJOURNAL_STORAGE")]
    pub backend: String,

    #[config(env = "PETJOURNAL_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[config(env = "PETJOURNAL_REMOTE_URL")]
    pub remote_url: Option<String>,

    #[config(env = "PETJOURNAL_REMOTE_TOKEN")]
    pub remote_token: Option<String>,

    #[config(default = 10, env = "PETJOURNAL_TIMEOUT_SECS")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Remote,
}

impl FromStr for BackendKind {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(BackendKind::Local),
            "remote" => Ok(BackendKind::Remote),
            other => Err(JournalError::Config(format!(
                "unknown storage backend '{}' (expected local or remote)",
                other
            ))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Remote => write!(f, "remote"),
        }
    }
}

impl JournalConfig {
    /// Load env, then `file` (if it exists), then defaults.
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        builder
            .load()
            .map_err(|e| JournalError::Config(e.to_string()))
    }

    /// Load from the default config location.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path().as_deref())
    }

    pub fn preset(&self) -> Result<RulePreset> {
        self.rules.parse()
    }

    pub fn backend_kind(&self) -> Result<BackendKind> {
        self.storage.backend.parse()
    }

    pub fn offset(&self) -> Result<FixedOffset> {
        match self.utc_offset_minutes {
            Some(minutes) => minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| {
                    JournalError::Config(format!("utc_offset_minutes out of range: {}", minutes))
                }),
            None => Ok(Local::now().offset().fix()),
        }
    }

    pub fn rules(&self) -> Result<Rules> {
        Ok(Rules::new(self.preset()?, self.offset()?))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.storage.timeout_secs)
    }

    /// Configured data dir, or the platform default.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.storage
            .data_dir
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
    }
}
