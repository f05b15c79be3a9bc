use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "petjournal", bin_name = "petjournal", version)]
#[command(about = "Keep a diary, grow a pet farm", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the journal records (overrides config)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write today's diary entry and earn a pet
    #[command(alias = "w")]
    Write {
        /// Diary text
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Show or delete diary entries
    #[command(alias = "d")]
    Diary {
        #[command(subcommand)]
        action: Option<DiaryAction>,
    },

    /// Manage notes; completing one earns a cat
    #[command(alias = "n")]
    Note {
        #[command(subcommand)]
        action: NoteAction,
    },

    /// List the pets on the farm
    Pets,

    /// Show counters and streak (default command)
    Status {
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the missed-days check
    Check,

    /// Export the whole journal (.gz paths are compressed)
    Export {
        /// Output file (defaults to a timestamped file in the current directory)
        path: Option<PathBuf>,
    },

    /// Replace the journal with an exported document
    Import {
        /// Exported JSON document, plain or gzipped
        path: PathBuf,
    },

    /// Check stored records and repair drifted counters
    Doctor,

    /// Show the effective configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum DiaryAction {
    /// List diary entries, newest first
    #[command(alias = "ls")]
    List,

    /// Delete a diary entry (its pet stays)
    #[command(alias = "rm")]
    Delete {
        /// Index from `diary list`, id or id prefix
        selector: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum NoteAction {
    /// Add a note
    Add {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// List notes, newest first
    #[command(alias = "ls")]
    List,

    /// Delete a note without a reward
    #[command(alias = "rm")]
    Delete {
        /// Index from `note list`, id or id prefix
        selector: String,
    },

    /// Complete a note and earn a cat
    Done {
        /// Index from `note list`, id or id prefix
        selector: String,
    },
}

impl Commands {
    /// Commands that skip the startup missed-days check.
    pub fn skips_startup_check(&self) -> bool {
        matches!(
            self,
            Commands::Check | Commands::Doctor | Commands::Config | Commands::Import { .. }
        )
    }
}
