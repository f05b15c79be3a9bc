//! Terminal client: argument parsing, backend wiring and printing.
//!
//! Handlers call into [`JournalApi`] and print what comes back. This is the
//! only place that touches stdout, stderr or the process exit code.

pub mod args;
pub mod print;

use args::{Cli, Commands, DiaryAction, NoteAction};
use clap::Parser;
use petjournal::api::JournalApi;
use petjournal::config::{self, BackendKind, JournalConfig};
use petjournal::error::{JournalError, Result};
use petjournal::rules::Rules;
use petjournal::store::backend::StorageBackend;
use petjournal::store::fs_backend::FsBackend;
use petjournal::store::remote_backend::RemoteBackend;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type Api = JournalApi<Box<dyn StorageBackend>>;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = config::default_config_path();
    let config = JournalConfig::load_from(config_path.as_deref())?;
    let command = cli.command.unwrap_or(Commands::Status { json: false });

    if let Commands::Config = command {
        return handle_config(&config, config_path, cli.data_dir);
    }

    let mut api = open_api(&config, cli.data_dir)?;
    warn_about_fallbacks(&api);

    if !command.skips_startup_check() {
        startup_check(&mut api);
    }

    match command {
        Commands::Write { text } => handle_write(&mut api, text),
        Commands::Diary { action } => match action.unwrap_or(DiaryAction::List) {
            DiaryAction::List => handle_diary_list(&api),
            DiaryAction::Delete { selector } => handle_diary_delete(&mut api, &selector),
        },
        Commands::Note { action } => match action {
            NoteAction::Add { text } => handle_note_add(&mut api, text),
            NoteAction::List => handle_note_list(&api),
            NoteAction::Delete { selector } => handle_note_delete(&mut api, &selector),
            NoteAction::Done { selector } => handle_note_done(&mut api, &selector),
        },
        Commands::Pets => handle_pets(&api),
        Commands::Status { json } => handle_status(&api, json),
        Commands::Check => handle_check(&mut api),
        Commands::Export { path } => handle_export(&api, path),
        Commands::Import { path } => handle_import(&mut api, path),
        Commands::Doctor => handle_doctor(&mut api),
        Commands::Config => unreachable!("config is handled before the journal opens"),
    }
}

/// Logs go to stderr so stdout stays clean for output (and `--json`).
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("petjournal=debug")
    } else {
        EnvFilter::try_from_env("PETJOURNAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn open_api(config: &JournalConfig, data_dir: Option<PathBuf>) -> Result<Api> {
    let rules = config.rules()?;
    let backend: Box<dyn StorageBackend> = match config.backend_kind()? {
        BackendKind::Local => {
            let dir = data_dir.or_else(|| config.data_dir()).ok_or_else(|| {
                JournalError::Config("could not determine a data directory".to_string())
            })?;
            Box::new(FsBackend::new(dir))
        }
        BackendKind::Remote => {
            let url = config.storage.remote_url.clone().ok_or_else(|| {
                JournalError::Config("storage.remote_url is required for remote storage".into())
            })?;
            let mut remote = RemoteBackend::new(url, config.timeout())?;
            if let Some(token) = &config.storage.remote_token {
                remote = remote.with_token(token.clone());
            }
            Box::new(remote)
        }
    };

    tracing::debug!(location = %backend.location(), rules = %rules.preset(), "opening journal");
    Ok(JournalApi::open(backend, rules))
}

fn warn_about_fallbacks(api: &Api) {
    for (record, err) in &api.load_report().fallbacks {
        eprintln!("Warning: {} could not be read ({}); using an empty one.", record, err);
    }
}

/// The missed-days check that runs before most commands. A failure here is
/// reported but does not stop the command the user asked for.
fn startup_check(api: &mut Api) {
    match api.check_missed_days() {
        Ok(result) => print::print_messages(&result.messages),
        Err(e) => eprintln!("Warning: missed-days check failed: {}", e),
    }
}

fn join_text(words: Vec<String>) -> String {
    words.join(" ")
}

fn handle_write(api: &mut Api, text: Vec<String>) -> Result<()> {
    let result = api.submit_diary(&join_text(text))?;
    print::print_messages(&result.messages);
    Ok(())
}

fn handle_diary_list(api: &Api) -> Result<()> {
    print::print_diaries(&api.state().diaries, api.rules().offset);
    Ok(())
}

fn handle_diary_delete(api: &mut Api, selector: &str) -> Result<()> {
    let id = api.resolve_diary(selector)?;
    let result = api.delete_diary(id)?;
    print::print_messages(&result.messages);
    Ok(())
}

fn handle_note_add(api: &mut Api, text: Vec<String>) -> Result<()> {
    let result = api.add_note(&join_text(text))?;
    print::print_messages(&result.messages);
    Ok(())
}

fn handle_note_list(api: &Api) -> Result<()> {
    print::print_notes(&api.state().notes);
    Ok(())
}

fn handle_note_delete(api: &mut Api, selector: &str) -> Result<()> {
    let id = api.resolve_note(selector)?;
    let result = api.delete_note(id)?;
    print::print_messages(&result.messages);
    Ok(())
}

fn handle_note_done(api: &mut Api, selector: &str) -> Result<()> {
    let id = api.resolve_note(selector)?;
    let result = api.complete_note(id)?;
    print::print_messages(&result.messages);
    Ok(())
}

fn handle_pets(api: &Api) -> Result<()> {
    print::print_pets(api.state());
    Ok(())
}

fn handle_status(api: &Api, json: bool) -> Result<()> {
    let report = api.status();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print::print_status(&report);
    }
    Ok(())
}

fn handle_check(api: &mut Api) -> Result<()> {
    let result = api.check_missed_days()?;
    if result.events.is_empty() {
        println!("Streak is fine. No pets left the farm.");
    }
    print::print_messages(&result.messages);
    Ok(())
}

fn handle_export(api: &Api, path: Option<PathBuf>) -> Result<()> {
    let result = api.export_document(path.as_deref())?;
    print::print_messages(&result.messages);
    Ok(())
}

fn handle_import(api: &mut Api, path: PathBuf) -> Result<()> {
    let result = api.import_document(&path)?;
    print::print_messages(&result.messages);
    Ok(())
}

fn handle_doctor(api: &mut Api) -> Result<()> {
    println!("Checking {}", api.gateway().location());
    let result = api.doctor()?;
    print::print_messages(&result.messages);
    Ok(())
}

fn handle_config(
    config: &JournalConfig,
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let file = config_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    let rules: Rules = config.rules()?;
    let offset_minutes = rules.offset.local_minus_utc() / 60;

    println!("config file        = {}", file);
    println!("rules              = {}", rules.preset());
    println!("utc_offset_minutes = {}", offset_minutes);
    println!("storage.backend    = {}", config.backend_kind()?);
    match data_dir.or_else(|| config.data_dir()) {
        Some(dir) => println!("storage.data_dir   = {}", dir.display()),
        None => println!("storage.data_dir   = (unknown)"),
    }
    if let Some(url) = &config.storage.remote_url {
        println!("storage.remote_url = {}", url);
    }
    if config.storage.remote_token.is_some() {
        println!("storage.remote_token = ********");
    }
    println!("storage.timeout_secs = {}", config.storage.timeout_secs);
    Ok(())
}
