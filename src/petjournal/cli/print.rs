use chrono::{DateTime, FixedOffset, Utc};
use colored::Colorize;
use petjournal::commands::status::StatusReport;
use petjournal::commands::{CmdMessage, MessageLevel};
use petjournal::model::{DiaryEntry, Note, Species, State};
use petjournal::rules::PENALTY_INTERVAL_DAYS;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 16;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        println!("{}", styled(message));
    }
}

pub fn eprint_message(message: &CmdMessage) {
    eprintln!("{}", styled(message));
}

fn styled(message: &CmdMessage) -> colored::ColoredString {
    match message.level {
        MessageLevel::Info => message.content.dimmed(),
        MessageLevel::Success => message.content.green(),
        MessageLevel::Warning => message.content.yellow(),
        MessageLevel::Error => message.content.red(),
    }
}

pub fn print_diaries(diaries: &[DiaryEntry], offset: FixedOffset) {
    if diaries.is_empty() {
        println!("No diary entries yet. Try `petjournal write ...`.");
        return;
    }

    for (i, entry) in diaries.iter().enumerate() {
        let day = entry.created_at.with_timezone(&offset).format("%Y-%m-%d");
        let prefix = format!("{:>4}. {} {} ", i + 1, day, entry.pet_reward.emoji());
        print_row(&prefix, &entry.content, entry.created_at);
    }
}

pub fn print_notes(notes: &[Note]) {
    if notes.is_empty() {
        println!("No notes.");
        return;
    }

    for (i, note) in notes.iter().enumerate() {
        let prefix = format!("{:>4}. ", i + 1);
        print_row(&prefix, &note.content, note.created_at);
    }
}

pub fn print_pets(state: &State) {
    if state.pets.is_empty() {
        println!("The farm is empty. Write a diary entry to adopt a pet!");
        return;
    }

    for species in Species::ALL {
        let pets: Vec<_> = state.pets_of(species).collect();
        if pets.is_empty() {
            continue;
        }
        println!("{} {}s ({})", species.emoji(), species, pets.len());
        for pet in pets {
            let name = match pet.breed {
                Some(breed) => format!("{} {}", breed, species),
                None => species.to_string(),
            };
            let joined = format!("joined {}", format_time_ago(pet.created_at));
            println!("    {:<28}{}", name, joined.dimmed());
        }
    }
}

pub fn print_status(report: &StatusReport) {
    println!(
        "{} {}   {} {}   📔 {}   📝 {}",
        Species::Dog.emoji(),
        report.dog_count.to_string().bold(),
        Species::Cat.emoji(),
        report.cat_count.to_string().bold(),
        report.total_diary_count.to_string().bold(),
        report.note_count.to_string().bold(),
    );

    match (report.last_entry, report.days_since_last_entry) {
        (Some(last), Some(days)) => println!(
            "{}",
            format!(
                "Last entry {} ({} day(s)), rules: {}",
                format_time_ago(last).trim(),
                days,
                report.rules
            )
            .dimmed()
        ),
        _ => println!("{}", format!("No entries yet, rules: {}", report.rules).dimmed()),
    }

    if report.wrote_today {
        println!("{}", "You already wrote today. See you tomorrow!".green());
    }
    if report.show_warning {
        if let Some(days) = report.days_since_last_entry {
            println!("{}", missed_days_warning(days).yellow());
        }
    }
}

fn missed_days_warning(days: i64) -> String {
    format!(
        "⚠ {} day(s) without a diary entry. Pets leave after {}!",
        days, PENALTY_INTERVAL_DAYS
    )
}

fn print_row(prefix: &str, content: &str, created_at: DateTime<Utc>) {
    let single_line: String = content
        .chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    let available = LINE_WIDTH.saturating_sub(prefix.width() + TIME_WIDTH);
    let text = truncate_to_width(&single_line, available);
    let padding = available.saturating_sub(text.width());

    println!(
        "{}{}{}{}",
        prefix.yellow(),
        text,
        " ".repeat(padding),
        format_time_ago(created_at).dimmed()
    );
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
