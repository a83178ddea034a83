pub(crate) mod media;
mod overflow;
mod tui;
mod watch;


use anyhow::Result;
use chrono::Utc;

use crate::cli::{Cli, Command};
use crate::library::{Library, load_library};
use crate::paths::library_file_path;

use self::media::clean_description;
use self::watch::{episode_summary, progress_summary, resolve_record, truncate};

pub fn run(cli: Cli) -> Result<()> {
    let path = match cli.library {
        Some(path) => path,
        None => library_file_path()?,
    };
    let library = load_library(&path)?;
    let can_watch = !cli.guest;

    match cli.command {
        Some(Command::List) => run_list(&library, can_watch),
        Some(Command::Show { query }) => run_show(&library, &query, can_watch),
        Some(Command::Tui) | None => tui::run_tui(&library, can_watch),
    }
}

fn run_list(library: &Library, can_watch: bool) -> Result<()> {
    if library.records.is_empty() {
        println!("Library is empty. Point --library at a tracking export.");
        return Ok(());
    }

    let now = Utc::now().timestamp();
    println!(
        "{:<18} {:<40} {:<8} {:<14} {:<10} {:<24}",
        "ID", "TITLE", "FORMAT", "STATUS", "PROGRESS", "ACTION"
    );
    for record in &library.records {
        let state = resolve_record(record, now, can_watch);
        println!(
            "{:<18} {:<40} {:<8} {:<14} {:<10} {:<24}",
            truncate(&record.id, 18),
            truncate(&record.title, 40),
            record.format.label(),
            state.tier.label().unwrap_or("-"),
            progress_summary(record.progress, state.availability),
            state.action.label(),
        );
    }
    if library.skipped > 0 {
        println!("\nSkipped {} malformed entries.", library.skipped);
    }
    Ok(())
}

fn run_show(library: &Library, query: &str, can_watch: bool) -> Result<()> {
    let needle = query.trim().to_lowercase();
    let Some(record) = library
        .records
        .iter()
        .find(|record| record.title.to_lowercase().contains(&needle))
    else {
        println!("No library entry matches '{query}'.");
        return Ok(());
    };

    let now = Utc::now().timestamp();
    let state = resolve_record(record, now, can_watch);

    println!("{}", record.title);
    if let Some(label) = state.tier.label() {
        println!("  Status: {label}");
    }
    println!(
        "  {}",
        episode_summary(
            record.format,
            record.duration_minutes,
            state.tier,
            state.availability
        )
    );
    println!(
        "  Progress: {}",
        progress_summary(record.progress, state.availability)
    );
    if let Some(countdown) = state.countdown {
        println!("  Next episode in {}", countdown.label());
    }
    match state.action.target_episode() {
        Some(episode) => println!("  Action: {} (episode {episode})", state.action.label()),
        None => println!("  Action: {}", state.action.label()),
    }
    if let Some(description) = &record.description {
        println!("\n{}", truncate(&clean_description(description), 600));
    }
    Ok(())
}
