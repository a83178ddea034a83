mod render;

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::TableState;

use crate::library::Library;

use super::overflow::OverflowDetector;
use super::watch::{WatchAction, resolve_record, truncate};

/// Raw mode and alternate screen, restored on every exit path.
struct TermGuard;

impl TermGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen).context("failed to enter alternate screen")?;
        Ok(Self)
    }
}

impl Drop for TermGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

pub(crate) fn run_tui(library: &Library, can_watch: bool) -> Result<()> {
    let _guard = TermGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to initialize terminal backend")?;
    terminal.clear()?;

    let mut can_watch = can_watch;
    let mut table_state = TableState::default();
    table_state.select((!library.records.is_empty()).then_some(0));

    let mut overflow = OverflowDetector::new();
    if table_state.selected().is_some() {
        overflow.mount(Instant::now());
    }

    let mut status = if library.records.is_empty() {
        status_info("Library is empty. Point --library at a tracking export.")
    } else if library.skipped > 0 {
        status_info(&format!(
            "Ready. Skipped {} malformed entries.",
            library.skipped
        ))
    } else {
        status_info("Ready.")
    };

    loop {
        let now = Utc::now().timestamp();
        let mut measured = None;
        terminal.draw(|frame| {
            measured = render::draw_tui(
                frame,
                library,
                &mut table_state,
                can_watch,
                now,
                &status,
                &overflow,
            );
        })?;
        if let Some((content, container)) = measured {
            overflow.on_tick(Instant::now(), content, container);
        }

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') => break,
            KeyCode::Up => {
                if let Some(selected) = table_state.selected() {
                    let next = selected.saturating_sub(1);
                    if next != selected {
                        table_state.select(Some(next));
                        remount(&mut overflow);
                    }
                }
            }
            KeyCode::Down => {
                if let Some(selected) = table_state.selected()
                    && !library.records.is_empty()
                {
                    let next = (selected + 1).min(library.records.len().saturating_sub(1));
                    if next != selected {
                        table_state.select(Some(next));
                        remount(&mut overflow);
                    }
                }
            }
            KeyCode::Char('e') => {
                if overflow.state().overflowing {
                    overflow.toggle_expanded();
                } else {
                    status = status_info("Description already fits on screen.");
                }
            }
            KeyCode::Char('a') => {
                can_watch = !can_watch;
                status = if can_watch {
                    status_info("Signed in. Watch actions enabled.")
                } else {
                    status_info("Guest mode. Watch actions disabled.")
                };
            }
            KeyCode::Enter => {
                let Some(record) = table_state
                    .selected()
                    .and_then(|selected| library.records.get(selected))
                else {
                    continue;
                };
                let state = resolve_record(record, now, can_watch);
                status = match state.action {
                    WatchAction::Disabled => {
                        status_error("Watching requires an account. Press a to sign in.")
                    }
                    WatchAction::AwaitNext(countdown) => status_info(&format!(
                        "Next episode of {} airs in {}.",
                        truncate(&record.title, 40),
                        countdown.label()
                    )),
                    action => match action.target_episode() {
                        Some(episode) => status_info(&format!(
                            "Jump to episode {episode} of {}.",
                            truncate(&record.title, 40)
                        )),
                        None => status_info("Nothing to play."),
                    },
                };
            }
            _ => {}
        }
    }

    terminal.show_cursor()?;
    Ok(())
}

fn remount(overflow: &mut OverflowDetector) {
    overflow.cancel();
    overflow.mount(Instant::now());
}

fn status_info(msg: &str) -> String {
    format!("INFO: {msg}")
}

fn status_error(msg: &str) -> String {
    format!("ERROR: {msg}")
}
