use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Gauge, Paragraph, Row, Table, TableState, Wrap,
};

use crate::library::Library;

use super::super::media::{MediaFormat, MediaRecord, clean_description};
use super::super::overflow::{OverflowDetector, wrapped_line_count};
use super::super::watch::{
    Icon, Tint, WatchAction, WatchState, build_progress_gauge, episode_summary, progress_summary,
    resolve_record, truncate,
};

const COLLAPSED_DESCRIPTION_ROWS: u16 = 4;

#[allow(clippy::too_many_arguments)]
pub(super) fn draw_tui(
    frame: &mut Frame,
    library: &Library,
    table_state: &mut TableState,
    can_watch: bool,
    now: i64,
    status: &str,
    overflow: &OverflowDetector,
) -> Option<(u16, u16)> {
    let bg = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], library, table_state, can_watch);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(chunks[1]);

    draw_library_table(frame, body_chunks[0], library, table_state, can_watch, now);

    let selected = table_state
        .selected()
        .and_then(|selected| library.records.get(selected));
    let measurement = match selected {
        Some(record) => {
            let state = resolve_record(record, now, can_watch);
            draw_detail(frame, body_chunks[1], record, &state, overflow)
        }
        None => {
            let empty = Paragraph::new("No titles in this library.")
                .style(Style::default().fg(Color::Rgb(185, 195, 210)))
                .block(panel_block("Details"));
            frame.render_widget(empty, body_chunks[1]);
            None
        }
    };

    let controls = Paragraph::new(Line::from(vec![Span::styled(
        "↑/↓ select   Enter action   e expand   a account   q quit",
        Style::default().fg(Color::Rgb(185, 195, 210)),
    )]))
    .alignment(Alignment::Center)
    .block(panel_block("Controls"));
    frame.render_widget(controls, chunks[2]);

    let status_widget = Paragraph::new(status.to_string())
        .style(status_style(status))
        .block(panel_block("Status"));
    frame.render_widget(status_widget, chunks[3]);

    measurement
}

fn draw_header(
    frame: &mut Frame,
    area: Rect,
    library: &Library,
    table_state: &TableState,
    can_watch: bool,
) {
    let selected_text = table_state
        .selected()
        .map(|selected| (selected + 1).to_string())
        .unwrap_or_else(|| "-".to_string());
    let account = if can_watch { "SIGNED IN" } else { "GUEST" };
    let account_style = if can_watch {
        Style::default().fg(Color::Rgb(140, 220, 160))
    } else {
        Style::default().fg(Color::Yellow)
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "ANIVIEW",
            Style::default()
                .fg(Color::Rgb(120, 175, 255))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(
            format!("{} titles", library.records.len()),
            Style::default().fg(Color::Rgb(185, 195, 210)),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(
            format!("selected {selected_text}"),
            Style::default().fg(Color::Rgb(185, 195, 210)),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(account, account_style),
    ]))
    .alignment(Alignment::Center)
    .block(panel_block("Dashboard"));
    frame.render_widget(header, area);
}

fn draw_library_table(
    frame: &mut Frame,
    area: Rect,
    library: &Library,
    table_state: &mut TableState,
    can_watch: bool,
    now: i64,
) {
    let rows: Vec<Row> = library
        .records
        .iter()
        .map(|record| {
            let state = resolve_record(record, now, can_watch);
            Row::new(vec![
                Cell::from(truncate(&record.title, 40)),
                Cell::from(state.tier.label().unwrap_or("-")),
                Cell::from(progress_summary(record.progress, state.availability)),
                Cell::from(state.action.label()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(48),
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Min(16),
        ],
    )
    .header(
        Row::new(vec!["Title", "Status", "Progress", "Action"]).style(
            Style::default()
                .fg(Color::Rgb(120, 175, 255))
                .add_modifier(Modifier::BOLD),
        ),
    )
    .block(panel_block("Library"))
    .row_highlight_style(
        Style::default()
            .bg(Color::Rgb(120, 175, 255))
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▸ ");
    frame.render_stateful_widget(table, area, table_state);
}

fn draw_detail(
    frame: &mut Frame,
    area: Rect,
    record: &MediaRecord,
    state: &WatchState,
    overflow: &OverflowDetector,
) -> Option<(u16, u16)> {
    let detail_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(area);

    let mut lines = vec![
        Line::from(Span::styled(
            truncate(&record.title, 40),
            Style::default()
                .fg(Color::Rgb(230, 230, 230))
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    if let Some(label) = state.tier.label() {
        let style = match state.tier.tint() {
            Some(tint) => Style::default().fg(tint_color(tint)),
            None => Style::default().fg(Color::Rgb(230, 230, 230)),
        };
        let icon = state.tier.icon().map(glyph).unwrap_or(" ");
        lines.push(Line::from(Span::styled(format!("{icon} {label}"), style)));
    }
    let media_icon = if record.format == MediaFormat::Movie {
        Icon::Stopwatch
    } else {
        Icon::Film
    };
    lines.push(Line::from(Span::styled(
        format!(
            "{} {}",
            glyph(media_icon),
            episode_summary(
                record.format,
                record.duration_minutes,
                state.tier,
                state.availability
            )
        ),
        Style::default().fg(Color::Rgb(230, 230, 230)),
    )));
    if let Some(countdown) = state.countdown {
        lines.push(Line::from(Span::styled(
            format!("{} Airs in {}", glyph(Icon::Hourglass), countdown.label()),
            Style::default().fg(Color::Rgb(205, 165, 255)),
        )));
    }
    lines.push(Line::default());
    lines.push(action_pill_line(&state.action));

    let details = Paragraph::new(lines).block(panel_block("Details"));
    frame.render_widget(details, detail_chunks[0]);

    match build_progress_gauge(record.progress, state.availability) {
        Some((ratio, label)) => {
            let gauge = Gauge::default()
                .block(panel_block("Progress"))
                .gauge_style(
                    Style::default()
                        .fg(Color::Rgb(130, 190, 255))
                        .bg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                )
                .label(label)
                .ratio(ratio);
            frame.render_widget(gauge, detail_chunks[1]);
        }
        None => {
            let open_ended = Paragraph::new(format!("{} watched, total unknown", record.progress))
                .style(Style::default().fg(Color::Rgb(185, 195, 210)))
                .block(panel_block("Progress"));
            frame.render_widget(open_ended, detail_chunks[1]);
        }
    }

    draw_description(frame, detail_chunks[2], record, overflow)
}

/// Renders the description panel and reports the extents the overflow
/// protocol compares: wrapped content rows versus the collapsed viewport.
fn draw_description(
    frame: &mut Frame,
    area: Rect,
    record: &MediaRecord,
    overflow: &OverflowDetector,
) -> Option<(u16, u16)> {
    let block = panel_block("Description");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 2 || inner.width == 0 {
        return None;
    }

    let text = match &record.description {
        Some(description) => clean_description(description),
        None => String::new(),
    };
    let overflow_state = overflow.state();

    // The bottom inner row is reserved for the toggle affordance.
    let text_rows = inner.height - 1;
    let collapsed_rows = COLLAPSED_DESCRIPTION_ROWS.min(text_rows);
    let visible_rows = if overflow_state.expanded {
        text_rows
    } else {
        collapsed_rows
    };

    if text.is_empty() {
        let placeholder = Paragraph::new("No description.")
            .style(Style::default().fg(Color::Rgb(125, 135, 150)));
        frame.render_widget(placeholder, Rect { height: 1, ..inner });
        return Some((0, collapsed_rows));
    }

    let text_area = Rect {
        height: visible_rows,
        ..inner
    };
    let body = Paragraph::new(text.clone())
        .style(Style::default().fg(Color::Rgb(230, 230, 230)))
        .wrap(Wrap { trim: true });
    frame.render_widget(body, text_area);

    if overflow_state.overflowing {
        let (icon, label) = if overflow_state.expanded {
            (Icon::ChevronUp, "Show less")
        } else {
            (Icon::ChevronDown, "Show more")
        };
        let affordance = Paragraph::new(Line::from(Span::styled(
            format!("{} {label} (e)", glyph(icon)),
            Style::default()
                .fg(Color::Rgb(120, 175, 255))
                .add_modifier(Modifier::BOLD),
        )));
        let affordance_area = Rect {
            y: inner.y + inner.height - 1,
            height: 1,
            ..inner
        };
        frame.render_widget(affordance, affordance_area);
    }

    Some((wrapped_line_count(&text, inner.width), collapsed_rows))
}

fn action_pill_line(action: &WatchAction) -> Line<'static> {
    let style = if matches!(action, WatchAction::Disabled) {
        Style::default()
            .bg(Color::Rgb(72, 82, 96))
            .fg(Color::Rgb(160, 166, 178))
    } else {
        Style::default()
            .bg(Color::Rgb(120, 175, 255))
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    };
    Line::from(Span::styled(
        format!(" {} {} ", glyph(action.icon()), action.label()),
        style,
    ))
}

fn panel_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(125, 135, 150)))
        .title(title)
}

fn status_style(status: &str) -> Style {
    if status.starts_with("ERROR:") {
        Style::default()
            .fg(Color::Rgb(255, 145, 120))
            .add_modifier(Modifier::BOLD)
    } else if status.starts_with("INFO:") {
        Style::default().fg(Color::Rgb(205, 165, 255))
    } else {
        Style::default().fg(Color::Rgb(230, 235, 242))
    }
}

/// Theme seam: symbolic tints resolve to colors here, not in the engine.
fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::Success => Color::Rgb(140, 220, 160),
        Tint::Alert => Color::Rgb(255, 200, 120),
        Tint::Warning => Color::Rgb(255, 145, 120),
    }
}

fn glyph(icon: Icon) -> &'static str {
    match icon {
        Icon::Play => "▶",
        Icon::Rotate => "↻",
        Icon::Hourglass => "⧗",
        Icon::CircleCheck => "✔",
        Icon::CircleDot => "◉",
        Icon::Clock => "◷",
        Icon::Ban => "⊘",
        Icon::Film => "▦",
        Icon::Stopwatch => "◔",
        Icon::ChevronDown => "▾",
        Icon::ChevronUp => "▴",
    }
}
