//! UI rendering

use std::time::Instant;

use client_core::{LineTone, OutputLine, SegmentStyle};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{
    app::App,
    log::{ActiveProgress, NAME_PROMPT},
};

const PROGRESS_WIDTH: usize = 20;

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Scrollback
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_log(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
    if app.modal.is_visible() {
        render_search_modal(frame, app, chunks[0]);
    }
}

fn render_log(frame: &mut Frame, app: &App, area: Rect) {
    let now = Instant::now();
    let mut lines: Vec<Line> = app.log.lines().iter().map(output_line).collect();
    lines.extend(app.log.progress().iter().map(|p| progress_line(p, now)));

    let mut cursor = None;
    if let Some(input) = app.log.name_prompt() {
        cursor = Some(NAME_PROMPT.chars().count() + input.cursor_column());
        lines.push(Line::from(vec![
            Span::styled(NAME_PROMPT, segment_style(&SegmentStyle::AdminPrompt)),
            Span::raw(input.text.clone()),
        ]));
    }

    // Stick to the bottom: only the newest lines that fit are shown.
    let visible = area.height.saturating_sub(2) as usize;
    let skip = lines.len().saturating_sub(visible);
    let shown = lines.len() - skip;
    let lines: Vec<Line> = lines.into_iter().skip(skip).collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Terminal Archives ");
    frame.render_widget(Paragraph::new(lines).block(block), area);

    if let (Some(column), false) = (cursor, app.modal.is_visible()) {
        let x = area.x + 1 + column.min(area.width.saturating_sub(3) as usize) as u16;
        let y = area.y + shown as u16;
        frame.set_cursor_position((x, y));
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.status {
        Some(status) => Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(vec![
            Span::styled(" Ctrl+K", Style::default().fg(Color::Yellow)),
            Span::raw(" search · "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" close · "),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" submit · "),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::raw(" quit"),
        ]),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_search_modal(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(60, 3, area);
    let input = app.modal.input();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Search the archives ");

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(input.text.as_str()).block(block), popup);

    let column = input.cursor_column().min(popup.width.saturating_sub(3) as usize) as u16;
    frame.set_cursor_position((popup.x + 1 + column, popup.y + 1));
}

/// A box `percent_x` wide and `height` rows tall, centred in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let scaled = u32::from(area.width) * u32::from(percent_x.min(100)) / 100;
    let width = u16::try_from(scaled).unwrap_or(u16::MAX).max(20).min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn output_line(line: &OutputLine) -> Line<'static> {
    let base = match line.tone {
        LineTone::Comment => Style::default().fg(Color::DarkGray),
        LineTone::Normal | LineTone::Result => Style::default(),
    };
    let mut spans = Vec::with_capacity(line.segments.len());
    for segment in &line.segments {
        spans.push(Span::styled(
            segment.text.clone(),
            base.patch(segment_style(&segment.style)),
        ));
        if let SegmentStyle::Link { url } = &segment.style {
            if *url != segment.text {
                spans.push(Span::styled(
                    format!(" <{url}>"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }
    }
    Line::from(spans)
}

pub fn segment_style(style: &SegmentStyle) -> Style {
    match style {
        SegmentStyle::Plain => Style::default(),
        SegmentStyle::Prompt => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        SegmentStyle::Command => Style::default().fg(Color::White),
        SegmentStyle::Highlight => Style::default().fg(Color::Yellow),
        SegmentStyle::Comment => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        SegmentStyle::AdminPrompt => Style::default().fg(Color::Magenta),
        SegmentStyle::Link { .. } => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::UNDERLINED),
    }
}

fn progress_line(progress: &ActiveProgress, now: Instant) -> Line<'static> {
    let filled = (progress.ratio(now) * PROGRESS_WIDTH as f64).round() as usize;
    Line::from(vec![
        Span::styled(
            format!("{} ", progress.label),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!(
                "[{}{}]",
                "#".repeat(filled),
                ".".repeat(PROGRESS_WIDTH - filled)
            ),
            Style::default().fg(Color::Green),
        ),
    ])
}
