//! Prompt view: suggestion list, message log and input line.

use chrono::{Local, TimeZone};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::console::{ConsoleMessage, Role, SUGGESTIONS};
use crate::ui::common::block;

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let columns =
        Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)]).split(area);
    render_suggestions(frame, app, columns[0]);

    let right = Layout::vertical([Constraint::Min(4), Constraint::Length(3)]).split(columns[1]);
    render_log(frame, app, right[0]);
    render_input(frame, app, right[1]);
}

fn render_suggestions(frame: &mut Frame, app: &mut App, area: Rect) {
    let outer = block(app, Span::styled(" Suggestions ", app.theme.header));
    let inner = outer.inner(area);
    app.suggestion_area = Some(inner);

    let dim = app.ctx.console().is_sending();
    let items: Vec<ListItem> = SUGGESTIONS
        .iter()
        .map(|s| {
            let style = if dim {
                Style::default().add_modifier(Modifier::DIM)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(s.label, style)))
        })
        .collect();

    let list = List::new(items).block(outer).highlight_style(app.theme.selected);
    let mut state = ListState::default().with_selected(Some(app.selected_suggestion));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_log(frame: &mut Frame, app: &App, area: Rect) {
    let console = app.ctx.console();
    let mut lines: Vec<Line> = Vec::new();

    if console.messages().is_empty() {
        lines.push(Line::from(Span::styled(
            "No messages yet. Press i to type or pick a suggestion.",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    for message in console.messages() {
        lines.extend(message_lines(app, message));
    }
    if console.is_sending() {
        lines.push(Line::from(Span::styled(
            "… waiting for backend",
            Style::default().fg(app.theme.warning).add_modifier(Modifier::ITALIC),
        )));
    }

    // Keep the newest lines in view
    let width = area.width.saturating_sub(2).max(1) as usize;
    let height = area.height.saturating_sub(2) as usize;
    let total: usize = lines.iter().map(|l| wrapped_height(l, width)).sum();
    let scroll = total.saturating_sub(height).min(u16::MAX as usize) as u16;

    let title = format!(" Console ({}) ", console.messages().len());
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(block(app, Span::styled(title, app.theme.header)));
    frame.render_widget(paragraph, area);
}

fn message_lines<'a>(app: &App, message: &'a ConsoleMessage) -> Vec<Line<'a>> {
    let (who, color) = match message.role {
        Role::User => ("You", app.theme.user),
        Role::Assistant => ("NEXUS", app.theme.assistant),
    };
    let time = Local
        .timestamp_millis_opt(message.timestamp)
        .single()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default();

    vec![
        Line::from(vec![
            Span::styled(who, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" {}", time), Style::default().add_modifier(Modifier::DIM)),
        ]),
        Line::from(message.content.as_str()),
        Line::from(""),
    ]
}

fn wrapped_height(line: &Line, width: usize) -> usize {
    line.width().div_ceil(width).max(1)
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let console = app.ctx.console();
    let (title, border) = if app.input_active {
        (" Prompt (Enter to send) ", app.theme.highlight)
    } else {
        (" Prompt (i to type) ", app.theme.border)
    };

    let mut spans = vec![Span::raw(console.input().to_string())];
    if app.input_active {
        spans.push(Span::styled("█", Style::default().fg(app.theme.highlight)));
    }

    let input_block = block(app, Span::styled(title, app.theme.header))
        .border_style(Style::default().fg(border));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(input_block), area);
}
