//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};

/// Render the header bar with backend health, clock and generation state.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.ctx.status();
    let health_style = app.theme.health_style(&status.snapshot.health);
    let icon = if status.snapshot.health.is_excellent() { " ● " } else { " ▲ " };

    let (activity, activity_style) = if app.ctx.is_active() {
        ("LIVE", Style::default().fg(app.theme.healthy))
    } else {
        ("PAUSED", Style::default().fg(app.theme.warning).add_modifier(Modifier::BOLD))
    };

    let line = Line::from(vec![
        Span::styled(icon, health_style),
        Span::styled("NEXUS AI ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ System "),
        Span::styled(status.snapshot.health.label().to_string(), health_style),
        Span::raw(" │ "),
        Span::styled(activity, activity_style),
        Span::raw(" │ "),
        Span::raw(app.ctx.clock()),
        Span::raw(" │ "),
        Span::styled(
            app.ctx.backend_description().to_string(),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Title drawn for a view's tab.
pub fn tab_title(view: View) -> String {
    format!(" {}:{} ", view.index() + 1, view.label())
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL.iter().map(|v| Line::from(tab_title(*v))).collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .padding("", "")
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: current view, last poll time, available controls.
/// Also displays temporary status messages.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Prompt if app.input_active => "Type a prompt | Enter:send Esc:done",
        View::Prompt => "↑↓:suggestion Enter:use Alt+Enter:send i:type ?:help q:quit",
        View::Status => "r:refresh Tab:switch ?:help q:quit",
        View::Overview | View::Consciousness => "p:pause Tab:switch e:export ?:help q:quit",
    };

    let polled = app
        .ctx
        .status()
        .polled_at
        .map(|t| format!("Polled {}", t))
        .unwrap_or_else(|| "Polling...".to_string());

    let status = format!(" {} | {} | {}", app.current_view.label(), polled, controls);
    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Bordered block with the theme's border settings.
pub fn block<'a>(app: &App, title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

/// Key bindings shown in the help overlay, grouped by section.
const KEY_HELP: [(&str, &[(&str, &str)]); 3] = [
    (
        "Navigation",
        &[
            ("←/→ h/l", "Switch views"),
            ("1-4", "Jump to view"),
            ("Tab", "Next view"),
        ],
    ),
    (
        "Prompt",
        &[
            ("i or /", "Type a prompt"),
            ("↑/↓ j/k", "Select suggestion"),
            ("Enter", "Use suggestion"),
            ("Alt+Enter", "Send suggestion"),
            ("Shift+Click", "Send suggestion"),
        ],
    ),
    (
        "General",
        &[
            ("p/Space", "Pause metrics"),
            ("r", "Refresh status"),
            ("e", "Export to JSON"),
            ("q", "Quit"),
        ],
    ),
];

fn help_lines(app: &App) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled("Keyboard Shortcuts", app.theme.header))];

    for (section, keys) in KEY_HELP {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", section), bold)));
        lines.extend(keys.iter().map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("  {:<12}", key), Style::default().fg(app.theme.highlight)),
                Span::raw(*action),
            ])
        }));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().add_modifier(Modifier::DIM),
    )));
    lines
}

/// Draw the key binding overlay centered over `area`.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let lines = help_lines(app);

    let width = 42u16.min(area.width.saturating_sub(4));
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let overlay = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    let frame_block = block(app, " Help ").border_style(Style::default().fg(app.theme.highlight));
    frame.render_widget(ratatui::widgets::Clear, overlay);
    frame.render_widget(Paragraph::new(lines).block(frame_block), overlay);
}
