//! Status view: four cards summarizing backend health.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::ui::common::block;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.ctx.status();
    let snapshot = &status.snapshot;

    let rows = Layout::vertical([Constraint::Length(5), Constraint::Min(3)]).split(area);
    let cards = Layout::horizontal([Constraint::Fill(1); 4]).split(rows[0]);

    let alerts_style = if snapshot.alerts > 0 {
        Style::default().fg(app.theme.critical)
    } else {
        Style::default().fg(app.theme.healthy)
    };

    let entries = [
        ("System Health", snapshot.health.label().to_string(), app.theme.health_style(&snapshot.health)),
        ("Uptime", snapshot.uptime.clone(), Style::default().fg(app.theme.highlight)),
        ("Security", snapshot.security.clone(), Style::default().fg(app.theme.healthy)),
        ("Active Alerts", snapshot.alerts.to_string(), alerts_style),
    ];

    for ((title, value, style), card) in entries.into_iter().zip(cards.iter()) {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(value, style.add_modifier(Modifier::BOLD))),
        ];
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(block(app, Span::styled(format!(" {} ", title), app.theme.header)));
        frame.render_widget(paragraph, *card);
    }

    let details = vec![
        Line::from(vec![
            Span::raw(" Backend:     "),
            Span::raw(app.ctx.backend_description().to_string()),
        ]),
        Line::from(vec![
            Span::raw(" Last poll:   "),
            Span::raw(status.polled_at.clone().unwrap_or_else(|| "pending".to_string())),
        ]),
        Line::from(vec![Span::raw(" Polls:       "), Span::raw(status.polls.to_string())]),
        Line::from(vec![
            Span::raw(" Interval:    "),
            Span::raw(format!(
                "{}s (cached for {}s)",
                app.ctx.settings().status.poll_interval_secs,
                app.ctx.settings().status.stale_secs
            )),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            " Press r to poll now",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];
    frame.render_widget(
        Paragraph::new(details).block(block(app, Span::styled(" Backend ", app.theme.header))),
        rows[1],
    );
}
