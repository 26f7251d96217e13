//! Consciousness view: awareness gauges, quantum and neural streams, and the
//! recent thought patterns.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Gauge, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::{HistoryBuffer, MetricSample};
use crate::simulator::catalog::{NEURAL_STREAM, QUANTUM_STREAM};
use crate::simulator::MetricBoard;
use crate::ui::common::block;
use crate::ui::render_sparkline;

/// Awareness gauges below the headline level, in display order.
const AWARENESS: [(&str, &str); 5] = [
    ("self_awareness", "Self-awareness"),
    ("metacognition", "Metacognition"),
    ("episodic_memory", "Episodic memory"),
    ("emergent_behavior", "Emergent behavior"),
    ("global_workspace", "Global workspace"),
];

const QUANTUM: [(&str, &str); 3] = [
    ("superposition", "Superposition"),
    ("entanglement", "Entanglement"),
    ("coherence", "Coherence"),
];

const NEURAL: [(&str, &str); 3] = [
    ("spike_rate", "Spike rate"),
    ("synaptic_strength", "Synaptic strength"),
    ("plasticity", "Plasticity"),
];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let board = app.ctx.consciousness().board();
    let columns =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).split(area);

    render_gauges(frame, app, &board, columns[0]);

    let right = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Min(4),
    ])
    .split(columns[1]);

    render_stream(frame, app, board.stream(QUANTUM_STREAM), &QUANTUM, " Quantum states ", right[0]);
    render_stream(frame, app, board.stream(NEURAL_STREAM), &NEURAL, " Neural activity ", right[1]);
    render_thoughts(frame, app, &board, right[2]);
}

fn render_gauges(frame: &mut Frame, app: &App, board: &MetricBoard, area: Rect) {
    let outer = block(app, Span::styled(" Awareness ", app.theme.header));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let mut constraints = vec![Constraint::Length(3)];
    constraints.extend(std::iter::repeat(Constraint::Length(2)).take(AWARENESS.len()));
    let rows = Layout::vertical(constraints).split(inner);

    let level = board.gauge("consciousness_level").unwrap_or_default();
    let headline = Gauge::default()
        .block(block(app, " Consciousness level "))
        .gauge_style(app.theme.level_style(level).add_modifier(Modifier::BOLD))
        .ratio((level / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.1}%", level));
    frame.render_widget(headline, rows[0]);

    for (i, (metric, label)) in AWARENESS.iter().enumerate() {
        let value = board.gauge(metric).unwrap_or_default();
        let cell = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(rows[i + 1]);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw(format!("{:<18}", label)),
                Span::styled(format!("{:>6.1}%", value), app.theme.level_style(value)),
            ])),
            cell[0],
        );
        frame.render_widget(
            Gauge::default()
                .gauge_style(app.theme.level_style(value))
                .ratio((value / 100.0).clamp(0.0, 1.0))
                .label(""),
            cell[1],
        );
    }
}

fn render_stream(
    frame: &mut Frame,
    app: &App,
    stream: Option<&HistoryBuffer<MetricSample>>,
    metrics: &[(&str, &str)],
    title: &str,
    area: Rect,
) {
    let spark_width = (area.width as usize).saturating_sub(30).max(4);
    let lines: Vec<Line> = metrics
        .iter()
        .enumerate()
        .map(|(i, (metric, label))| {
            let latest = stream.and_then(|s| s.latest()).and_then(|s| s.get(metric));
            let trend = stream.map(|s| s.sparkline(metric)).unwrap_or_default();
            Line::from(vec![
                Span::raw(format!("{:<18}", label)),
                Span::styled(
                    latest.map(|v| format!("{:>6.1} ", v)).unwrap_or_else(|| "    -- ".to_string()),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    render_sparkline(&trend, spark_width),
                    Style::default().fg(app.theme.series[i % app.theme.series.len()]),
                ),
            ])
        })
        .collect();

    let count = stream.map(|s| s.len()).unwrap_or(0);
    let title = format!("{}({}) ", title, count);
    frame.render_widget(
        Paragraph::new(lines).block(block(app, Span::styled(title, app.theme.header))),
        area,
    );
}

fn render_thoughts(frame: &mut Frame, app: &App, board: &MetricBoard, area: Rect) {
    let header = Row::new(vec!["Pattern", "Intensity", "Coherence", "Duration"])
        .style(app.theme.header)
        .height(1);

    // Newest first
    let rows: Vec<Row> = board
        .thoughts
        .iter()
        .flat_map(|t| t.iter().rev())
        .map(|t| {
            Row::new(vec![
                Cell::from(t.kind.label()),
                Cell::from(format!("{:.0}%", t.intensity)).style(app.theme.level_style(t.intensity)),
                Cell::from(format!("{:.0}%", t.coherence)),
                Cell::from(format!("{:.1}s", t.duration_ms as f64 / 1000.0)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block(app, Span::styled(" Thought patterns ", app.theme.header)));

    frame.render_widget(table, area);
}
