//! Overview view: live efficiency chart over the realtime stream.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{HistoryBuffer, MetricSample};
use crate::simulator::catalog::REALTIME_STREAM;
use crate::ui::common::block;
use crate::ui::render_sparkline;

/// Metrics plotted on the chart, in legend order.
const SERIES: [(&str, &str); 4] = [
    ("quantum", "Quantum"),
    ("consciousness", "Consciousness"),
    ("neuromorphic", "Neuromorphic"),
    ("orchestration", "Orchestration"),
];

/// Lowest value on the y axis. Every overview metric stays above it.
const Y_MIN: f64 = 90.0;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(4), Constraint::Min(6)]).split(area);

    app.ctx.overview().with_board(|board| {
        let stream = board.stream(REALTIME_STREAM);
        render_cards(frame, app, stream, chunks[0]);
        if let Some(stream) = stream {
            render_chart(frame, app, stream, chunks[1]);
        }
    });
}

fn render_cards(
    frame: &mut Frame,
    app: &App,
    stream: Option<&HistoryBuffer<MetricSample>>,
    area: Rect,
) {
    let columns = Layout::horizontal([Constraint::Fill(1); 4]).split(area);

    for (i, (metric, label)) in SERIES.iter().enumerate() {
        let latest = stream.and_then(|s| s.latest()).and_then(|s| s.get(metric));
        let value = match latest {
            Some(v) => Span::styled(
                format!("{:.1}%", v),
                app.theme.level_style(v).add_modifier(Modifier::BOLD),
            ),
            None => Span::styled("--", Style::default().add_modifier(Modifier::DIM)),
        };
        let trend = stream.map(|s| s.sparkline(metric)).unwrap_or_default();

        let lines = vec![
            Line::from(vec![value]),
            Line::from(Span::styled(
                render_sparkline(&trend, 12),
                Style::default().fg(app.theme.series[i]),
            )),
        ];
        let title = Span::styled(format!(" {} ", label), Style::default().fg(app.theme.series[i]));
        frame.render_widget(Paragraph::new(lines).block(block(app, title)), columns[i]);
    }
}

fn render_chart(frame: &mut Frame, app: &App, stream: &HistoryBuffer<MetricSample>, area: Rect) {
    let points: Vec<Vec<(f64, f64)>> = SERIES
        .iter()
        .map(|(metric, _)| {
            stream
                .series(metric)
                .into_iter()
                .enumerate()
                .map(|(x, y)| (x as f64, y))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = SERIES
        .iter()
        .zip(points.iter())
        .enumerate()
        .map(|(i, ((_, label), data))| {
            Dataset::default()
                .name(*label)
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(app.theme.series[i]))
                .data(data)
        })
        .collect();

    let first = stream.iter().next().map(|s| s.timestamp.clone()).unwrap_or_default();
    let last = stream.latest().map(|s| s.timestamp.clone()).unwrap_or_default();
    let x_max = (stream.capacity().max(2) - 1) as f64;

    let title = format!(
        " Real-time efficiency ({} samples, every {}s) ",
        stream.len(),
        app.ctx.overview().interval().as_secs_f64()
    );
    let chart = Chart::new(datasets)
        .block(block(app, Span::styled(title, app.theme.header)))
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .style(Style::default().fg(app.theme.border))
                .labels(vec![Span::raw(first), Span::raw(last)]),
        )
        .y_axis(
            Axis::default()
                .bounds([Y_MIN, 100.0])
                .style(Style::default().fg(app.theme.border))
                .labels(vec![Span::raw("90"), Span::raw("95"), Span::raw("100")]),
        );

    frame.render_widget(chart, area);
}
