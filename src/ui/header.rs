use std::collections::VecDeque;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Sparkline};

use crate::action::Graph;
use crate::format::{format_link_speed, overlay_line, truncate_unicode};
use crate::system::history::MetricHistory;
use crate::system::snapshot::MetricsSnapshot;
use crate::ui::theme::Theme;

/// Sparklines scale fractions to this integer range.
const SPARK_MAX: u64 = 100;

pub struct GraphStrip<'a> {
    pub snapshot: &'a MetricsSnapshot,
    pub history: &'a MetricHistory,
    pub graphs: &'a [Graph],
    pub net_label: &'a str,
}

/// Draws one sparkline per visible graph, side by side.
pub fn render_graphs(frame: &mut Frame, area: Rect, strip: &GraphStrip, theme: &Theme) {
    if strip.graphs.is_empty() {
        let line = Line::from(Span::styled(
            " all graphs hidden ",
            Style::default().fg(theme.text_secondary),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let constraints: Vec<Constraint> = strip
        .graphs
        .iter()
        .map(|_| Constraint::Ratio(1, strip.graphs.len() as u32))
        .collect();
    let chunks = Layout::horizontal(constraints).split(area);

    for (graph, chunk) in strip.graphs.iter().zip(chunks.iter()) {
        render_sparkline(frame, *chunk, *graph, strip, theme);
    }
}

fn render_sparkline(frame: &mut Frame, area: Rect, graph: Graph, strip: &GraphStrip, theme: &Theme) {
    let (title, series) = match graph {
        Graph::Cpu => (
            format!(" CPU {:.0}% ", strip.snapshot.cpu * 100.0),
            &strip.history.cpu,
        ),
        Graph::Memory => (
            format!(" MEM {:.0}% ", strip.snapshot.memory * 100.0),
            &strip.history.memory,
        ),
        Graph::Network => {
            let (util, speed) = strip
                .snapshot
                .net
                .map(|n| (n.utilization(), format_link_speed(n.link_speed_bps)))
                .unwrap_or((0.0, format_link_speed(0)));
            let label = truncate_unicode(strip.net_label, 16);
            (
                format!(" NET {:.0}% {label} {speed} ", util * 100.0),
                &strip.history.net,
            )
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.graph_color(graph))
                .add_modifier(Modifier::BOLD),
        ));

    let data = spark_data(series);
    let sparkline = Sparkline::default()
        .block(block)
        .data(&data)
        .max(SPARK_MAX)
        .style(Style::default().fg(theme.graph_color(graph)));

    frame.render_widget(sparkline, area);
}

fn spark_data(series: &VecDeque<f32>) -> Vec<u64> {
    series
        .iter()
        .map(|v| (v.clamp(0.0, 1.0) * SPARK_MAX as f32).round() as u64)
        .collect()
}

/// The numeric readout row under the graphs.
pub fn render_readout(frame: &mut Frame, area: Rect, snapshot: &MetricsSnapshot, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled(
            " wtop ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(overlay_line(snapshot), Style::default().fg(theme.pill_desc_fg)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
