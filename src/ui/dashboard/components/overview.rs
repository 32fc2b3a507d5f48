//! Overview tab
//!
//! Metrics cards, query type chart and the most blocked domains

use super::super::state::{ActivePanels, DashboardState};
use super::super::utils::{format_percentage, metrics_cards, query_type_bars};
use super::panel_block;

use crate::api::resources::{Metrics, QueryTypes, TopBlockedDomains};
use crate::polling::Subscription;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Bar, BarChart, BarGroup, Paragraph, Row, Table};

const LOADING: &str = "Loading...";

pub fn render_overview(f: &mut Frame, area: Rect, state: &DashboardState) {
    let ActivePanels::Overview {
        metrics,
        query_types,
        top_blocked,
    } = state.panels()
    else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Fill(1)])
        .split(area);

    render_metrics_cards(f, chunks[0], metrics);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_query_types(f, lower[0], query_types);
    render_top_blocked(f, lower[1], top_blocked);
}

fn render_metrics_cards(f: &mut Frame, area: Rect, metrics: &Subscription<Metrics>) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let state = metrics.state();
    let values = state.value().map(metrics_cards);
    let labels = ["Total queries", "Blocked", "Blocked %", "Blocklist domains"];
    let colors = [Color::White, Color::LightRed, Color::LightYellow, Color::LightCyan];

    for (i, card) in cards.iter().enumerate() {
        let (label, value) = match &values {
            Some(values) => (values[i].0, values[i].1.clone()),
            None => (labels[i], "-".to_string()),
        };
        let paragraph = Paragraph::new(value)
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(colors[i])
                    .add_modifier(Modifier::BOLD),
            )
            .block(panel_block(label));
        f.render_widget(paragraph, *card);
    }
}

fn render_query_types(f: &mut Frame, area: Rect, query_types: &Subscription<QueryTypes>) {
    let block = panel_block("QUERY TYPES");
    let state = query_types.state();
    let Some(query_types) = state.value() else {
        f.render_widget(Paragraph::new(LOADING).block(block), area);
        return;
    };

    let bars: Vec<Bar> = query_type_bars(query_types)
        .into_iter()
        .map(|(label, count, color)| {
            Bar::default()
                .value(count)
                .label(Line::from(label))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(6)
        .bar_gap(1);
    f.render_widget(chart, area);
}

fn render_top_blocked(f: &mut Frame, area: Rect, top_blocked: &Subscription<TopBlockedDomains>) {
    let block = panel_block("TOP BLOCKED DOMAINS");
    let state = top_blocked.state();
    let Some(top_blocked) = state.value() else {
        f.render_widget(Paragraph::new(LOADING).block(block), area);
        return;
    };

    let rows = top_blocked.domains.iter().map(|domain| {
        Row::new(vec![
            domain.name.clone(),
            domain.hits.to_string(),
            format_percentage(domain.frequency),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Fill(1),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(vec!["Domain", "Hits", "Share"])
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
    )
    .block(block);
    f.render_widget(table, area);
}
