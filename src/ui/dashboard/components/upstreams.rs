//! Upstreams tab
//!
//! The selected row is the target of remove and prefer.

use super::super::state::{ActivePanels, DashboardState};
use super::panel_block;

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Paragraph, Row, Table, TableState};

pub fn render_upstreams(f: &mut Frame, area: Rect, state: &DashboardState) {
    let ActivePanels::Upstreams(upstreams) = state.panels() else {
        return;
    };
    let block = panel_block("UPSTREAMS");
    let view = upstreams.state();
    let Some(upstreams) = view.value() else {
        f.render_widget(Paragraph::new("Loading...").block(block), area);
        return;
    };

    let rows = upstreams.upstreams.iter().map(|upstream| {
        let preferred = upstream.preferred || upstream.upstream == upstreams.preferred_upstream;
        let marker = if preferred { "*" } else { " " };
        let style = if preferred {
            Style::default().fg(Color::LightGreen)
        } else {
            Style::default()
        };
        Row::new(vec![
            marker.to_string(),
            upstream.upstream.clone(),
            upstream.name.clone(),
            upstream.dns_ping.to_string(),
            upstream.icmp_ping.to_string(),
        ])
        .style(style)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(vec!["", "Upstream", "Name", "DNS", "ICMP"])
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
    )
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .block(block);

    let mut table_state = TableState::default().with_selected(Some(state.selected_upstream));
    f.render_stateful_widget(table, area, &mut table_state);
}
