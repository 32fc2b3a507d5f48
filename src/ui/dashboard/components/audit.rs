//! Audit log tab

use super::super::state::{ActivePanels, DashboardState};
use super::super::utils::format_timestamp;
use super::panel_block;

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Cell, Paragraph, Row, Table};

pub fn render_audit(f: &mut Frame, area: Rect, state: &DashboardState) {
    let ActivePanels::Audit(audit) = state.panels() else {
        return;
    };
    let block = panel_block("AUDIT LOG");
    let view = audit.state();
    let Some(entries) = view.value() else {
        f.render_widget(Paragraph::new("Loading...").block(block), area);
        return;
    };

    // Newest first
    let rows = entries.iter().rev().map(|entry| {
        Row::new(vec![
            Cell::from(format_timestamp(&entry.created_at))
                .style(Style::default().fg(Color::DarkGray)),
            Cell::from(entry.topic.clone()).style(Style::default().fg(Color::LightCyan)),
            Cell::from(entry.message.clone()),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Fill(1),
        ],
    )
    .header(
        Row::new(vec!["Time", "Topic", "Message"])
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
    )
    .block(block);
    f.render_widget(table, area);
}
