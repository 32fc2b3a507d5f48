//! Blocklists tab

use super::super::state::{ActivePanels, DashboardState};
use super::super::utils::format_timestamp;
use super::panel_block;

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Cell, Paragraph, Row, Table};

pub fn render_lists(f: &mut Frame, area: Rect, state: &DashboardState) {
    let ActivePanels::Lists(lists) = state.panels() else {
        return;
    };
    let block = panel_block("BLOCKLISTS");
    let view = lists.state();
    let Some(lists) = view.value() else {
        f.render_widget(Paragraph::new("Loading...").block(block), area);
        return;
    };

    let rows = lists.lists.iter().map(|(name, list)| {
        let (status, color) = if list.active {
            ("active", Color::LightGreen)
        } else {
            ("inactive", Color::DarkGray)
        };
        Row::new(vec![
            Cell::from(name.clone()),
            Cell::from(status).style(Style::default().fg(color)),
            Cell::from(list.blocked_count.to_string()),
            Cell::from(format_timestamp(&list.last_updated)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Fill(1),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec!["Name", "Status", "Domains", "Updated"])
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
    )
    .block(block);
    f.render_widget(table, area);
}
