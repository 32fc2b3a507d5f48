//! Clients tab

use super::super::state::{ActivePanels, DashboardState};
use super::super::utils::format_timestamp;
use super::panel_block;

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Paragraph, Row, Table};

pub fn render_clients(f: &mut Frame, area: Rect, state: &DashboardState) {
    let ActivePanels::Clients(clients) = state.panels() else {
        return;
    };
    let block = panel_block("CLIENTS");
    let view = clients.state();
    let Some(list) = view.value() else {
        f.render_widget(Paragraph::new("Loading...").block(block), area);
        return;
    };

    let rows = list.clients.iter().map(|client| {
        let name = if client.name.is_empty() {
            "unknown".to_string()
        } else {
            client.name.clone()
        };
        Row::new(vec![
            client.ip.clone(),
            name,
            client.mac.clone(),
            client.vendor.clone(),
            format_timestamp(&client.last_seen),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Fill(1),
            Constraint::Length(18),
            Constraint::Fill(1),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec!["IP", "Name", "MAC", "Vendor", "Last seen"])
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
    )
    .block(block.title_bottom(format!("{} clients", list.clients.len())));
    f.render_widget(table, area);
}
