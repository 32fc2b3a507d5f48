//! Dashboard component modules
//!
//! Contains all individual rendering components

pub mod audit;
pub mod clients;
pub mod footer;
pub mod header;
pub mod lists;
pub mod logs;
pub mod overview;
pub mod upstreams;

use ratatui::prelude::{Color, Style};
use ratatui::widgets::{Block, BorderType, Borders, Padding};

/// Rounded panel frame shared by every tab.
pub(crate) fn panel_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1))
}
