//! Dashboard footer component
//!
//! Renders key hints, the input line, or the current notification toast

use super::super::state::{DashboardState, Tab};
use super::super::utils::get_event_color;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

fn key_hints(tab: Tab) -> &'static str {
    match tab {
        Tab::Upstreams => "[A] Add | [D] Remove | [P] Prefer | [Up/Down] Select | [Tab] Next | [Q] Quit",
        Tab::Lists => "[B] Block domains | [R] Refresh | [Tab] Next | [Q] Quit",
        _ => "[1-5] Tabs | [Tab] Next | [R] Refresh | [Q] Quit",
    }
}

/// Render footer.
pub fn render_footer(f: &mut Frame, area: Rect, state: &DashboardState) {
    let (text, style) = if let Some(input) = &state.input {
        (
            format!("{}: {}_   [Enter] Submit | [Esc] Cancel", input.kind.prompt(), input.buffer),
            Style::default().fg(Color::White),
        )
    } else if let Some(toast) = &state.toast {
        (
            toast.event.msg.clone(),
            Style::default()
                .fg(get_event_color(toast.event.event_type))
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            key_hints(state.tab()).to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    };

    let footer = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(style)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Thick),
        );
    f.render_widget(footer, area);
}
