//! Dashboard header component
//!
//! Renders the title, the tab bar and the blocking status gauge

use super::super::state::{DashboardState, Tab};
use super::super::utils::format_time_left;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph, Tabs};

/// Render header with title, tabs and pause status.
pub fn render_header(f: &mut Frame, area: Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let version = env!("CARGO_PKG_VERSION");
    let title = Paragraph::new(format!("GOAWAY DASHBOARD v{} - {}", version, state.environment))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, header_chunks[0]);

    let row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(header_chunks[1]);

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab)))
        .collect();
    let tabs = Tabs::new(titles)
        .select(state.tab().index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    f.render_widget(tabs, row[0]);

    render_pause_gauge(f, row[1], state);
}

fn render_pause_gauge(f: &mut Frame, area: Rect, state: &DashboardState) {
    let pause = state.pause().and_then(|pause| pause.current());
    let (label, color, percent) = match pause {
        Some(status) if status.is_paused() => {
            // Cycles once per minute while paused
            let percent = ((status.time_left % 60) as f64 / 60.0 * 100.0) as u16;
            (
                format!("PAUSED - resumes in {}", format_time_left(status.time_left)),
                Color::LightYellow,
                percent,
            )
        }
        Some(_) => ("BLOCKING ACTIVE".to_string(), Color::LightGreen, 100),
        None => ("BLOCKING STATUS UNKNOWN".to_string(), Color::DarkGray, 0),
    };

    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(color)
                .add_modifier(Modifier::BOLD),
        )
        .percent(percent.min(100))
        .label(label);
    f.render_widget(gauge, area);
}
