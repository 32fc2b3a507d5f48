//! Dashboard main renderer

use super::components::{audit, clients, footer, header, lists, logs, overview, upstreams};
use super::state::{DashboardState, Tab};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Color, Style};
use ratatui::widgets::Block;

pub fn render_dashboard(f: &mut Frame, state: &DashboardState) {
    if state.with_background_color {
        f.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(16, 20, 24))),
            f.area(),
        );
    }

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Percentage(25),
            Constraint::Length(2),
        ])
        .margin(1)
        .split(f.area());

    header::render_header(f, main_chunks[0], state);

    match state.tab() {
        Tab::Overview => overview::render_overview(f, main_chunks[1], state),
        Tab::Clients => clients::render_clients(f, main_chunks[1], state),
        Tab::Lists => lists::render_lists(f, main_chunks[1], state),
        Tab::Upstreams => upstreams::render_upstreams(f, main_chunks[1], state),
        Tab::Audit => audit::render_audit(f, main_chunks[1], state),
    }

    logs::render_logs_panel(f, main_chunks[2], state);
    footer::render_footer(f, main_chunks[3], state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resources::{Metrics, PauseStatus, QueryTypes, TopBlockedDomains};
    use crate::api::{MockGoawayApi, RequestResult};
    use crate::environment::Environment;
    use crate::notify::{Notifier, SystemClock};
    use crate::ui::app::UIConfig;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tokio::sync::mpsc;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_overview_renders_metrics_cards() {
        let mut api = MockGoawayApi::new();
        api.expect_environment().return_const(Environment::default());
        api.expect_pause_status()
            .returning(|| RequestResult::ok(200, PauseStatus { time_left: 0 }));
        api.expect_metrics().returning(|| {
            RequestResult::ok(
                200,
                Metrics {
                    total: 120,
                    blocked: 30,
                    percentage_blocked: 25.0,
                    domain_block_len: 500,
                    ..Metrics::default()
                },
            )
        });
        api.expect_query_types()
            .returning(|| RequestResult::ok(200, QueryTypes::default()));
        api.expect_top_blocked_domains()
            .returning(|| RequestResult::ok(200, TopBlockedDomains::default()));

        let (sink, _events) = mpsc::channel(8);
        let notifier = Arc::new(Notifier::new(
            Box::new(SystemClock),
            Duration::from_secs(3),
            sink,
        ));
        let mut state =
            DashboardState::new(Arc::new(api), notifier, Instant::now(), UIConfig::new(false));
        state.activate();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render_dashboard(f, &state)).unwrap();

        let text = buffer_text(&terminal);
        for expected in ["120", "30", "25.0%", "500", "BLOCKING ACTIVE"] {
            assert!(text.contains(expected), "missing {expected}");
        }
    }
}
