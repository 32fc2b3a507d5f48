//! Dashboard state update logic
//!
//! Contains all methods for updating dashboard state from notifications and keys

use super::state::{DashboardState, InputKind, InputPrompt, Tab, Toast};

use crate::consts::cli_consts::notifications::toast_duration;
use crate::events::Event;

use crossterm::event::{KeyCode, KeyEvent};
use std::sync::Arc;
use std::time::Instant;

/// What the app loop should do after a key press.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

impl DashboardState {
    /// Update the dashboard state with new tick and queued notifications.
    pub fn update(&mut self) {
        self.tick += 1;

        // Process all queued events one by one
        while let Some(event) = self.pending_events.pop_front() {
            self.show_toast(event.clone());
            self.add_to_activity_log(event);
        }

        self.expire_toast(Instant::now());

        // A finished add/remove/prefer changes what the visible tab shows.
        if self.take_finished_actions() > 0 {
            self.refresh();
        }
    }

    fn show_toast(&mut self, event: Event) {
        if event.should_display() {
            self.toast = Some(Toast {
                event,
                shown_at: Instant::now(),
            });
        }
    }

    pub(crate) fn expire_toast(&mut self, now: Instant) {
        if let Some(toast) = &self.toast {
            if now.duration_since(toast.shown_at) >= toast_duration() {
                self.toast = None;
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if self.input.is_some() {
            self.handle_input_key(key);
            return KeyOutcome::Continue;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Tab | KeyCode::Right => self.select_tab(self.tab().next()),
            KeyCode::BackTab | KeyCode::Left => self.select_tab(self.tab().previous()),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(tab) = Tab::from_digit(c) {
                    self.select_tab(tab);
                }
            }
            KeyCode::Char('r') => self.refresh(),
            _ => self.handle_tab_key(key.code),
        }
        KeyOutcome::Continue
    }

    fn handle_tab_key(&mut self, code: KeyCode) {
        match (self.tab(), code) {
            (Tab::Upstreams, KeyCode::Up | KeyCode::Char('k')) => {
                self.selected_upstream = self.selected_upstream.saturating_sub(1);
            }
            (Tab::Upstreams, KeyCode::Down | KeyCode::Char('j')) => {
                let last = self.upstream_count().saturating_sub(1);
                self.selected_upstream = (self.selected_upstream + 1).min(last);
            }
            (Tab::Upstreams, KeyCode::Char('a')) => self.open_input(InputKind::AddUpstream),
            (Tab::Upstreams, KeyCode::Char('d')) => self.remove_selected_upstream(),
            (Tab::Upstreams, KeyCode::Char('p')) => self.prefer_selected_upstream(),
            (Tab::Lists, KeyCode::Char('b')) => self.open_input(InputKind::BlockDomains),
            _ => {}
        }
    }

    fn open_input(&mut self, kind: InputKind) {
        self.input = Some(InputPrompt {
            kind,
            buffer: String::new(),
        });
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let Some(input) = self.input.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.input = None,
            KeyCode::Backspace => {
                input.buffer.pop();
            }
            KeyCode::Char(c) => input.buffer.push(c),
            KeyCode::Enter => {
                if let Some(input) = self.input.take() {
                    self.submit_input(input);
                }
            }
            _ => {}
        }
    }

    fn submit_input(&mut self, input: InputPrompt) {
        let value = input.buffer.trim().to_string();
        if value.is_empty() {
            return;
        }
        match input.kind {
            InputKind::AddUpstream => self.add_upstream(value),
            InputKind::BlockDomains => {
                let domains: Vec<String> = value.split_whitespace().map(str::to_string).collect();
                self.block_domains(domains);
            }
        }
    }

    fn add_upstream(&mut self, upstream: String) {
        let api = Arc::clone(self.api());
        let notifier = Arc::clone(self.notifier());
        self.track_action(tokio::spawn(async move {
            let succeeded = api.add_upstream(&upstream).await.is_success();
            if succeeded {
                notifier.success(format!("Added upstream {}", upstream));
            }
            succeeded
        }));
    }

    fn remove_selected_upstream(&mut self) {
        let Some(upstream) = self.selected_upstream_address() else {
            return;
        };
        let api = Arc::clone(self.api());
        let notifier = Arc::clone(self.notifier());
        self.selected_upstream = self.selected_upstream.saturating_sub(1);
        self.track_action(tokio::spawn(async move {
            let succeeded = api.remove_upstream(&upstream).await.is_success();
            if succeeded {
                notifier.success(format!("Removed upstream {}", upstream));
            }
            succeeded
        }));
    }

    fn prefer_selected_upstream(&mut self) {
        let Some(upstream) = self.selected_upstream_address() else {
            return;
        };
        let api = Arc::clone(self.api());
        let notifier = Arc::clone(self.notifier());
        self.track_action(tokio::spawn(async move {
            let succeeded = api.set_preferred_upstream(&upstream).await.is_success();
            if succeeded {
                notifier.success(format!("Preferred upstream is now {}", upstream));
            }
            succeeded
        }));
    }

    fn block_domains(&mut self, domains: Vec<String>) {
        let api = Arc::clone(self.api());
        let notifier = Arc::clone(self.notifier());
        self.track_action(tokio::spawn(async move {
            let succeeded = api.add_custom_domains(&domains).await.is_success();
            if succeeded {
                notifier.success(format!("Blocked {}", domains.join(", ")));
            }
            succeeded
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resources::{Lists, PauseStatus};
    use crate::api::{MockGoawayApi, RequestResult};
    use crate::environment::Environment;
    use crate::notify::{Notifier, SystemClock};
    use crate::ui::app::UIConfig;
    use crossterm::event::KeyModifiers;
    use mockall::predicate::eq;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn dashboard(api: MockGoawayApi) -> (DashboardState, mpsc::Receiver<Event>) {
        let (sink, events) = mpsc::channel(8);
        let notifier = Arc::new(Notifier::new(
            Box::new(SystemClock),
            Duration::from_secs(3),
            sink,
        ));
        let state = DashboardState::new(
            Arc::new(api),
            notifier,
            Instant::now(),
            UIConfig::new(false),
        );
        (state, events)
    }

    #[test]
    fn test_notifications_become_toast_and_log() {
        let mut api = MockGoawayApi::new();
        api.expect_environment().return_const(Environment::default());
        let (mut state, _events) = dashboard(api);

        state.add_event(Event::warning("Could not reach the goaway server"));
        state.update();

        assert_eq!(state.activity_logs.len(), 1);
        let toast = state.toast.as_ref().map(|t| t.event.msg.as_str());
        assert_eq!(toast, Some("Could not reach the goaway server"));
    }

    #[test]
    fn test_toast_expires_after_duration() {
        let mut api = MockGoawayApi::new();
        api.expect_environment().return_const(Environment::default());
        let (mut state, _events) = dashboard(api);

        state.add_event(Event::success("Added upstream 1.1.1.1:53"));
        state.update();
        let shown_at = state.toast.as_ref().map(|t| t.shown_at).unwrap();

        state.expire_toast(shown_at + toast_duration() - Duration::from_millis(1));
        assert!(state.toast.is_some());
        state.expire_toast(shown_at + toast_duration());
        assert!(state.toast.is_none());
        // The log keeps it.
        assert_eq!(state.activity_logs.len(), 1);
    }

    #[test]
    fn test_quit_keys() {
        let mut api = MockGoawayApi::new();
        api.expect_environment().return_const(Environment::default());
        let (mut state, _events) = dashboard(api);

        assert_eq!(state.handle_key(key(KeyCode::Char('q'))), KeyOutcome::Quit);
        assert_eq!(state.handle_key(key(KeyCode::Esc)), KeyOutcome::Quit);
    }

    #[test]
    fn test_input_line_captures_quit_key() {
        let mut api = MockGoawayApi::new();
        api.expect_environment().return_const(Environment::default());
        let (mut state, _events) = dashboard(api);
        state.select_tab(Tab::Lists);

        state.handle_key(key(KeyCode::Char('b')));
        assert_eq!(state.handle_key(key(KeyCode::Char('q'))), KeyOutcome::Continue);
        assert_eq!(state.input.as_ref().map(|i| i.buffer.as_str()), Some("q"));

        state.handle_key(key(KeyCode::Esc));
        assert!(state.input.is_none());
    }

    #[tokio::test]
    async fn test_block_domains_from_lists_tab() {
        let mut api = MockGoawayApi::new();
        api.expect_environment().return_const(Environment::default());
        api.expect_pause_status()
            .returning(|| RequestResult::ok(200, PauseStatus::default()));
        api.expect_lists()
            .returning(|| RequestResult::ok(200, Lists::default()));
        api.expect_add_custom_domains()
            .withf(|domains: &[String]| domains == ["ads.example.com", "t.example.net"])
            .times(1)
            .returning(|_| RequestResult::empty(200));

        let (mut state, mut events) = dashboard(api);
        state.select_tab(Tab::Lists);
        state.activate();

        state.handle_key(key(KeyCode::Char('b')));
        for c in "ads.example.com  t.example.net".chars() {
            state.handle_key(key(KeyCode::Char(c)));
        }
        state.handle_key(key(KeyCode::Enter));

        let event = events.recv().await.unwrap();
        assert_eq!(event.msg, "Blocked ads.example.com, t.example.net");
    }

    #[tokio::test]
    async fn test_failed_mutation_reports_no_success() {
        let mut api = MockGoawayApi::new();
        api.expect_environment().return_const(Environment::default());
        api.expect_add_upstream()
            .with(eq("9.9.9.9:53"))
            .times(1)
            .returning(|_| RequestResult::empty(400));

        let (mut state, mut events) = dashboard(api);
        state.select_tab(Tab::Upstreams);
        state.handle_key(key(KeyCode::Char('a')));
        for c in "9.9.9.9:53".chars() {
            state.handle_key(key(KeyCode::Char(c)));
        }
        state.handle_key(key(KeyCode::Enter));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(events.try_recv().is_err());
    }
}
