//! Login screen module
//!
//! Shown when the server rejects the session cookie.

use crate::api::{GoawayApi, RequestResult};
use crossterm::event::{KeyCode, KeyEvent};
use futures::FutureExt;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

/// Result of driving the login form for one frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoginStatus {
    Editing,
    Submitting,
    LoggedIn,
}

#[derive(Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub error: Option<String>,
    /// Path whose 401 brought the user here
    pub rejected_path: String,
    submission: Option<JoinHandle<RequestResult>>,
}

impl LoginForm {
    pub fn new(username: Option<String>, rejected_path: impl Into<String>) -> Self {
        let focus = if username.is_some() {
            LoginField::Password
        } else {
            LoginField::Username
        };
        Self {
            username: username.unwrap_or_default(),
            password: String::new(),
            focus,
            error: None,
            rejected_path: rejected_path.into(),
            submission: None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submission.is_some()
    }

    /// Edits the form. Enter submits through `api`.
    pub fn handle_key(&mut self, key: KeyEvent, api: &Arc<dyn GoawayApi>) {
        if self.is_submitting() {
            return;
        }
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
            }
            KeyCode::Backspace => {
                self.focused_mut().pop();
            }
            KeyCode::Char(c) => self.focused_mut().push(c),
            KeyCode::Enter => self.submit(api),
            _ => {}
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    fn submit(&mut self, api: &Arc<dyn GoawayApi>) {
        if self.username.is_empty() || self.password.is_empty() {
            self.error = Some("Username and password are required".to_string());
            return;
        }
        self.error = None;
        let api = Arc::clone(api);
        let username = self.username.clone();
        let password = self.password.clone();
        self.submission = Some(tokio::spawn(async move {
            api.login(&username, &password).await
        }));
    }

    /// Checks the pending submission without blocking.
    pub fn poll(&mut self) -> LoginStatus {
        let Some(submission) = self.submission.as_mut() else {
            return LoginStatus::Editing;
        };
        let Some(outcome) = submission.now_or_never() else {
            return LoginStatus::Submitting;
        };
        self.submission = None;

        match outcome {
            Ok(result) if result.is_success() => LoginStatus::LoggedIn,
            Ok(result) if result.is_unauthorized() => {
                self.password.clear();
                self.error = Some("Invalid username or password".to_string());
                LoginStatus::Editing
            }
            Ok(_) => {
                self.error = Some("Login failed, please try again".to_string());
                LoginStatus::Editing
            }
            Err(e) => {
                self.error = Some(format!("Login failed: {}", e));
                LoginStatus::Editing
            }
        }
    }
}

fn field_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let style = if focused {
        Style::default()
            .fg(Color::LightCyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!("{:<10}", label), style),
        Span::raw(format!("{}{}", value, cursor)),
    ])
}

/// Renders the login form centered on screen.
pub fn render_login(f: &mut Frame, form: &LoginForm) {
    let area = centered(f.area(), 50, 11);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Session expired ({})", form.rejected_path),
            Style::default().fg(Color::LightYellow),
        )),
        Line::from(""),
        field_line(
            "Username",
            form.username.clone(),
            form.focus == LoginField::Username,
        ),
        field_line(
            "Password",
            "*".repeat(form.password.chars().count()),
            form.focus == LoginField::Password,
        ),
        Line::from(""),
    ];

    if form.is_submitting() {
        lines.push(Line::from(Span::styled(
            "Logging in...",
            Style::default().fg(Color::Cyan),
        )));
    } else if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::LightRed),
        )));
    }
    lines.push(Line::from(Span::styled(
        "[Tab] Switch field | [Enter] Login | [Esc] Quit",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .title("LOGIN")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .split(vertical[1]);
    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockGoawayApi;
    use crossterm::event::KeyModifiers;
    use mockall::predicate::eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut LoginForm, text: &str, api: &Arc<dyn GoawayApi>) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)), api);
        }
    }

    async fn settle(form: &mut LoginForm) -> LoginStatus {
        loop {
            match form.poll() {
                LoginStatus::Submitting => tokio::task::yield_now().await,
                status => return status,
            }
        }
    }

    #[tokio::test]
    async fn test_successful_login() {
        let mut api = MockGoawayApi::new();
        api.expect_login()
            .with(eq("admin"), eq("hunter2"))
            .times(1)
            .returning(|_, _| RequestResult::empty(200));
        let api: Arc<dyn GoawayApi> = Arc::new(api);

        let mut form = LoginForm::new(None, "metrics");
        type_text(&mut form, "admin", &api);
        form.handle_key(key(KeyCode::Tab), &api);
        type_text(&mut form, "hunter2", &api);
        form.handle_key(key(KeyCode::Enter), &api);

        assert_eq!(settle(&mut form).await, LoginStatus::LoggedIn);
    }

    #[tokio::test]
    async fn test_rejected_login_clears_password() {
        let mut api = MockGoawayApi::new();
        api.expect_login()
            .returning(|_, _| RequestResult::empty(401));
        let api: Arc<dyn GoawayApi> = Arc::new(api);

        let mut form = LoginForm::new(Some("admin".to_string()), "clients");
        assert_eq!(form.focus, LoginField::Password);
        type_text(&mut form, "wrong", &api);
        form.handle_key(key(KeyCode::Enter), &api);

        assert_eq!(settle(&mut form).await, LoginStatus::Editing);
        assert!(form.password.is_empty());
        assert_eq!(form.error.as_deref(), Some("Invalid username or password"));
    }

    #[test]
    fn test_empty_fields_are_not_submitted() {
        let api: Arc<dyn GoawayApi> = Arc::new(MockGoawayApi::new());
        let mut form = LoginForm::new(None, "metrics");
        form.handle_key(key(KeyCode::Enter), &api);

        assert!(!form.is_submitting());
        assert!(form.error.is_some());
    }
}
