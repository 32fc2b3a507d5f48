//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::api::GoawayApi;
use crate::events::{Event as Notification, SessionEvent};
use crate::notify::Notifier;
use crate::ui::dashboard::{DashboardState, KeyOutcome, render_dashboard};
use crate::ui::login::{LoginForm, LoginStatus, render_login};
use crate::ui::splash::render_splash;
use crossterm::event::{self, Event, KeyCode};
use log::{debug, info};
use ratatui::{Frame, Terminal, backend::Backend};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::{broadcast, mpsc};

/// UI configuration data grouped by concern
#[derive(Debug, Clone, Default)]
pub struct UIConfig {
    pub with_background_color: bool,
    /// Prefilled on the login form
    pub username: Option<String>,
}

impl UIConfig {
    pub fn new(with_background_color: bool) -> Self {
        Self {
            with_background_color,
            username: None,
        }
    }

    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }
}

/// The different screens in the application.
#[derive(Debug)]
pub enum Screen {
    /// Splash screen shown at the start of the application.
    Splash,
    /// Login form, shown whenever the server asks for credentials.
    Login(Box<LoginForm>),
    /// Dashboard screen with the tabbed panels.
    Dashboard,
}

/// Application state
#[derive(Debug)]
pub struct App {
    /// The current screen being displayed in the application.
    current_screen: Screen,

    /// Panels, notifications and tab state. Kept while the login form is shown.
    dashboard: DashboardState,

    /// Receives user notifications from the API client and management actions.
    event_receiver: mpsc::Receiver<Notification>,

    /// Receives login-required signals.
    session_events: broadcast::Receiver<SessionEvent>,

    username: Option<String>,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        api: Arc<dyn GoawayApi>,
        notifier: Arc<Notifier>,
        event_receiver: mpsc::Receiver<Notification>,
        session_events: broadcast::Receiver<SessionEvent>,
        ui_config: UIConfig,
    ) -> Self {
        let username = ui_config.username.clone();
        Self {
            current_screen: Screen::Splash,
            dashboard: DashboardState::new(api, notifier, Instant::now(), ui_config),
            event_receiver,
            session_events,
            username,
        }
    }

    /// Leaves the splash screen and starts polling.
    fn show_dashboard(&mut self) {
        self.dashboard.activate();
        self.current_screen = Screen::Dashboard;
    }

    /// Stops every panel and asks for credentials.
    fn require_login(&mut self, path: String) {
        if matches!(self.current_screen, Screen::Login(_)) {
            return;
        }
        info!("Server requires login (rejected {})", path);
        self.dashboard.deactivate();
        self.dashboard.input = None;
        self.current_screen =
            Screen::Login(Box::new(LoginForm::new(self.username.clone(), path)));
    }

    fn drain_session_events(&mut self) {
        loop {
            match self.session_events.try_recv() {
                Ok(SessionEvent::LoginRequired { path }) => self.require_login(path),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!("Skipped {} session events", skipped);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let splash_start = Instant::now();
    let splash_duration = Duration::from_secs(2);

    // UI event loop
    loop {
        // Queue all incoming notifications; they are shown on every screen.
        while let Ok(event) = app.event_receiver.try_recv() {
            app.dashboard.add_event(event);
        }

        app.drain_session_events();

        // Update the state based on the current screen
        match &mut app.current_screen {
            Screen::Splash => {}
            Screen::Login(form) => {
                if form.poll() == LoginStatus::LoggedIn {
                    app.dashboard.notifier().success("Logged in");
                    app.show_dashboard();
                }
            }
            Screen::Dashboard => {}
        }
        app.dashboard.update();
        terminal.draw(|f| render(f, &app))?;

        // Handle splash-to-dashboard transition
        if let Screen::Splash = app.current_screen {
            if splash_start.elapsed() >= splash_duration {
                app.show_dashboard();
                continue;
            }
        }

        // Poll for key events
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        // Skip events that are not KeyEventKind::Press
        if key.kind == event::KeyEventKind::Release {
            continue;
        }

        match &mut app.current_screen {
            Screen::Splash => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                    return Ok(());
                }
                // Any other key skips the splash screen
                app.show_dashboard();
            }
            Screen::Login(form) => {
                if key.code == KeyCode::Esc {
                    return Ok(());
                }
                let api = Arc::clone(app.dashboard.api());
                form.handle_key(key, &api);
            }
            Screen::Dashboard => {
                if app.dashboard.handle_key(key) == KeyOutcome::Quit {
                    return Ok(());
                }
            }
        }
    }
}

/// Renders the current screen based on the application state.
fn render(f: &mut Frame, app: &App) {
    match &app.current_screen {
        Screen::Splash => render_splash(f, &app.dashboard.environment.api_url()),
        Screen::Login(form) => render_login(f, form),
        Screen::Dashboard => render_dashboard(f, &app.dashboard),
    }
}
