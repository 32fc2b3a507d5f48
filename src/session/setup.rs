//! Session setup and initialization

use crate::api::{ApiClient, GoawayApi};
use crate::consts::cli_consts::{EVENT_QUEUE_SIZE, SESSION_EVENT_CAPACITY, notifications};
use crate::environment::{ApiPrefix, Environment};
use crate::events::{Event, SessionEvent};
use crate::notify::{Notifier, SystemClock};
use log::{debug, info};
use std::error::Error;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Username and password passed on the command line or through the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Both parts are needed; a lone username only prefills the login form.
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Option<Self> {
        match (username, password) {
            (Some(username), Some(password)) => Some(Self { username, password }),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Session data shared by the TUI, headless mode and one-shot commands
#[derive(Debug)]
pub struct SessionData {
    /// API client shared by every panel and command
    pub api: Arc<ApiClient>,
    /// Notifications raised by the client
    pub event_receiver: mpsc::Receiver<Event>,
    /// Login-required signals; subscribe to receive them
    pub session_events: broadcast::Sender<SessionEvent>,
    pub username: Option<String>,
}

impl SessionData {
    pub fn notifier(&self) -> Arc<Notifier> {
        Arc::clone(self.api.notifier())
    }

    /// Notifications queued so far, without waiting.
    pub fn drain_notifications(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = self.event_receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Builds the API client and, when credentials are given, logs in.
///
/// # Returns
/// * `Ok(SessionData)` - Client ready; logged in if credentials were given
/// * `Err` - Client could not be built or the login was rejected
pub async fn setup_session(
    environment: Environment,
    prefix: ApiPrefix,
    username: Option<String>,
    credentials: Option<Credentials>,
) -> Result<SessionData, Box<dyn Error>> {
    let (sink, event_receiver) = mpsc::channel(EVENT_QUEUE_SIZE);
    let notifier = Arc::new(Notifier::new(
        Box::new(SystemClock),
        notifications::dedupe_window(),
        sink,
    ));
    let (session_events, _) = broadcast::channel(SESSION_EVENT_CAPACITY);

    debug!("Connecting to {} ({} prefix)", environment, prefix);
    let api = Arc::new(ApiClient::new(
        environment,
        prefix,
        notifier,
        session_events.clone(),
    )?);

    if let Some(credentials) = &credentials {
        let result = api
            .login(&credentials.username, &credentials.password)
            .await;
        if !result.is_success() {
            return Err(format!(
                "Login as {} failed with status {}",
                credentials.username, result.status
            )
            .into());
        }
        info!("Logged in as {}", credentials.username);
    }

    Ok(SessionData {
        api,
        event_receiver,
        session_events,
        username: username.or(credentials.map(|c| c.username)),
    })
}
