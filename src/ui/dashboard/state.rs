//! Dashboard state management
//!
//! Contains the main dashboard state struct and related enums

use crate::api::GoawayApi;
use crate::api::resources::{
    AuditEntry, ClientList, Lists, Metrics, PauseStatus, QueryTypes, TopBlockedDomains, Upstreams,
};
use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::environment::Environment;
use crate::events::Event;
use crate::notify::Notifier;
use crate::panels;
use crate::polling::Subscription;
use crate::ui::app::UIConfig;

use log::debug;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// Dashboard tabs, in display order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, strum::Display)]
pub enum Tab {
    #[default]
    Overview,
    Clients,
    Lists,
    Upstreams,
    Audit,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::Clients,
        Tab::Lists,
        Tab::Upstreams,
        Tab::Audit,
    ];

    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|tab| tab == self).unwrap_or(0)
    }

    pub fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }

    /// Tab for a number key, `1` being the first tab.
    pub fn from_digit(digit: char) -> Option<Tab> {
        let index = digit.to_digit(10)? as usize;
        index.checked_sub(1).and_then(|i| Tab::ALL.get(i).copied())
    }
}

/// Subscriptions of the visible tab. Dropping a variant stops its polling.
#[derive(Debug, Default)]
pub enum ActivePanels {
    #[default]
    Inactive,
    Overview {
        metrics: Subscription<Metrics>,
        query_types: Subscription<QueryTypes>,
        top_blocked: Subscription<TopBlockedDomains>,
    },
    Clients(Subscription<ClientList>),
    Lists(Subscription<Lists>),
    Upstreams(Subscription<Upstreams>),
    Audit(Subscription<Vec<AuditEntry>>),
}

impl ActivePanels {
    fn bind(tab: Tab, api: &Arc<dyn GoawayApi>) -> Self {
        match tab {
            Tab::Overview => ActivePanels::Overview {
                metrics: panels::bind_metrics(Arc::clone(api)),
                query_types: panels::bind_query_types(Arc::clone(api)),
                top_blocked: panels::bind_top_blocked(Arc::clone(api)),
            },
            Tab::Clients => ActivePanels::Clients(panels::bind_clients(Arc::clone(api))),
            Tab::Lists => ActivePanels::Lists(panels::bind_lists(Arc::clone(api))),
            Tab::Upstreams => ActivePanels::Upstreams(panels::bind_upstreams(Arc::clone(api))),
            Tab::Audit => ActivePanels::Audit(panels::bind_audit(Arc::clone(api))),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, ActivePanels::Inactive)
    }
}

/// What the footer input line is collecting.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputKind {
    AddUpstream,
    BlockDomains,
}

impl InputKind {
    pub fn prompt(&self) -> &'static str {
        match self {
            InputKind::AddUpstream => "Upstream (host:port)",
            InputKind::BlockDomains => "Domains to block (space separated)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPrompt {
    pub kind: InputKind,
    pub buffer: String,
}

/// The notification currently shown in the footer.
#[derive(Debug, Clone)]
pub struct Toast {
    pub event: Event,
    pub shown_at: Instant,
}

/// Dashboard state: the visible tab, its live panels, and the notification history.
pub struct DashboardState {
    /// The environment in which the application is running.
    pub environment: Environment,
    /// The start time of the application, used for computing uptime.
    pub start_time: Instant,
    /// Whether to enable background colors
    pub with_background_color: bool,
    /// Queue of notifications waiting to be processed
    pub pending_events: VecDeque<Event>,
    /// Activity logs for display
    pub activity_logs: VecDeque<Event>,
    pub toast: Option<Toast>,
    /// Open input line, if any
    pub input: Option<InputPrompt>,
    /// Selected row of the upstream table
    pub selected_upstream: usize,
    /// Animation tick counter
    pub tick: usize,

    api: Arc<dyn GoawayApi>,
    notifier: Arc<Notifier>,
    tab: Tab,
    panels: ActivePanels,
    /// Shown in the header on every tab, so it lives outside the tab panels.
    pause: Option<Subscription<PauseStatus>>,
    /// Management calls still in flight.
    pending_actions: Vec<JoinHandle<bool>>,
}

impl DashboardState {
    /// Creates the dashboard state. Nothing polls until [`DashboardState::activate`].
    pub fn new(
        api: Arc<dyn GoawayApi>,
        notifier: Arc<Notifier>,
        start_time: Instant,
        ui_config: UIConfig,
    ) -> Self {
        Self {
            environment: api.environment().clone(),
            start_time,
            with_background_color: ui_config.with_background_color,
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            toast: None,
            input: None,
            selected_upstream: 0,
            tick: 0,
            api,
            notifier,
            tab: Tab::default(),
            panels: ActivePanels::Inactive,
            pause: None,
            pending_actions: Vec::new(),
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn panels(&self) -> &ActivePanels {
        &self.panels
    }

    pub fn pause(&self) -> Option<&Subscription<PauseStatus>> {
        self.pause.as_ref()
    }

    pub fn api(&self) -> &Arc<dyn GoawayApi> {
        &self.api
    }

    pub fn notifier(&self) -> &Arc<Notifier> {
        &self.notifier
    }

    pub fn is_active(&self) -> bool {
        self.panels.is_active()
    }

    /// Starts polling the visible tab and the pause status.
    pub fn activate(&mut self) {
        self.deactivate();
        debug!("Activating {} tab", self.tab);
        self.pause = Some(panels::bind_pause(Arc::clone(&self.api)));
        self.panels = ActivePanels::bind(self.tab, &self.api);
    }

    /// Stops every panel. In-flight responses are discarded.
    pub fn deactivate(&mut self) {
        self.panels = ActivePanels::Inactive;
        self.pause = None;
    }

    /// Shows `tab`, stopping the previous tab's panels first.
    pub fn select_tab(&mut self, tab: Tab) {
        if tab == self.tab && self.is_active() {
            return;
        }
        self.tab = tab;
        self.input = None;
        self.selected_upstream = 0;
        if self.pause.is_some() {
            self.panels = ActivePanels::Inactive;
            debug!("Switching to {} tab", tab);
            self.panels = ActivePanels::bind(tab, &self.api);
        }
    }

    /// Re-binds the visible tab so it fetches right away.
    pub fn refresh(&mut self) {
        if self.is_active() {
            self.panels = ActivePanels::Inactive;
            self.panels = ActivePanels::bind(self.tab, &self.api);
        }
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: Event) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: Event) {
        self.pending_events.push_back(event);
    }

    pub(super) fn track_action(&mut self, action: JoinHandle<bool>) {
        self.pending_actions.push(action);
    }

    pub(super) fn take_finished_actions(&mut self) -> usize {
        let before = self.pending_actions.len();
        self.pending_actions.retain(|action| !action.is_finished());
        before - self.pending_actions.len()
    }

    /// The upstream under the cursor, if the upstream table is loaded.
    pub fn selected_upstream_address(&self) -> Option<String> {
        let ActivePanels::Upstreams(subscription) = &self.panels else {
            return None;
        };
        let state = subscription.state();
        state
            .value()
            .and_then(|upstreams| upstreams.upstreams.get(self.selected_upstream))
            .map(|upstream| upstream.upstream.clone())
    }

    pub(super) fn upstream_count(&self) -> usize {
        match &self.panels {
            ActivePanels::Upstreams(subscription) => subscription
                .state()
                .value()
                .map_or(0, |upstreams| upstreams.upstreams.len()),
            _ => 0,
        }
    }
}

impl std::fmt::Debug for DashboardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardState")
            .field("environment", &self.environment)
            .field("tab", &self.tab)
            .field("panels", &self.panels)
            .field("pending_actions", &self.pending_actions.len())
            .finish_non_exhaustive()
    }
}
