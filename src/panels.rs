//! Dashboard panels and the resource each one is bound to

use crate::api::resources::{
    AuditEntry, ClientList, Lists, Metrics, PauseStatus, QueryTypes, TopBlockedDomains, Upstreams,
    paths,
};
use crate::api::{GoawayApi, RequestResult};
use crate::consts::cli_consts::polling;
use crate::polling::{Subscription, subscribe};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Panel {
    Metrics,
    Pause,
    QueryTypes,
    TopBlockedDomains,
    Clients,
    Lists,
    Upstreams,
    Audit,
}

impl Panel {
    /// Resource path this panel polls.
    pub fn path(&self) -> &'static str {
        match self {
            Panel::Metrics => paths::METRICS,
            Panel::Pause => paths::PAUSE,
            Panel::QueryTypes => paths::QUERY_TYPES,
            Panel::TopBlockedDomains => paths::TOP_BLOCKED_DOMAINS,
            Panel::Clients => paths::CLIENTS,
            Panel::Lists => paths::LISTS,
            Panel::Upstreams => paths::UPSTREAMS,
            Panel::Audit => paths::AUDIT,
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        let millis = match self {
            Panel::Metrics => polling::METRICS_INTERVAL_MS,
            Panel::Pause => polling::PAUSE_INTERVAL_MS,
            Panel::QueryTypes => polling::QUERY_TYPES_INTERVAL_MS,
            Panel::TopBlockedDomains => polling::TOP_BLOCKED_INTERVAL_MS,
            Panel::Clients => polling::CLIENTS_INTERVAL_MS,
            Panel::Lists => polling::LISTS_INTERVAL_MS,
            Panel::Upstreams => polling::UPSTREAMS_INTERVAL_MS,
            Panel::Audit => polling::AUDIT_INTERVAL_MS,
        };
        polling::interval(millis)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Panel::Metrics => "METRICS",
            Panel::Pause => "BLOCKING",
            Panel::QueryTypes => "QUERY TYPES",
            Panel::TopBlockedDomains => "TOP BLOCKED DOMAINS",
            Panel::Clients => "CLIENTS",
            Panel::Lists => "BLOCKLISTS",
            Panel::Upstreams => "UPSTREAMS",
            Panel::Audit => "AUDIT LOG",
        }
    }
}

/// Binds `panel` to one operation of `api`, polling at the panel's cadence.
pub fn bind<T, F, Fut>(panel: Panel, api: Arc<dyn GoawayApi>, fetch: F) -> Subscription<T>
where
    T: Send + Sync + 'static,
    F: Fn(Arc<dyn GoawayApi>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = RequestResult<T>> + Send + 'static,
{
    let name = panel.path();
    subscribe(name, panel.refresh_interval(), move || {
        let request = fetch(Arc::clone(&api));
        async move { request.await.into_body() }
    })
}

pub fn bind_metrics(api: Arc<dyn GoawayApi>) -> Subscription<Metrics> {
    bind(Panel::Metrics, api, |api| async move { api.metrics().await })
}

pub fn bind_pause(api: Arc<dyn GoawayApi>) -> Subscription<PauseStatus> {
    bind(Panel::Pause, api, |api| async move { api.pause_status().await })
}

pub fn bind_query_types(api: Arc<dyn GoawayApi>) -> Subscription<QueryTypes> {
    bind(Panel::QueryTypes, api, |api| async move {
        api.query_types().await
    })
}

pub fn bind_top_blocked(api: Arc<dyn GoawayApi>) -> Subscription<TopBlockedDomains> {
    bind(Panel::TopBlockedDomains, api, |api| async move {
        api.top_blocked_domains().await
    })
}

pub fn bind_clients(api: Arc<dyn GoawayApi>) -> Subscription<ClientList> {
    bind(Panel::Clients, api, |api| async move { api.clients().await })
}

pub fn bind_lists(api: Arc<dyn GoawayApi>) -> Subscription<Lists> {
    bind(Panel::Lists, api, |api| async move { api.lists().await })
}

pub fn bind_upstreams(api: Arc<dyn GoawayApi>) -> Subscription<Upstreams> {
    bind(Panel::Upstreams, api, |api| async move { api.upstreams().await })
}

pub fn bind_audit(api: Arc<dyn GoawayApi>) -> Subscription<Vec<AuditEntry>> {
    bind(Panel::Audit, api, |api| async move { api.audit().await })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockGoawayApi;

    #[test]
    fn test_cadences_stay_within_one_to_five_seconds() {
        for panel in [
            Panel::Metrics,
            Panel::Pause,
            Panel::QueryTypes,
            Panel::TopBlockedDomains,
            Panel::Clients,
            Panel::Lists,
            Panel::Upstreams,
            Panel::Audit,
        ] {
            let interval = panel.refresh_interval();
            assert!(interval >= Duration::from_secs(1), "{panel} polls too often");
            assert!(interval <= Duration::from_secs(5), "{panel} polls too rarely");
        }
    }

    #[test]
    fn test_panel_names() {
        assert_eq!(Panel::TopBlockedDomains.to_string(), "top-blocked-domains");
        assert_eq!(Panel::QueryTypes.path(), "queryTypes");
    }

    #[tokio::test]
    async fn test_unauthorized_poll_leaves_panel_empty() {
        let mut api = MockGoawayApi::new();
        api.expect_clients().returning(|| RequestResult::empty(401));

        let subscription = bind_clients(Arc::new(api));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!subscription.state().is_loaded());
    }

    #[tokio::test]
    async fn test_bound_panel_shows_decoded_payload() {
        let mut api = MockGoawayApi::new();
        api.expect_metrics().returning(|| {
            RequestResult::ok(
                200,
                Metrics {
                    total: 120,
                    blocked: 30,
                    ..Metrics::default()
                },
            )
        });

        let mut subscription = bind_metrics(Arc::new(api));
        assert!(subscription.changed().await);
        assert_eq!(subscription.current().unwrap().total, 120);
    }
}
