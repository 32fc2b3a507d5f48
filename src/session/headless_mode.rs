//! Headless mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::api::GoawayApi;
use crate::api::resources::{Metrics, paths};
use crate::cli_messages::print_notification;
use crate::events::{Event, SessionEvent};
use crate::panels::Panel;
use crate::polling::Subscription;
use crate::print_cmd_warn;
use crate::ui::dashboard::utils::format_percentage;
use std::error::Error;
use std::future::Future;
use std::io::Write;
use tokio::sync::{broadcast, mpsc};

/// One console line summarizing the metrics panel.
pub fn metrics_line(metrics: &Metrics) -> String {
    format!(
        "queries {} | blocked {} ({}) | allowed {} | clients {} | blocklist domains {}",
        metrics.total,
        metrics.blocked,
        format_percentage(metrics.percentage_blocked),
        metrics.allowed,
        metrics.clients,
        metrics.domain_block_len
    )
}

/// Runs the application in headless mode
///
/// Prints the metrics line each time it changes and every notification, until
/// Ctrl+C or until the server asks for credentials.
pub async fn run_headless_mode(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    print_session_starting("headless", &session.api.environment().api_url());

    let mut metrics =
        session
            .api
            .subscribe::<Metrics>("metrics", paths::METRICS, Panel::Metrics.refresh_interval());
    let mut session_events = session.session_events.subscribe();
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    watch_metrics(
        &mut metrics,
        &mut session.event_receiver,
        &mut session_events,
        ctrl_c,
        &mut std::io::stdout(),
    )
    .await?;

    print_session_shutdown();
    print_session_exit_success();
    Ok(())
}

/// Writes a metrics line to `out` whenever it differs from the previous one.
///
/// Returns when `shutdown` resolves or the subscription ends, and fails on
/// [`SessionEvent::LoginRequired`]. The subscription is stopped either way.
pub async fn watch_metrics<W: Write>(
    metrics: &mut Subscription<Metrics>,
    notifications: &mut mpsc::Receiver<Event>,
    session_events: &mut broadcast::Receiver<SessionEvent>,
    shutdown: impl Future<Output = ()>,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let mut last_line = String::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = metrics.changed() => {
                if !changed {
                    break;
                }
                let line = metrics.state().value().map(metrics_line);
                if let Some(line) = line {
                    if line != last_line {
                        writeln!(out, "{}", line)?;
                        last_line = line;
                    }
                }
            }
            Some(event) = notifications.recv() => {
                print_notification(&event);
            }
            Ok(SessionEvent::LoginRequired { path }) = session_events.recv() => {
                metrics.stop();
                print_cmd_warn!(
                    "Login required",
                    "The server rejected {}. Pass --username and --password.",
                    path
                );
                return Err("login required".into());
            }
        }
    }

    metrics.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockGoawayApi, RequestResult};
    use crate::panels::bind_metrics;
    use std::sync::Arc;
    use std::time::Duration;

    fn sample_metrics() -> Metrics {
        Metrics {
            allowed: 90,
            blocked: 30,
            clients: 4,
            domain_block_len: 500,
            percentage_blocked: 25.0,
            total: 120,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_metrics_print_once() {
        let mut api = MockGoawayApi::new();
        api.expect_metrics()
            .returning(|| RequestResult::ok(200, sample_metrics()));
        let mut metrics = bind_metrics(Arc::new(api));
        let (_sink, mut notifications) = mpsc::channel(8);
        let (_session_sender, mut session_events) = broadcast::channel(4);
        let mut out = Vec::new();

        // Four polls of the same payload.
        let shutdown = tokio::time::sleep(Duration::from_millis(3_500));
        watch_metrics(
            &mut metrics,
            &mut notifications,
            &mut session_events,
            shutdown,
            &mut out,
        )
        .await
        .unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.lines().count(), 1);
        assert_eq!(printed.trim_end(), metrics_line(&sample_metrics()));
        assert!(!metrics.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_required_ends_watch_with_error() {
        let mut api = MockGoawayApi::new();
        api.expect_metrics().returning(|| RequestResult::empty(401));
        let mut metrics = bind_metrics(Arc::new(api));
        let (_sink, mut notifications) = mpsc::channel(8);
        let (session_sender, mut session_events) = broadcast::channel(4);
        session_sender
            .send(SessionEvent::LoginRequired {
                path: "metrics".to_string(),
            })
            .unwrap();
        let mut out = Vec::new();

        let result = watch_metrics(
            &mut metrics,
            &mut notifications,
            &mut session_events,
            std::future::pending::<()>(),
            &mut out,
        )
        .await;

        assert_eq!(result.unwrap_err().to_string(), "login required");
        assert!(out.is_empty());
        assert!(!metrics.is_active());
    }

    #[test]
    fn test_metrics_line() {
        let metrics = Metrics {
            allowed: 90,
            blocked: 30,
            clients: 4,
            domain_block_len: 500,
            percentage_blocked: 25.0,
            total: 120,
        };
        assert_eq!(
            metrics_line(&metrics),
            "queries 120 | blocked 30 (25.0%) | allowed 90 | clients 4 | blocklist domains 500"
        );
    }
}
