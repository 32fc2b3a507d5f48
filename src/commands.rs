//! One-shot CLI commands
//!
//! Each command performs its request once, prints the result, and fails when
//! the server did not answer with a 2xx.

use crate::api::resources::paths;
use crate::api::{GoawayApi, RequestResult};
use crate::panels::Panel;
use crate::ui::dashboard::utils::{
    format_percentage, format_time_left, format_timestamp, metrics_cards,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error(
        "The server requires a login for {path}. Pass --username and --password (or set GOAWAY_USERNAME and GOAWAY_PASSWORD)."
    )]
    LoginRequired { path: String },

    #[error("Request to {path} failed with status {status}")]
    Failed { path: String, status: u16 },

    #[error("The server answered {path} without readable data")]
    NoData { path: String },
}

/// Upstream management actions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum UpstreamAction {
    Add,
    Remove,
    Prefer,
}

fn check<T>(result: RequestResult<T>, path: &str) -> Result<Option<T>, CommandError> {
    if result.is_unauthorized() {
        return Err(CommandError::LoginRequired {
            path: path.to_string(),
        });
    }
    if !result.is_success() {
        return Err(CommandError::Failed {
            path: path.to_string(),
            status: result.status,
        });
    }
    Ok(result.into_body())
}

/// Like [`check`], but a success without a decodable body is also a failure.
fn require<T>(result: RequestResult<T>, path: &str) -> Result<T, CommandError> {
    check(result, path)?.ok_or_else(|| CommandError::NoData {
        path: path.to_string(),
    })
}

/// Fetches one panel and formats it as console lines.
pub async fn show(api: &dyn GoawayApi, panel: Panel) -> Result<Vec<String>, CommandError> {
    let path = panel.path();
    let mut lines = vec![format!("== {} ==", panel.title())];

    match panel {
        Panel::Metrics => {
            let metrics = require(api.metrics().await, path)?;
            lines.extend(
                metrics_cards(&metrics)
                    .into_iter()
                    .map(|(label, value)| format!("{:<18} {}", label, value)),
            );
            lines.push(format!("{:<18} {}", "Allowed", metrics.allowed));
            lines.push(format!("{:<18} {}", "Clients", metrics.clients));
        }
        Panel::Pause => {
            let status = require(api.pause_status().await, path)?;
            if status.is_paused() {
                lines.push(format!(
                    "Blocking paused, resumes in {}",
                    format_time_left(status.time_left)
                ));
            } else {
                lines.push("Blocking active".to_string());
            }
        }
        Panel::QueryTypes => {
            let query_types = require(api.query_types().await, path)?;
            lines.extend(
                query_types
                    .0
                    .iter()
                    .map(|entry| format!("{:<8} {}", entry.query_type, entry.count)),
            );
        }
        Panel::TopBlockedDomains => {
            let top = require(api.top_blocked_domains().await, path)?;
            lines.extend(top.domains.iter().map(|domain| {
                format!(
                    "{:<40} {:>8} {:>7}",
                    domain.name,
                    domain.hits,
                    format_percentage(domain.frequency)
                )
            }));
        }
        Panel::Clients => {
            let list = require(api.clients().await, path)?;
            lines.extend(list.clients.iter().map(|client| {
                format!(
                    "{:<16} {:<24} {:<18} {}",
                    client.ip,
                    client.name,
                    client.mac,
                    format_timestamp(&client.last_seen)
                )
            }));
        }
        Panel::Lists => {
            let lists = require(api.lists().await, path)?;
            lines.extend(lists.lists.iter().map(|(name, list)| {
                format!(
                    "{:<32} {:<8} {:>10} {}",
                    name,
                    if list.active { "active" } else { "inactive" },
                    list.blocked_count,
                    format_timestamp(&list.last_updated)
                )
            }));
        }
        Panel::Upstreams => {
            let upstreams = require(api.upstreams().await, path)?;
            lines.extend(upstreams.upstreams.iter().map(|upstream| {
                let preferred = upstream.preferred
                    || upstream.upstream == upstreams.preferred_upstream;
                format!(
                    "{} {:<24} {:<20} dns {:>6} icmp {:>6}",
                    if preferred { "*" } else { " " },
                    upstream.upstream,
                    upstream.name,
                    upstream.dns_ping,
                    upstream.icmp_ping
                )
            }));
        }
        Panel::Audit => {
            let entries = require(api.audit().await, path)?;
            lines.extend(entries.iter().map(|entry| {
                format!(
                    "{} [{}] {}",
                    format_timestamp(&entry.created_at),
                    entry.topic,
                    entry.message
                )
            }));
        }
    }

    Ok(lines)
}

/// Adds `domains` to the custom blocklist.
pub async fn block(api: &dyn GoawayApi, domains: &[String]) -> Result<String, CommandError> {
    check(api.add_custom_domains(domains).await, paths::CUSTOM)?;
    Ok(format!("Blocked {}", domains.join(", ")))
}

pub async fn upstream(
    api: &dyn GoawayApi,
    action: UpstreamAction,
    upstream: &str,
) -> Result<String, CommandError> {
    match action {
        UpstreamAction::Add => {
            check(api.add_upstream(upstream).await, paths::UPSTREAM)?;
            Ok(format!("Added upstream {}", upstream))
        }
        UpstreamAction::Remove => {
            check(api.remove_upstream(upstream).await, paths::UPSTREAM)?;
            Ok(format!("Removed upstream {}", upstream))
        }
        UpstreamAction::Prefer => {
            check(
                api.set_preferred_upstream(upstream).await,
                paths::PREFERRED_UPSTREAM,
            )?;
            Ok(format!("Preferred upstream is now {}", upstream))
        }
    }
}
