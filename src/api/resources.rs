//! Payload shapes of the goaway REST API.
//!
//! Fields default when absent so a server that adds or drops a field does not
//! blank a whole panel.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

pub mod paths {
    pub const AUDIT: &str = "audit";
    pub const PAUSE: &str = "pause";
    pub const METRICS: &str = "metrics";
    pub const QUERY_TYPES: &str = "queryTypes";
    pub const TOP_BLOCKED_DOMAINS: &str = "topBlockedDomains";
    pub const CLIENTS: &str = "clients";
    pub const LISTS: &str = "lists";
    pub const UPSTREAMS: &str = "upstreams";
    pub const CUSTOM: &str = "custom";
    pub const UPSTREAM: &str = "upstream";
    pub const PREFERRED_UPSTREAM: &str = "preferredUpstream";
    pub const LOGIN: &str = "login";
}

/// A point in time as the server reports it: unix seconds or an RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    Unix(i64),
    Text(String),
}

impl Timestamp {
    pub fn to_local(&self) -> Option<DateTime<Local>> {
        match self {
            Timestamp::Unix(secs) => Local.timestamp_opt(*secs, 0).single(),
            Timestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Local)),
        }
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::Text(String::new())
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Timestamp::Unix(secs) => write!(f, "{}", secs),
            Timestamp::Text(text) => write!(f, "{}", text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: u64,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseStatus {
    /// Seconds until blocking resumes; zero or negative when blocking is active.
    #[serde(default)]
    pub time_left: i64,
}

impl PauseStatus {
    pub fn is_paused(&self) -> bool {
        self.time_left > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metrics {
    pub allowed: u64,
    pub blocked: u64,
    pub clients: u64,
    pub domain_block_len: u64,
    pub percentage_blocked: f64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryTypeCount {
    pub count: u64,
    pub query_type: String,
}

/// Query type counts. The server answers either a bare array or `{"queries": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryTypes(pub Vec<QueryTypeCount>);

impl<'de> Deserialize<'de> for QueryTypes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Bare(Vec<QueryTypeCount>),
            Wrapped {
                #[serde(default)]
                queries: Vec<QueryTypeCount>,
            },
        }

        Ok(match Shape::deserialize(deserializer)? {
            Shape::Bare(queries) | Shape::Wrapped { queries } => QueryTypes(queries),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedDomain {
    pub name: String,
    #[serde(default)]
    pub hits: u64,
    #[serde(default)]
    pub frequency: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TopBlockedDomains {
    #[serde(default)]
    pub domains: Vec<BlockedDomain>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub ip: String,
    #[serde(default)]
    pub last_seen: Timestamp,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vendor: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ClientList {
    #[serde(default)]
    pub clients: Vec<Client>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockList {
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub blocked_count: u64,
    #[serde(default)]
    pub last_updated: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Lists {
    /// Keyed by list name; ordered so the table does not reshuffle between polls.
    #[serde(default)]
    pub lists: BTreeMap<String, BlockList>,
}

/// Round-trip time as reported by the server: milliseconds or preformatted text.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Latency {
    Millis(f64),
    Text(String),
}

impl Default for Latency {
    fn default() -> Self {
        Latency::Text("-".to_string())
    }
}

impl Display for Latency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Latency::Millis(ms) => write!(f, "{:.0}ms", ms),
            Latency::Text(text) => write!(f, "{}", text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Upstream {
    pub upstream: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub preferred: bool,
    #[serde(default)]
    pub dns_ping: Latency,
    #[serde(default)]
    pub icmp_ping: Latency,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Upstreams {
    #[serde(default)]
    pub preferred_upstream: String,
    #[serde(default)]
    pub upstreams: Vec<Upstream>,
}

/// Body of `POST upstream` and `PUT preferredUpstream`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpstreamRequest {
    pub upstream: String,
}

/// Body of `POST login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metrics_decodes_camel_case() {
        let metrics: Metrics = serde_json::from_value(json!({
            "total": 120, "blocked": 30, "percentageBlocked": 25.0,
            "domainBlockLen": 500, "clients": 4, "allowed": 90
        }))
        .unwrap();
        assert_eq!(metrics.total, 120);
        assert_eq!(metrics.domain_block_len, 500);
        assert_eq!(metrics.percentage_blocked, 25.0);
    }

    #[test]
    fn test_query_types_accepts_both_shapes() {
        let bare: QueryTypes =
            serde_json::from_value(json!([{"count": 10, "queryType": "A"}])).unwrap();
        let wrapped: QueryTypes =
            serde_json::from_value(json!({"queries": [{"count": 10, "queryType": "A"}]}))
                .unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare.0[0].query_type, "A");
    }

    #[test]
    fn test_lists_keyed_by_name() {
        let lists: Lists = serde_json::from_value(json!({
            "lists": {
                "StevenBlack": {"active": true, "blockedCount": 120000, "lastUpdated": 1700000000},
                "Custom": {"active": false, "blockedCount": 3, "lastUpdated": "2024-05-01T10:00:00Z"}
            }
        }))
        .unwrap();
        let names: Vec<&String> = lists.lists.keys().collect();
        assert_eq!(names, vec!["Custom", "StevenBlack"]);
        assert_eq!(lists.lists["StevenBlack"].last_updated, Timestamp::Unix(1700000000));
    }

    #[test]
    fn test_upstream_latency_accepts_numbers_and_text() {
        let upstreams: Upstreams = serde_json::from_value(json!({
            "preferredUpstream": "1.1.1.1:53",
            "upstreams": [
                {"upstream": "1.1.1.1:53", "name": "Cloudflare", "preferred": true, "dnsPing": 12.4, "icmpPing": "8ms"},
                {"upstream": "8.8.8.8:53"}
            ]
        }))
        .unwrap();
        assert_eq!(upstreams.upstreams[0].dns_ping.to_string(), "12ms");
        assert_eq!(upstreams.upstreams[0].icmp_ping.to_string(), "8ms");
        assert_eq!(upstreams.upstreams[1].dns_ping.to_string(), "-");
    }

    #[test]
    fn test_timestamp_to_local() {
        assert!(Timestamp::Unix(1_700_000_000).to_local().is_some());
        assert!(
            Timestamp::Text("2024-05-01T10:00:00Z".to_string())
                .to_local()
                .is_some()
        );
        assert!(Timestamp::Text("yesterday".to_string()).to_local().is_none());
    }

    #[test]
    fn test_pause_status() {
        let paused: PauseStatus = serde_json::from_value(json!({"timeLeft": 42})).unwrap();
        assert!(paused.is_paused());
        assert!(!PauseStatus::default().is_paused());
    }
}
