use crate::api::resources::{
    AuditEntry, ClientList, Lists, Metrics, PauseStatus, QueryTypes, TopBlockedDomains, Upstreams,
};
use crate::environment::Environment;

pub(crate) mod client;
pub use client::{ApiClient, RequestResult};
pub mod error;
pub mod error_handler;
pub mod resources;

#[cfg(test)]
use mockall::automock;

/// Typed access to the goaway REST API.
///
/// Every operation performs exactly one request; failures come back as a result
/// with no body after the user has been notified.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait GoawayApi: Send + Sync {
    fn environment(&self) -> &Environment;

    /// Recent audit log entries.
    async fn audit(&self) -> RequestResult<Vec<AuditEntry>>;

    /// Remaining time of a blocking pause.
    async fn pause_status(&self) -> RequestResult<PauseStatus>;

    /// Query totals and block ratio.
    async fn metrics(&self) -> RequestResult<Metrics>;

    /// Query counts per DNS record type.
    async fn query_types(&self) -> RequestResult<QueryTypes>;

    /// Most frequently blocked domains.
    async fn top_blocked_domains(&self) -> RequestResult<TopBlockedDomains>;

    /// Clients that have sent queries.
    async fn clients(&self) -> RequestResult<ClientList>;

    /// Configured blocklists.
    async fn lists(&self) -> RequestResult<Lists>;

    /// Upstream resolvers and their latency.
    async fn upstreams(&self) -> RequestResult<Upstreams>;

    /// Adds domains to the custom blocklist.
    async fn add_custom_domains(&self, domains: &[String]) -> RequestResult;

    /// Registers a new upstream resolver.
    async fn add_upstream(&self, upstream: &str) -> RequestResult;

    /// Makes an upstream the preferred one.
    async fn set_preferred_upstream(&self, upstream: &str) -> RequestResult;

    /// Removes an upstream resolver.
    async fn remove_upstream(&self, upstream: &str) -> RequestResult;

    /// Starts an authenticated session. Never triggers the login redirect.
    async fn login(&self, username: &str, password: &str) -> RequestResult;
}
