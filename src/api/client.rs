//! goaway API Client
//!
//! One HTTP call per operation, no retries. Every failure is turned into a
//! `(status, None)` result plus a deduplicated user notification.

use crate::api::GoawayApi;
use crate::api::error::ApiError;
use crate::api::error_handler::ErrorHandler;
use crate::api::resources::{
    AuditEntry, ClientList, Lists, LoginRequest, Metrics, PauseStatus, QueryTypes,
    TopBlockedDomains, UpstreamRequest, Upstreams, paths,
};
use crate::consts::cli_consts::http;
use crate::environment::{ApiPrefix, Environment};
use crate::events::SessionEvent;
use crate::notify::Notifier;
use crate::polling::{Subscription, subscribe};
use log::{debug, log};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

// User-Agent string with dashboard version
const USER_AGENT: &str = concat!("goaway-dash/", env!("CARGO_PKG_VERSION"));

/// Outcome of one API call: the HTTP status and the decoded body, if any.
///
/// Network failures are reported as status 500 with no body.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestResult<T = serde_json::Value> {
    pub status: u16,
    pub body: Option<T>,
}

impl<T> RequestResult<T> {
    pub fn ok(status: u16, body: T) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self { status, body: None }
    }

    pub fn unreachable() -> Self {
        Self::empty(StatusCode::INTERNAL_SERVER_ERROR.as_u16())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED.as_u16()
    }

    pub fn into_body(self) -> Option<T> {
        self.body
    }
}

/// Per-call behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Do not publish [`SessionEvent::LoginRequired`] on a 401.
    pub skip_login_redirect: bool,
}

impl RequestOptions {
    pub fn without_login_redirect() -> Self {
        Self {
            skip_login_redirect: true,
        }
    }
}

#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    environment: Environment,
    prefix: ApiPrefix,
    notifier: Arc<Notifier>,
    session_events: broadcast::Sender<SessionEvent>,
    error_handler: ErrorHandler,
}

impl ApiClient {
    pub fn new(
        environment: Environment,
        prefix: ApiPrefix,
        notifier: Arc<Notifier>,
        session_events: broadcast::Sender<SessionEvent>,
    ) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .connect_timeout(http::connect_timeout())
            .timeout(http::request_timeout())
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            environment,
            prefix,
            notifier,
            session_events,
            error_handler: ErrorHandler::new(),
        })
    }

    pub fn notifier(&self) -> &Arc<Notifier> {
        &self.notifier
    }

    fn build_url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.environment.api_url().trim_end_matches('/'),
            self.prefix.as_path(),
            path.trim_start_matches('/')
        )
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> RequestResult<T> {
        self.send(Method::GET, path, None::<&()>, RequestOptions::default())
            .await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> RequestResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, Some(body), RequestOptions::default())
            .await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> RequestResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, path, Some(body), RequestOptions::default())
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> RequestResult<T> {
        self.send(Method::DELETE, path, None::<&()>, RequestOptions::default())
            .await
    }

    /// Performs one call and normalizes every outcome into a [`RequestResult`].
    pub async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> RequestResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.build_url(path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                self.report(&method, path, &ApiError::Network(e));
                return RequestResult::unreachable();
            }
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED && !options.skip_login_redirect {
            // Nobody listening (one-shot commands) is fine.
            let _ = self.session_events.send(SessionEvent::LoginRequired {
                path: path.to_string(),
            });
        }

        if !status.is_success() {
            let error = ApiError::from_response(response).await;
            self.report(&method, path, &error);
            return RequestResult::empty(status.as_u16());
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.report(&method, path, &ApiError::Body(e));
                return RequestResult::empty(status.as_u16());
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return RequestResult::empty(status.as_u16());
        }

        match serde_json::from_slice::<T>(&bytes) {
            Ok(body) => RequestResult::ok(status.as_u16(), body),
            Err(e) => {
                self.report(&method, path, &ApiError::Decode(e));
                RequestResult::empty(status.as_u16())
            }
        }
    }

    fn report(&self, method: &Method, path: &str, error: &ApiError) {
        let level: log::Level = self.error_handler.classify_error(error).into();
        log!(level, "{} {} failed: {}", method, path, error);
        self.notifier.warn(error.user_message());
    }

    /// Polls `path` every `interval`, decoding the body as `T`.
    pub fn subscribe<T>(
        self: &Arc<Self>,
        name: &'static str,
        path: &str,
        interval: Duration,
    ) -> Subscription<T>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let client = Arc::clone(self);
        let path = path.to_string();
        subscribe(name, interval, move || {
            let client = Arc::clone(&client);
            let path = path.clone();
            async move { client.get::<T>(&path).await.into_body() }
        })
    }
}

#[async_trait::async_trait]
impl GoawayApi for ApiClient {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    async fn audit(&self) -> RequestResult<Vec<AuditEntry>> {
        self.get(paths::AUDIT).await
    }

    async fn pause_status(&self) -> RequestResult<PauseStatus> {
        self.get(paths::PAUSE).await
    }

    async fn metrics(&self) -> RequestResult<Metrics> {
        self.get(paths::METRICS).await
    }

    async fn query_types(&self) -> RequestResult<QueryTypes> {
        self.get(paths::QUERY_TYPES).await
    }

    async fn top_blocked_domains(&self) -> RequestResult<TopBlockedDomains> {
        self.get(paths::TOP_BLOCKED_DOMAINS).await
    }

    async fn clients(&self) -> RequestResult<ClientList> {
        self.get(paths::CLIENTS).await
    }

    async fn lists(&self) -> RequestResult<Lists> {
        self.get(paths::LISTS).await
    }

    async fn upstreams(&self) -> RequestResult<Upstreams> {
        self.get(paths::UPSTREAMS).await
    }

    async fn add_custom_domains(&self, domains: &[String]) -> RequestResult {
        self.post(paths::CUSTOM, domains).await
    }

    async fn add_upstream(&self, upstream: &str) -> RequestResult {
        let request = UpstreamRequest {
            upstream: upstream.to_string(),
        };
        self.post(paths::UPSTREAM, &request).await
    }

    async fn set_preferred_upstream(&self, upstream: &str) -> RequestResult {
        let request = UpstreamRequest {
            upstream: upstream.to_string(),
        };
        self.put(paths::PREFERRED_UPSTREAM, &request).await
    }

    async fn remove_upstream(&self, upstream: &str) -> RequestResult {
        let path = format!("{}?upstream={}", paths::UPSTREAM, urlencoding::encode(upstream));
        self.delete(&path).await
    }

    async fn login(&self, username: &str, password: &str) -> RequestResult {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.send(
            Method::POST,
            paths::LOGIN,
            Some(&request),
            RequestOptions::without_login_redirect(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::{GENERIC_ERROR_MESSAGE, UNREACHABLE_MESSAGE};
    use crate::events::{Event, EventType};
    use crate::notify::SystemClock;
    use serde_json::json;
    use tokio::sync::mpsc;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Harness {
        client: ApiClient,
        notifications: mpsc::Receiver<Event>,
        session_events: broadcast::Receiver<SessionEvent>,
    }

    impl Harness {
        fn drain_notifications(&mut self) -> Vec<Event> {
            let mut events = Vec::new();
            while let Ok(event) = self.notifications.try_recv() {
                events.push(event);
            }
            events
        }
    }

    fn harness(api_url: &str, prefix: ApiPrefix) -> Harness {
        let (sender, notifications) = mpsc::channel(16);
        let notifier = Arc::new(Notifier::new(
            Box::new(SystemClock),
            Duration::from_secs(60),
            sender,
        ));
        let (session_sender, session_events) = broadcast::channel(4);
        let environment = Environment::Custom {
            api_url: api_url.to_string(),
        };
        let client = ApiClient::new(environment, prefix, notifier, session_sender).unwrap();
        Harness {
            client,
            notifications,
            session_events,
        }
    }

    #[test]
    fn test_build_url_joins_prefix_and_path() {
        let h = harness("http://dns.lan:8080/", ApiPrefix::Api);
        assert_eq!(h.client.build_url("metrics"), "http://dns.lan:8080/api/metrics");
        assert_eq!(h.client.build_url("/metrics"), "http://dns.lan:8080/api/metrics");

        let h = harness("http://dns.lan:8080", ApiPrefix::Root);
        assert_eq!(h.client.build_url("metrics"), "http://dns.lan:8080/metrics");
    }

    #[tokio::test]
    async fn test_success_returns_status_and_body() {
        let server = MockServer::start().await;
        let payload = json!({
            "total": 120, "blocked": 30, "percentageBlocked": 25.0,
            "domainBlockLen": 500, "clients": 4, "allowed": 90
        });
        Mock::given(method("GET"))
            .and(path("/api/metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
            .mount(&server)
            .await;

        let mut h = harness(&server.uri(), ApiPrefix::Api);
        let raw: RequestResult = h.client.get("metrics").await;
        assert_eq!(raw, RequestResult::ok(200, payload));

        let typed = h.client.metrics().await;
        assert!(typed.is_success());
        let metrics = typed.into_body().unwrap();
        assert_eq!(metrics.total, 120);
        assert_eq!(metrics.percentage_blocked, 25.0);
        assert!(h.drain_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_500_with_one_notification() {
        // Nothing listens on port 9 (discard) on test machines.
        let mut h = harness("http://127.0.0.1:9", ApiPrefix::Api);

        for _ in 0..3 {
            let result = h.client.metrics().await;
            assert_eq!(result, RequestResult::empty(500));
        }

        let events = h.drain_notifications();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].msg, UNREACHABLE_MESSAGE);
        assert_eq!(events[0].event_type, EventType::Warning);
    }

    #[tokio::test]
    async fn test_truncated_body_is_not_reported_as_unreachable() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            // Promise 100 bytes, send a few, then hang up.
            let _ = socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"total\"",
                )
                .await;
        });

        let mut h = harness(&format!("http://{}", addr), ApiPrefix::Api);
        let result = h.client.metrics().await;

        assert_eq!(result, RequestResult::empty(200));
        let events = h.drain_notifications();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].msg, GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_error_body_message_is_notified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/upstream"))
            .and(body_json(json!({"upstream": "bogus"})))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "invalid upstream"})),
            )
            .mount(&server)
            .await;

        let mut h = harness(&server.uri(), ApiPrefix::Api);
        let result = h.client.add_upstream("bogus").await;

        assert_eq!(result, RequestResult::empty(400));
        let events = h.drain_notifications();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].msg, "invalid upstream");
    }

    #[tokio::test]
    async fn test_message_field_and_undecodable_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lists"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "no lists"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/clients"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let mut h = harness(&server.uri(), ApiPrefix::Root);
        assert_eq!(h.client.lists().await.status, 404);
        assert_eq!(h.client.clients().await.status, 502);

        let messages: Vec<String> = h.drain_notifications().into_iter().map(|e| e.msg).collect();
        assert_eq!(messages, vec!["no lists".to_string(), GENERIC_ERROR_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_unauthorized_publishes_login_required() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/clients"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "session expired"})),
            )
            .mount(&server)
            .await;

        let mut h = harness(&server.uri(), ApiPrefix::Api);
        let result = h.client.clients().await;

        assert!(result.is_unauthorized());
        assert!(result.body.is_none());
        assert_eq!(
            h.session_events.try_recv().unwrap(),
            SessionEvent::LoginRequired {
                path: "clients".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_login_opts_out_of_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .and(body_json(json!({"username": "admin", "password": "wrong"})))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "bad credentials"})),
            )
            .mount(&server)
            .await;

        let mut h = harness(&server.uri(), ApiPrefix::Api);
        let result = h.client.login("admin", "wrong").await;

        assert_eq!(result.status, 401);
        assert!(h.session_events.try_recv().is_err());
        assert_eq!(h.drain_notifications()[0].msg, "bad credentials");
    }

    #[tokio::test]
    async fn test_remove_upstream_encodes_query() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/upstream"))
            .and(query_param("upstream", "[2606:4700::1111]:53"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let h = harness(&server.uri(), ApiPrefix::Api);
        let result = h.client.remove_upstream("[2606:4700::1111]:53").await;

        assert_eq!(result, RequestResult::empty(200));
    }

    #[tokio::test]
    async fn test_custom_domains_posted_as_array() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/custom"))
            .and(body_json(json!(["ads.example.com", "tracker.example.net"])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let h = harness(&server.uri(), ApiPrefix::Api);
        let domains = vec![
            "ads.example.com".to_string(),
            "tracker.example.net".to_string(),
        ];
        let result = h.client.add_custom_domains(&domains).await;

        assert!(result.is_success());
        assert_eq!(result.body, Some(json!({"message": "ok"})));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_decode_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/upstreams"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"upstreams": 7})))
            .mount(&server)
            .await;

        let mut h = harness(&server.uri(), ApiPrefix::Api);
        let result = h.client.upstreams().await;

        assert_eq!(result, RequestResult::empty(200));
        assert_eq!(h.drain_notifications().len(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_polls_raw_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/pause"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"timeLeft": 30})))
            .mount(&server)
            .await;

        let h = harness(&server.uri(), ApiPrefix::Api);
        let client = Arc::new(h.client);
        let mut subscription =
            client.subscribe::<PauseStatus>("pause", paths::PAUSE, Duration::from_secs(60));

        subscription.changed().await;
        assert_eq!(subscription.current(), Some(PauseStatus { time_left: 30 }));
        subscription.stop();
    }
}
