pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! This module contains all configuration constants for the dashboard,
    //! organized by functional area for clarity and maintainability.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Maximum number of buffered notifications between the notifier and the UI
    pub const EVENT_QUEUE_SIZE: usize = 100;

    /// Capacity of the session event broadcast channel
    pub const SESSION_EVENT_CAPACITY: usize = 16;

    // =============================================================================
    // NOTIFICATION CONFIGURATION
    // =============================================================================

    /// Notification deduplication and display timing
    pub mod notifications {
        use std::time::Duration;

        /// Window during which an identical warning is not shown again (milliseconds)
        pub const DEDUPE_WINDOW_MS: u64 = 3_000;

        /// How long a toast stays visible in the dashboard footer (milliseconds)
        pub const TOAST_DURATION_MS: u64 = 4_000;

        pub const fn dedupe_window() -> Duration {
            Duration::from_millis(DEDUPE_WINDOW_MS)
        }

        pub const fn toast_duration() -> Duration {
            Duration::from_millis(TOAST_DURATION_MS)
        }
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// HTTP client configuration
    pub mod http {
        use std::time::Duration;

        /// Address used when no API URL is configured anywhere
        pub const DEFAULT_API_URL: &str = "http://localhost:8080";

        /// Connection establishment timeout (seconds)
        pub const CONNECT_TIMEOUT_SECS: u64 = 5;

        /// Whole-request timeout (seconds)
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }

    // =============================================================================
    // POLLING CONFIGURATION
    // =============================================================================

    /// Refresh cadence for each dashboard panel
    /// Every panel owns its own timer; there is no shared scheduler.
    pub mod polling {
        use std::time::Duration;

        pub const METRICS_INTERVAL_MS: u64 = 1_000;
        pub const PAUSE_INTERVAL_MS: u64 = 1_000;
        pub const QUERY_TYPES_INTERVAL_MS: u64 = 2_000;
        pub const TOP_BLOCKED_INTERVAL_MS: u64 = 3_000;
        pub const CLIENTS_INTERVAL_MS: u64 = 5_000;
        pub const LISTS_INTERVAL_MS: u64 = 5_000;
        pub const UPSTREAMS_INTERVAL_MS: u64 = 5_000;
        pub const AUDIT_INTERVAL_MS: u64 = 5_000;

        pub const fn interval(millis: u64) -> Duration {
            Duration::from_millis(millis)
        }
    }
}
