//! Centralized error classification

use crate::api::error::ApiError;
use crate::logging::LogLevel;

/// Centralized error handler for all API calls
#[derive(Debug, Clone, Default)]
pub struct ErrorHandler;

impl ErrorHandler {
    pub fn new() -> Self {
        Self
    }

    /// Classify error and determine appropriate log level
    pub fn classify_error(&self, error: &ApiError) -> LogLevel {
        match error {
            // Authentication errors - the user has to act
            ApiError::Unauthorized { .. } => LogLevel::Error,
            ApiError::Http { status, .. } if *status == 403 => LogLevel::Error,

            // Rate limiting - low priority
            ApiError::Http { status, .. } if *status == 429 => LogLevel::Debug,

            // Server errors - temporary issues
            ApiError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Network issues - usually temporary
            ApiError::Network(_) => LogLevel::Warn,

            // Connection dropped mid-body
            ApiError::Body(_) => LogLevel::Warn,

            // The server and dashboard disagree on a payload shape
            ApiError::Decode(_) => LogLevel::Error,

            // Other client errors are usually bad input
            ApiError::Http { .. } => LogLevel::Info,
        }
    }
}
