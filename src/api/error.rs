//! Error handling for the API module

use serde::Deserialize;
use thiserror::Error;

/// Shown when a failed response carries no readable error message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong, please try again";

/// Shown when the server could not be reached at all.
pub const UNREACHABLE_MESSAGE: &str = "Could not reach the goaway server";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never got a response: connection refused, DNS failure, timeout.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered but the body could not be read to the end.
    #[error("Failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The server rejected the session.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The server answered with a non-success status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body could not be decoded into the expected shape.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = match response.bytes().await {
            Ok(body) => ErrorEnvelope::message_from_body(&body),
            Err(_) => GENERIC_ERROR_MESSAGE.to_string(),
        };

        if status == 401 {
            ApiError::Unauthorized { message }
        } else {
            ApiError::Http { status, message }
        }
    }

    /// The text shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => UNREACHABLE_MESSAGE.to_string(),
            ApiError::Body(_) => GENERIC_ERROR_MESSAGE.to_string(),
            ApiError::Unauthorized { message } | ApiError::Http { message, .. } => message.clone(),
            ApiError::Decode(_) => "Received an unreadable response from the server".to_string(),
        }
    }
}

/// Canonical error body.
///
/// Some server handlers answer `{"error": ...}` and others `{"message": ...}`; both are
/// accepted here and `error` wins when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorEnvelope {
    pub fn into_message(self) -> Option<String> {
        self.error
            .or(self.message)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }

    /// Extracts the error message from a raw body, substituting the generic message.
    pub fn message_from_body(body: &[u8]) -> String {
        serde_json::from_slice::<ErrorEnvelope>(body)
            .ok()
            .and_then(ErrorEnvelope::into_message)
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
    }
}
