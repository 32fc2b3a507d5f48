use crate::consts::cli_consts::http::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// An API URL that is neither `local` nor an `http(s)://` address.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid API URL: {0}. It should start with http:// or https://")]
pub struct InvalidApiUrl(pub String);

/// Which goaway server the dashboard talks to.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Environment {
    /// A server on this machine at the default address.
    #[default]
    Local,
    /// A server at an explicitly configured address.
    Custom { api_url: String },
}

impl Environment {
    /// Returns the base URL of the goaway server, without a trailing slash.
    pub fn api_url(&self) -> String {
        match self {
            Environment::Local => DEFAULT_API_URL.to_string(),
            Environment::Custom { api_url } => api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Picks the first configured address, falling back to [`Environment::Local`].
    ///
    /// An invalid first address is an error rather than a silent fallback.
    pub fn resolve<'a>(
        candidates: impl IntoIterator<Item = Option<&'a str>>,
    ) -> Result<Self, InvalidApiUrl> {
        match candidates
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|candidate| !candidate.is_empty())
        {
            Some(candidate) => candidate.parse(),
            None => Ok(Environment::Local),
        }
    }
}

impl FromStr for Environment {
    type Err = InvalidApiUrl;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "local" => Ok(Environment::Local),
            _ if lower.starts_with("http://") || lower.starts_with("https://") => {
                Ok(Environment::Custom {
                    api_url: s.trim_end_matches('/').to_string(),
                })
            }
            _ => Err(InvalidApiUrl(s.to_string())),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Custom { .. } => write!(f, "Custom"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.api_url())
    }
}

/// Path prefix placed between the server address and a resource path.
///
/// Older server builds serve the API from the root, newer ones under `/api/`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApiPrefix {
    /// Resources live under `/api/`.
    #[default]
    Api,
    /// Resources live directly under `/`.
    Root,
}

impl ApiPrefix {
    pub fn as_path(&self) -> &'static str {
        match self {
            ApiPrefix::Api => "/api/",
            ApiPrefix::Root => "/",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_environment() {
        assert_eq!("local".parse::<Environment>(), Ok(Environment::Local));
        assert_eq!(
            "http://10.0.0.2:8080/".parse::<Environment>(),
            Ok(Environment::Custom {
                api_url: "http://10.0.0.2:8080".to_string()
            })
        );
        assert!("ftp://example.com".parse::<Environment>().is_err());
    }

    #[test]
    fn test_resolve_prefers_first_configured_value() {
        let env = Environment::resolve([None, Some("  "), Some("https://dns.lan"), Some("local")]);
        assert_eq!(env.map(|env| env.api_url()), Ok("https://dns.lan".to_string()));
    }

    #[test]
    fn test_resolve_falls_back_to_default_address() {
        let env = Environment::resolve([None, Some(""), None]);
        assert_eq!(env, Ok(Environment::Local));
        assert_eq!(Environment::Local.api_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_resolve_rejects_invalid_address_before_config() {
        let env = Environment::resolve([Some("dns.lan:8080"), Some("https://configured.lan")]);
        assert_eq!(env, Err(InvalidApiUrl("dns.lan:8080".to_string())));
        assert!(
            env.unwrap_err()
                .to_string()
                .contains("should start with http:// or https://")
        );
    }

    #[test]
    fn test_api_prefix_paths() {
        assert_eq!(ApiPrefix::Api.as_path(), "/api/");
        assert_eq!(ApiPrefix::Root.as_path(), "/");
        assert_eq!(ApiPrefix::Root.to_string(), "root");
    }
}
