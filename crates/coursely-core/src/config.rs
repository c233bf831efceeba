// ── Runtime connection configuration ──
//
// Describes *where* the course API lives and how to reach it. Carries no
// credentials and never touches disk; the CLI resolves profiles and hands
// a `ClientConfig` in.

use std::path::PathBuf;
use std::time::Duration;

use coursely_api::{CourseClient, TlsMode, TransportConfig};
use url::Url;

use crate::error::CoreError;

/// Base URL used when no profile or flag names one.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development servers).
    DangerAcceptInvalid,
}

/// How to reach the course API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g. `http://localhost:3000`). May carry a path prefix.
    pub api_url: Url,
    pub tls: TlsVerification,
    /// Request timeout. `None` waits for the server indefinitely.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            tls: TlsVerification::default(),
            timeout: None,
        }
    }

    /// Parse `api_url` and wrap it with default transport settings.
    pub fn parse(api_url: &str) -> Result<Self, CoreError> {
        let url = Url::parse(api_url).map_err(|e| CoreError::Config {
            message: format!("invalid API URL '{api_url}': {e}"),
        })?;
        Ok(Self::new(url))
    }

    /// Build the HTTP gateway for this configuration.
    pub fn build_client(&self) -> Result<CourseClient, CoreError> {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        let transport = TransportConfig {
            tls,
            timeout: self.timeout,
            ..TransportConfig::default()
        };
        Ok(CourseClient::new(self.api_url.clone(), &transport)?)
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_server_without_timeout() {
        let cfg = ClientConfig::parse(DEFAULT_API_URL).unwrap();
        assert_eq!(cfg.api_url.as_str(), "http://localhost:3000/");
        assert!(cfg.timeout.is_none());
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn rejects_unparseable_url() {
        assert!(matches!(
            ClientConfig::parse("not a url").unwrap_err(),
            CoreError::Config { .. }
        ));
    }

    #[test]
    fn builds_client_with_path_prefix() {
        let cfg = ClientConfig::new(Url::parse("https://example.com/backend/").unwrap());
        let client = cfg.build_client().unwrap();
        assert_eq!(
            client.url(&["api", "courses"]).unwrap().as_str(),
            "https://example.com/backend/api/courses"
        );
    }

    #[test]
    fn unreadable_ca_is_config_error() {
        let cfg = ClientConfig {
            tls: TlsVerification::CustomCa(PathBuf::from("/nonexistent/ca.pem")),
            ..ClientConfig::parse(DEFAULT_API_URL).unwrap()
        };
        assert!(matches!(
            cfg.build_client().unwrap_err(),
            CoreError::Config { .. }
        ));
    }
}
