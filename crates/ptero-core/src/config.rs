//! Configuration structures for panel clients.
//!
//! [`Credentials`] pins a client to one panel, one API key and one scope.
//! [`ClientConfig`] tunes the HTTP client and the pagination walker.

use crate::error::{Error, Result};
use crate::types::Scope;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Default maximum number of pages fetched by a single list operation.
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// Default User-Agent when a client crate does not set its own.
pub const DEFAULT_USER_AGENT: &str = concat!("ptero-core/", env!("CARGO_PKG_VERSION"));

/// Panel address, API key and scope shared by every request of a client.
///
/// Immutable once constructed.
pub struct Credentials {
    scope: Scope,
    panel_url: String,
    api_key: SecretString,
    user_agent: String,
}

impl Credentials {
    /// Create credentials for the given scope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the panel URL or the API key is
    /// empty, or if the URL cannot be parsed.
    pub fn new(
        scope: Scope,
        panel_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let raw_url = panel_url.into();
        let panel_url = raw_url.trim().trim_end_matches('/');
        let api_key = api_key.into();

        if panel_url.is_empty() {
            return Err(Error::ConfigError(
                "a valid panel url is required".to_string(),
            ));
        }
        if api_key.trim().is_empty() {
            return Err(Error::ConfigError(format!(
                "a valid {scope} api key is required"
            )));
        }

        Url::parse(panel_url)
            .map_err(|e| Error::ConfigError(format!("Invalid panel URL `{panel_url}`: {e}")))?;

        let credentials = Self {
            scope,
            panel_url: panel_url.to_string(),
            api_key: SecretString::from(api_key),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        };
        // Reject keys that cannot be sent as a header now rather than on first use.
        credentials.authorization()?;

        Ok(credentials)
    }

    /// Set the User-Agent sent with every request.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the credential scope.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    /// Returns the panel URL without a trailing slash.
    #[must_use]
    pub fn panel_url(&self) -> &str {
        &self.panel_url
    }

    /// Returns the User-Agent sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the root every request path is appended to, e.g.
    /// `https://panel.example.com/api/application`.
    #[must_use]
    pub fn api_root(&self) -> String {
        format!("{}/api/{}", self.panel_url, self.scope.path_segment())
    }

    pub(crate) fn authorization(&self) -> Result<reqwest::header::HeaderValue> {
        let mut value = reqwest::header::HeaderValue::from_str(&format!(
            "Bearer {}",
            self.api_key.expose_secret()
        ))
        .map_err(|e| Error::ConfigError(format!("API key is not a valid header value: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("scope", &self.scope)
            .field("panel_url", &self.panel_url)
            .field("api_key", &"[REDACTED]")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// HTTP client and pagination settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct ClientConfig {
    /// Request timeout in seconds; `None` leaves deadlines to the transport
    #[validate(range(min = 1, max = 600))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Upper bound on pages fetched by a single list operation
    #[validate(range(min = 1, max = 100_000))]
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

impl ClientConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            request_timeout_secs: None,
            tls_verify: default_tls_verify(),
            max_pages: default_max_pages(),
        }
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set the maximum number of pages a list operation may fetch.
    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if a value is out of range.
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
