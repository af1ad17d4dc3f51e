//! Backend connection settings.
//!
//! Configuration priority: explicit `with_*` overrides > environment
//! variables > built-in defaults.

use std::env;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!("reel-discover/", env!("CARGO_PKG_VERSION"));

/// Environment variable overriding the backend base URL
pub const ENV_BASE_URL: &str = "REEL_API_BASE_URL";
/// Environment variable overriding the request timeout, in seconds (0 disables it)
pub const ENV_TIMEOUT_SECS: &str = "REEL_API_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base path every endpoint is appended to, e.g. `http://host:5000/api`
    pub base_url: String,
    /// Whole-request timeout enforced by the transport; `None` waits forever
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ApiConfig {
    /// Defaults overlaid with `REEL_API_BASE_URL` / `REEL_API_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(0) => config.timeout = None,
                Ok(secs) => config.timeout = Some(Duration::from_secs(secs)),
                Err(_) => warn!(
                    "Ignoring {}={:?}: not a whole number of seconds",
                    ENV_TIMEOUT_SECS, raw
                ),
            }
        }

        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
