//! Connection settings and endpoint derivation

use std::time::Duration;

use url::Url;

use tsel_core::prelude::*;

/// Default HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const TARGETS_PATH: &str = "api/v1/targets";
const NOTIFICATIONS_PATH: &str = "api/notifications";

/// How to reach the discovery server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base server URL, e.g. `https://cryostat.example.com/`
    pub base_url: Url,
    /// Bearer token; `None` sends no Authorization header
    pub auth_token: Option<String>,
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Parse a base URL. Only `http` and `https` are accepted.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut url = Url::parse(base_url).map_err(|_| Error::invalid_server_url(base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_server_url(base_url));
        }
        // Url::join replaces the last path segment unless the path ends in '/'
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            base_url: url,
            auth_token: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Set the bearer token (empty strings are ignored)
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// `GET` endpoint listing all known targets.
pub fn targets_url(base: &Url) -> Result<Url> {
    base.join(TARGETS_PATH)
        .map_err(|e| Error::invalid_server_url(format!("{base}: {e}")))
}

/// WebSocket endpoint for push notifications (`http` → `ws`, `https` → `wss`).
pub fn notifications_url(base: &Url) -> Result<Url> {
    let mut url = base
        .join(NOTIFICATIONS_PATH)
        .map_err(|e| Error::invalid_server_url(format!("{base}: {e}")))?;
    let scheme = match url.scheme() {
        "https" => "wss",
        _ => "ws",
    };
    url.set_scheme(scheme)
        .map_err(|_| Error::invalid_server_url(base.as_str()))?;
    Ok(url)
}
