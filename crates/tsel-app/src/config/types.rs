//! Configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default discovery server URL
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8181";

/// Settings from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub refresh: RefreshSettings,
    pub ui: UiSettings,
}

/// `[server]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base URL of the discovery server
    pub url: String,
    /// Bearer token; empty means no Authorization header
    pub auth_token: String,
    pub request_timeout_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            auth_token: String::new(),
            request_timeout_ms: 10_000,
        }
    }
}

impl ServerSettings {
    pub fn auth_token(&self) -> Option<String> {
        let token = self.auth_token.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// `[refresh]` section
///
/// The timer period is `period * units` milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshSettings {
    pub auto_refresh: bool,
    pub period: u64,
    /// Milliseconds per period unit (1000 = seconds)
    pub units: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            period: 30,
            units: 1000,
        }
    }
}

/// `[ui]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Narrow card layout
    pub compact: bool,
    /// Notices kept on screen before the oldest is dropped
    pub max_notices: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            compact: false,
            max_notices: 5,
        }
    }
}

/// Command line values that take precedence over the config file.
///
/// Re-applied after every reload so a file change never undoes a flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub url: Option<String>,
    pub auth_token: Option<String>,
    pub compact: bool,
    pub no_auto_refresh: bool,
}

impl SettingsOverrides {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(url) = &self.url {
            settings.server.url = url.clone();
        }
        if let Some(token) = &self.auth_token {
            settings.server.auth_token = token.clone();
        }
        if self.compact {
            settings.ui.compact = true;
        }
        if self.no_auto_refresh {
            settings.refresh.auto_refresh = false;
        }
    }
}
