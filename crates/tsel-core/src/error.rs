//! Application error types with rich context

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Terminal/TUI Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    #[error("Failed to initialize terminal: {0}")]
    TerminalInit(#[source] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Server Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid server URL: {url}")]
    InvalidServerUrl { url: String },

    #[error("Target API error: {message}")]
    Api { message: String },

    #[error("Target API returned HTTP {status}: {message}")]
    ApiStatus { status: u16, message: String },

    #[error("Notification channel error: {message}")]
    NotificationChannel { message: String },

    #[error("Notification protocol error: {message}")]
    Protocol { message: String },

    // ─────────────────────────────────────────────────────────────
    // Selection Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Target rejected: {reason}")]
    TargetRejected { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn invalid_server_url(url: impl Into<String>) -> Self {
        Self::InvalidServerUrl { url: url.into() }
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    pub fn api_status(status: u16, message: impl Into<String>) -> Self {
        Self::ApiStatus {
            status,
            message: message.into(),
        }
    }

    pub fn notification_channel(message: impl Into<String>) -> Self {
        Self::NotificationChannel {
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn target_rejected(reason: impl Into<String>) -> Self {
        Self::TargetRejected {
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Api { .. }
                | Error::ApiStatus { .. }
                | Error::NotificationChannel { .. }
                | Error::Protocol { .. }
                | Error::TargetRejected { .. }
        )
    }
}
