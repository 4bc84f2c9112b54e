//! Headless mode - NDJSON event output instead of the TUI
//!
//! Runs the same engine as the terminal UI and writes one JSON object per
//! line to stdout for every target list change, selection change and notice.
//! Each event has an "event" field naming its type.
//!
//! # Example Output
//!
//! ```json
//! {"event":"targets_refreshed","targets":[{"connectUrl":"service:jmx:rmi:///jndi/rmi://app:9091/jmxrmi","alias":"app"}],"timestamp":1704700001000}
//! {"event":"selection_changed","target":{"connectUrl":"service:jmx:rmi:///jndi/rmi://app:9091/jmxrmi","alias":"app"},"timestamp":1704700002000}
//! {"event":"notice","level":"info","title":"Target Disappeared","message":"The selected target \"app\" disappeared.","timestamp":1704700003000}
//! ```

pub mod runner;

use chrono::Utc;
use serde::Serialize;
use std::io::{self, Write};
use tracing::error;

use tsel_app::EngineEvent;
use tsel_core::Target;

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// A full fetch replaced the target list
    TargetsRefreshed { targets: Vec<Target>, timestamp: i64 },

    /// A discovered target was added or updated
    TargetFound { target: Target, timestamp: i64 },

    /// A target went away
    TargetLost { target: Target, timestamp: i64 },

    /// A target's details changed
    TargetChanged { target: Target, timestamp: i64 },

    /// The selected target changed; `null` means nothing is selected
    SelectionChanged {
        target: Option<Target>,
        timestamp: i64,
    },

    /// A user-facing notice
    Notice {
        level: String,
        title: String,
        message: String,
        timestamp: i64,
    },

    /// A stdin command could not be carried out
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Map an engine event; `None` for events headless mode does not report
    pub fn from_engine_event(event: &EngineEvent) -> Option<Self> {
        let timestamp = Self::now();
        let event = match event {
            EngineEvent::TargetsRefreshed { targets } => Self::TargetsRefreshed {
                targets: targets.clone(),
                timestamp,
            },
            EngineEvent::TargetFound { target } => Self::TargetFound {
                target: target.clone(),
                timestamp,
            },
            EngineEvent::TargetLost { target } => Self::TargetLost {
                target: target.clone(),
                timestamp,
            },
            EngineEvent::TargetChanged { target } => Self::TargetChanged {
                target: target.clone(),
                timestamp,
            },
            EngineEvent::SelectionChanged { target } => Self::SelectionChanged {
                target: (!target.is_none()).then(|| target.clone()),
                timestamp,
            },
            EngineEvent::Notice {
                level,
                title,
                message,
            } => Self::Notice {
                level: level.as_str().to_string(),
                title: title.clone(),
                message: message.clone(),
                timestamp,
            },
            EngineEvent::Shutdown => return None,
        };
        Some(event)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            fatal: false,
            timestamp: Self::now(),
        }
    }

    /// Emit this event to stdout as one NDJSON line
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        // Consumers read line by line
        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }
}
