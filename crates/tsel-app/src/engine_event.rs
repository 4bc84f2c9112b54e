//! Domain events emitted by the Engine for external consumers
//!
//! The headless runner turns these into NDJSON lines. Events are broadcast
//! after each message processing cycle via `Engine::subscribe()`.

use crate::notices::NoticeLevel;
use tsel_core::Target;

/// Domain events emitted by the Engine for external consumers.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A full fetch replaced the target list
    TargetsRefreshed { targets: Vec<Target> },

    /// A FOUND event was applied
    TargetFound { target: Target },

    /// A LOST event was applied
    TargetLost { target: Target },

    /// A CHANGED event was applied
    TargetChanged { target: Target },

    /// The mirrored selection changed value
    SelectionChanged { target: Target },

    /// A notice was raised
    Notice {
        level: NoticeLevel,
        title: String,
        message: String,
    },

    /// Engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Returns a short string label for this event type (for logging/debugging).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TargetsRefreshed { .. } => "targets_refreshed",
            Self::TargetFound { .. } => "target_found",
            Self::TargetLost { .. } => "target_lost",
            Self::TargetChanged { .. } => "target_changed",
            Self::SelectionChanged { .. } => "selection_changed",
            Self::Notice { .. } => "notice",
            Self::Shutdown => "shutdown",
        }
    }
}
