//! Message types for the application (TEA pattern)

use crate::config::Settings;
use crate::input_key::InputKey;
use tsel_core::{DiscoveryEvent, Target};

/// What caused a full target list refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// Component mounted
    Mount,
    /// Notification channel became ready
    Ready,
    /// Auto-refresh timer fired
    Timer,
    /// User pressed refresh
    Manual,
}

impl RefreshTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mount => "mount",
            Self::Ready => "ready",
            Self::Timer => "timer",
            Self::Manual => "manual",
        }
    }
}

/// A selection request from the user (or the reconciler)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The "Select Target..." option; always means "select none"
    Placeholder,
    Target(Target),
}

/// All possible messages in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Force quit (Ctrl+C, signal handler, `q`)
    Quit,

    /// Start subscriptions and load the list
    Mount,

    // ─────────────────────────────────────────────────────────
    // Refresh Driver
    // ─────────────────────────────────────────────────────────
    /// Request a full re-fetch of the target list
    RefreshTargets { trigger: RefreshTrigger },
    /// A full fetch completed
    TargetsFetched { targets: Vec<Target> },
    /// A full fetch failed
    TargetsFetchFailed { error: String },
    /// Notification channel readiness changed
    ReadinessChanged { ready: bool },
    /// Config file changed; settings reloaded with overrides applied
    SettingsReloaded(Box<Settings>),
    /// Config watcher failed
    ConfigWatcherError { message: String },

    // ─────────────────────────────────────────────────────────
    // Event Reconciler
    // ─────────────────────────────────────────────────────────
    /// A decoded discovery notification
    Discovery(DiscoveryEvent),
    /// A discovery notification whose payload could not be decoded
    DiscoveryDecodeFailed { error: String },

    // ─────────────────────────────────────────────────────────
    // Selection Tracker
    // ─────────────────────────────────────────────────────────
    /// Commit a selection
    Select(Selection),
    /// The target store published a value
    SelectionChanged(Target),
    /// The target store refused a selection
    TargetRejected { target: Target, reason: String },

    // ─────────────────────────────────────────────────────────
    // Dropdown
    // ─────────────────────────────────────────────────────────
    ToggleDropdown,
    CloseDropdown,
    HighlightNext,
    HighlightPrevious,
    HighlightFirst,
    HighlightLast,
    /// Commit the highlighted option
    CommitHighlighted,

    /// Dismiss the oldest notice
    DismissNotice,
}
