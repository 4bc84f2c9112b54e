//! Application state (Model in TEA pattern)

use std::time::Duration;

use tsel_core::{Target, TargetList};

use crate::config::Settings;
use crate::notices::Notices;
use crate::services::SettingsStore;

/// Application lifecycle phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppPhase {
    /// Created, subscriptions not started
    #[default]
    Initializing,
    /// Mounted and running
    Running,
    /// Shutting down
    Quitting,
}

/// Dropdown state for the target select box.
///
/// Option index 0 is the placeholder; index `i + 1` is `targets[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropdownState {
    pub expanded: bool,
    pub highlighted: usize,
}

/// Complete application state (the Model in TEA)
#[derive(Debug, Clone)]
pub struct AppState {
    pub phase: AppPhase,

    /// Known targets, unique by connect URL
    pub targets: TargetList,

    /// Mirror of the target store's current value
    pub selected: Target,

    /// Value handed to the target store whose echo has not arrived yet
    pub pending_selection: Option<Target>,

    /// True exactly while a full fetch is outstanding
    pub loading: bool,

    pub dropdown: DropdownState,

    /// Last readiness value seen from the notification channel
    pub notifications_ready: bool,

    /// Period of the armed refresh timer, `None` when no timer is armed
    pub refresh_period: Option<Duration>,

    pub notices: Notices,

    /// Application settings from config file (with CLI overrides)
    pub settings: Settings,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            phase: AppPhase::Initializing,
            targets: TargetList::new(),
            selected: Target::none(),
            pending_selection: None,
            loading: false,
            dropdown: DropdownState::default(),
            notifications_ready: false,
            refresh_period: None,
            notices: Notices::new(settings.ui.max_notices),
            settings,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    pub fn request_quit(&mut self) {
        self.phase = AppPhase::Quitting;
    }

    /// Timer period the current settings ask for
    pub fn desired_refresh_period(&self) -> Option<Duration> {
        self.settings.auto_refresh_interval()
    }

    pub fn is_compact(&self) -> bool {
        self.settings.ui.compact
    }

    /// The selection once the store catches up: the pending request if
    /// any, otherwise the mirrored value.
    pub fn effective_selection(&self) -> &Target {
        self.pending_selection.as_ref().unwrap_or(&self.selected)
    }

    // ─────────────────────────────────────────────────────────
    // Dropdown helpers
    // ─────────────────────────────────────────────────────────

    /// Number of dropdown options (placeholder + targets)
    pub fn option_count(&self) -> usize {
        self.targets.len() + 1
    }

    /// Option index of the current selection (0 when nothing is selected
    /// or the selection is no longer listed)
    pub fn selected_option_index(&self) -> usize {
        if self.selected.is_none() {
            return 0;
        }
        self.targets
            .position(&self.selected.connect_url)
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// What committing the highlighted option would select
    pub fn highlighted_target(&self) -> Option<&Target> {
        match self.dropdown.highlighted {
            0 => None,
            i => self.targets.as_slice().get(i - 1),
        }
    }

    /// Keep the highlight on a valid option after the list changed
    pub fn clamp_highlight(&mut self) {
        let last = self.option_count() - 1;
        if self.dropdown.highlighted > last {
            self.dropdown.highlighted = last;
        }
    }
}
