//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::{AppPhase, AppState};
use tracing::{debug, warn};

use super::{keys::handle_key, reconcile, refresh, selection, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Key(key) => {
            if let Some(msg) = handle_key(state, key) {
                UpdateResult::message(msg)
            } else {
                UpdateResult::none()
            }
        }

        Message::Quit => {
            state.request_quit();
            UpdateResult::none()
        }

        Message::Mount => {
            if state.phase != AppPhase::Initializing {
                debug!("Ignoring duplicate mount");
                return UpdateResult::none();
            }
            state.phase = AppPhase::Running;
            refresh::handle_mount(state)
        }

        // ─────────────────────────────────────────────────────────
        // Refresh Driver
        // ─────────────────────────────────────────────────────────
        Message::RefreshTargets { trigger } => refresh::handle_refresh(state, trigger),
        Message::TargetsFetched { targets } => refresh::handle_targets_fetched(state, targets),
        Message::TargetsFetchFailed { error } => refresh::handle_fetch_failed(state, error),
        Message::ReadinessChanged { ready } => refresh::handle_readiness_changed(state, ready),
        Message::SettingsReloaded(settings) => refresh::handle_settings_reloaded(state, *settings),
        Message::ConfigWatcherError { message } => {
            warn!("Config watcher error: {}", message);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Event Reconciler
        // ─────────────────────────────────────────────────────────
        Message::Discovery(event) => reconcile::handle_discovery_event(state, event),
        Message::DiscoveryDecodeFailed { error } => reconcile::handle_decode_failed(state, error),

        // ─────────────────────────────────────────────────────────
        // Selection Tracker
        // ─────────────────────────────────────────────────────────
        Message::Select(sel) => selection::handle_select(state, sel),
        Message::SelectionChanged(target) => selection::handle_selection_changed(state, target),
        Message::TargetRejected { target, reason } => {
            selection::handle_target_rejected(state, target, reason)
        }

        // ─────────────────────────────────────────────────────────
        // Dropdown
        // ─────────────────────────────────────────────────────────
        Message::ToggleDropdown => selection::handle_toggle_dropdown(state),
        Message::CloseDropdown => {
            state.dropdown.expanded = false;
            UpdateResult::none()
        }
        Message::HighlightNext => selection::handle_highlight_next(state),
        Message::HighlightPrevious => selection::handle_highlight_previous(state),
        Message::HighlightFirst => {
            if state.dropdown.expanded {
                state.dropdown.highlighted = 0;
            }
            UpdateResult::none()
        }
        Message::HighlightLast => {
            if state.dropdown.expanded {
                state.dropdown.highlighted = state.option_count() - 1;
            }
            UpdateResult::none()
        }
        Message::CommitHighlighted => selection::handle_commit_highlighted(state),

        Message::DismissNotice => {
            state.notices.dismiss_oldest();
            UpdateResult::none()
        }
    }
}
