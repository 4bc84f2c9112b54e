//! Selection tracker and dropdown handlers

use tracing::{debug, warn};

use crate::message::{Message, Selection};
use crate::state::AppState;
use tsel_core::Target;

use super::{UpdateAction, UpdateResult};

/// Commit a selection. Closes the dropdown whatever the outcome.
pub fn handle_select(state: &mut AppState, selection: Selection) -> UpdateResult {
    state.dropdown.expanded = false;

    match selection {
        Selection::Placeholder => request_target(state, Target::none()),
        Selection::Target(target) if &target == state.effective_selection() => {
            debug!("Selection unchanged: {}", target);
            UpdateResult::none()
        }
        Selection::Target(target) => request_target(state, target),
    }
}

/// Hand `target` to the store and remember it until the echo arrives.
pub(super) fn request_target(state: &mut AppState, target: Target) -> UpdateResult {
    state.pending_selection = Some(target.clone());
    UpdateResult::action(UpdateAction::SetTarget { target })
}

/// Mirror a value published by the target store, whoever set it.
pub fn handle_selection_changed(state: &mut AppState, target: Target) -> UpdateResult {
    debug!("Selection is now {}", target);
    if state.pending_selection.as_ref() == Some(&target) {
        state.pending_selection = None;
    }
    state.selected = target;
    UpdateResult::none()
}

pub fn handle_target_rejected(state: &mut AppState, target: Target, reason: String) -> UpdateResult {
    if state.pending_selection.as_ref() == Some(&target) {
        state.pending_selection = None;
    }

    if target.is_none() {
        // Nothing left to fall back to
        warn!("Target store rejected clearing the selection: {}", reason);
        return UpdateResult::none();
    }

    state.notices.danger("Cannot set target", reason);
    UpdateResult::message(Message::Select(Selection::Placeholder))
}

// ─────────────────────────────────────────────────────────
// Dropdown
// ─────────────────────────────────────────────────────────

/// Open (highlighting the current selection) or close the dropdown.
/// Disabled while a fetch is outstanding.
pub fn handle_toggle_dropdown(state: &mut AppState) -> UpdateResult {
    if state.dropdown.expanded {
        state.dropdown.expanded = false;
        return UpdateResult::none();
    }
    if state.loading {
        debug!("Select box disabled while loading");
        return UpdateResult::none();
    }
    state.dropdown.expanded = true;
    state.dropdown.highlighted = state.selected_option_index();
    UpdateResult::none()
}

pub fn handle_highlight_next(state: &mut AppState) -> UpdateResult {
    if state.dropdown.expanded {
        let count = state.option_count();
        state.dropdown.highlighted = (state.dropdown.highlighted + 1) % count;
    }
    UpdateResult::none()
}

pub fn handle_highlight_previous(state: &mut AppState) -> UpdateResult {
    if state.dropdown.expanded {
        let count = state.option_count();
        state.dropdown.highlighted = (state.dropdown.highlighted + count - 1) % count;
    }
    UpdateResult::none()
}

pub fn handle_commit_highlighted(state: &mut AppState) -> UpdateResult {
    if !state.dropdown.expanded {
        return UpdateResult::none();
    }
    let selection = match state.highlighted_target() {
        Some(target) => Selection::Target(target.clone()),
        None => Selection::Placeholder,
    };
    UpdateResult::message(Message::Select(selection))
}
