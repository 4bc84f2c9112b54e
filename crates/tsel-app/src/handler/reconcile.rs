//! Discovery event reconciler
//!
//! Applies one push event at a time to the latest list. Events are never
//! gated on `loading`; a fetch that completes afterwards replaces the list
//! wholesale (last writer wins).

use tracing::debug;

use crate::message::{Message, Selection};
use crate::state::AppState;
use tsel_core::{DiscoveryEvent, EventKind, Target, DISCOVERY_CATEGORY};

use super::selection::request_target;
use super::UpdateResult;

pub fn handle_discovery_event(state: &mut AppState, event: DiscoveryEvent) -> UpdateResult {
    let DiscoveryEvent { kind, service_ref } = event;
    match kind {
        EventKind::Found => handle_found(state, service_ref),
        EventKind::Lost => handle_lost(state, service_ref),
        EventKind::Changed => handle_changed(state, service_ref),
        EventKind::Unknown(kind) => {
            report_bad_message(state, format!("Unknown event type {kind}"));
            UpdateResult::none()
        }
    }
}

/// A notification arrived whose payload is not a discovery event.
pub fn handle_decode_failed(state: &mut AppState, error: String) -> UpdateResult {
    report_bad_message(state, error);
    UpdateResult::none()
}

fn handle_found(state: &mut AppState, target: Target) -> UpdateResult {
    let replaced = state.targets.upsert(target);
    debug!(
        "FOUND: {} ({} targets)",
        if replaced { "replaced" } else { "appended" },
        state.targets.len()
    );
    UpdateResult::none()
}

fn handle_lost(state: &mut AppState, target: Target) -> UpdateResult {
    state.targets.remove(&target.connect_url);
    state.clamp_highlight();
    debug!("LOST: {} ({} targets)", target.connect_url, state.targets.len());

    if let Some(alias) = selection_matching(state, &target).map(|t| t.alias.clone()) {
        state.notices.info(
            "Target Disappeared",
            format!("The selected target \"{alias}\" disappeared."),
        );
        return UpdateResult::message(Message::Select(Selection::Placeholder));
    }
    UpdateResult::none()
}

fn handle_changed(state: &mut AppState, target: Target) -> UpdateResult {
    state.targets.remove(&target.connect_url);
    state.targets.upsert(target.clone());
    debug!("CHANGED: {}", target.connect_url);

    // Re-select even when the value looks unchanged so the store republishes
    if selection_matching(state, &target).is_some() {
        return request_target(state, target);
    }
    UpdateResult::none()
}

/// The selection (requested or mirrored) when it refers to `target`.
fn selection_matching<'a>(state: &'a AppState, target: &Target) -> Option<&'a Target> {
    let current = state.effective_selection();
    (!current.is_none() && current.same_key(target)).then_some(current)
}

fn report_bad_message(state: &mut AppState, detail: String) {
    state
        .notices
        .danger(format!("Bad {DISCOVERY_CATEGORY} message received"), detail);
}
