//! Refresh driver: full list fetches and the auto-refresh timer
//!
//! A fetch is started on mount, on every readiness `false -> true` edge, on
//! each timer tick and on manual request. At most one fetch is outstanding;
//! requests arriving while `loading` is set are collapsed into it.

use tracing::{debug, info};

use crate::config::Settings;
use crate::message::{Message, RefreshTrigger};
use crate::state::{AppPhase, AppState};
use tsel_core::Target;

use super::{UpdateAction, UpdateResult};

/// Start subscriptions, arm the timer if enabled, and load the list.
pub fn handle_mount(state: &mut AppState) -> UpdateResult {
    let refresh_period = state.desired_refresh_period();
    state.refresh_period = refresh_period;

    match refresh_period {
        Some(period) => info!("Auto-refresh every {:?}", period),
        None => info!("Auto-refresh disabled"),
    }

    UpdateResult::action_then(
        UpdateAction::StartSubscriptions { refresh_period },
        Message::RefreshTargets {
            trigger: RefreshTrigger::Mount,
        },
    )
}

pub fn handle_refresh(state: &mut AppState, trigger: RefreshTrigger) -> UpdateResult {
    if state.phase == AppPhase::Quitting {
        return UpdateResult::none();
    }

    if state.loading {
        debug!(
            "Refresh ({}) collapsed into outstanding fetch",
            trigger.as_str()
        );
        return UpdateResult::none();
    }

    debug!("Refreshing targets ({})", trigger.as_str());
    state.loading = true;
    UpdateResult::action(UpdateAction::FetchTargets)
}

pub fn handle_targets_fetched(state: &mut AppState, targets: Vec<Target>) -> UpdateResult {
    state.targets.replace_all(targets);
    state.loading = false;
    state.clamp_highlight();
    debug!("Target list replaced ({} targets)", state.targets.len());
    UpdateResult::none()
}

pub fn handle_fetch_failed(state: &mut AppState, error: String) -> UpdateResult {
    state.loading = false;
    state.notices.danger("Failed to refresh targets", error);
    UpdateResult::none()
}

/// Refresh on each `false -> true` readiness edge.
pub fn handle_readiness_changed(state: &mut AppState, ready: bool) -> UpdateResult {
    let was_ready = state.notifications_ready;
    state.notifications_ready = ready;

    if ready && !was_ready && state.phase == AppPhase::Running {
        info!("Notification channel ready");
        return UpdateResult::message(Message::RefreshTargets {
            trigger: RefreshTrigger::Ready,
        });
    }
    if !ready && was_ready {
        info!("Notification channel not ready");
    }
    UpdateResult::none()
}

/// Apply new settings and re-arm (or cancel) the timer.
pub fn handle_settings_reloaded(state: &mut AppState, settings: Settings) -> UpdateResult {
    state.notices.set_max(settings.ui.max_notices);
    state.settings = settings;

    if state.phase != AppPhase::Running {
        return UpdateResult::none();
    }

    match state.desired_refresh_period() {
        Some(period) => {
            info!("Settings reloaded, auto-refresh every {:?}", period);
            state.refresh_period = Some(period);
            UpdateResult::action(UpdateAction::ArmRefreshTimer { period })
        }
        None if state.refresh_period.is_some() => {
            info!("Settings reloaded, auto-refresh disabled");
            state.refresh_period = None;
            UpdateResult::action(UpdateAction::CancelRefreshTimer)
        }
        None => UpdateResult::none(),
    }
}
