//! Tests for the update function: refresh driver, reconciler, selection tracker

use super::*;
use crate::input_key::InputKey;
use crate::message::{RefreshTrigger, Selection};
use crate::notices::NoticeLevel;
use crate::state::{AppPhase, AppState};
use std::collections::HashSet;
use std::time::Duration;
use tsel_core::{DiscoveryEvent, EventKind, Target};

fn a() -> Target {
    Target::new("A", "url1")
}

fn b() -> Target {
    Target::new("B", "url2")
}

fn running_state() -> AppState {
    let mut state = AppState::new();
    state.phase = AppPhase::Running;
    state
}

fn state_with_targets(targets: Vec<Target>) -> AppState {
    let mut state = running_state();
    state.targets.replace_all(targets);
    state
}

/// Process a message and every follow-up, collecting the actions.
fn run(state: &mut AppState, msg: Message) -> Vec<UpdateAction> {
    let mut actions = Vec::new();
    let mut next = Some(msg);
    while let Some(m) = next {
        let result = update(state, m);
        actions.extend(result.action);
        next = result.message;
    }
    actions
}

fn aliases(state: &AppState) -> Vec<&str> {
    state.targets.iter().map(|t| t.alias.as_str()).collect()
}

// ─────────────────────────────────────────────────────────
// Mount / Refresh Driver
// ─────────────────────────────────────────────────────────

#[test]
fn test_mount_starts_subscriptions_and_fetches() {
    let mut state = AppState::new();
    let actions = run(&mut state, Message::Mount);

    assert_eq!(
        actions,
        vec![
            UpdateAction::StartSubscriptions {
                refresh_period: Some(Duration::from_secs(30))
            },
            UpdateAction::FetchTargets,
        ]
    );
    assert_eq!(state.phase, AppPhase::Running);
    assert!(state.loading);
}

#[test]
fn test_mount_with_auto_refresh_disabled_arms_no_timer_but_fetches() {
    let mut state = AppState::new();
    state.settings.refresh.auto_refresh = false;

    let actions = run(&mut state, Message::Mount);

    assert_eq!(
        actions,
        vec![
            UpdateAction::StartSubscriptions {
                refresh_period: None
            },
            UpdateAction::FetchTargets,
        ]
    );
    assert!(state.refresh_period.is_none());
}

#[test]
fn test_second_mount_is_ignored() {
    let mut state = AppState::new();
    run(&mut state, Message::Mount);
    assert!(run(&mut state, Message::Mount).is_empty());
}

#[test]
fn test_overlapping_refreshes_collapse() {
    let mut state = running_state();

    let first = run(
        &mut state,
        Message::RefreshTargets {
            trigger: RefreshTrigger::Timer,
        },
    );
    let second = run(
        &mut state,
        Message::RefreshTargets {
            trigger: RefreshTrigger::Ready,
        },
    );

    assert_eq!(first, vec![UpdateAction::FetchTargets]);
    assert!(second.is_empty());
    assert!(state.loading);
}

#[test]
fn test_fetch_replaces_list_and_clears_loading() {
    let mut state = state_with_targets(vec![a()]);
    state.loading = true;

    run(
        &mut state,
        Message::TargetsFetched {
            targets: vec![b(), Target::new("C", "url3")],
        },
    );

    assert!(!state.loading);
    assert_eq!(aliases(&state), vec!["B", "C"]);
}

#[test]
fn test_fetch_dedupes_by_connect_url() {
    let mut state = running_state();
    state.loading = true;

    run(
        &mut state,
        Message::TargetsFetched {
            targets: vec![a(), b(), Target::new("A2", "url1")],
        },
    );

    assert_eq!(aliases(&state), vec!["A2", "B"]);
}

#[test]
fn test_fetch_failure_clears_loading_and_keeps_list() {
    let mut state = state_with_targets(vec![a(), b()]);
    state.loading = true;

    let actions = run(
        &mut state,
        Message::TargetsFetchFailed {
            error: "Target API returned HTTP 502: Bad Gateway".to_string(),
        },
    );

    assert!(actions.is_empty());
    assert!(!state.loading);
    assert_eq!(aliases(&state), vec!["A", "B"]);
    assert_eq!(state.notices.count(NoticeLevel::Danger), 1);
    assert_eq!(
        state.notices.latest().unwrap().title,
        "Failed to refresh targets"
    );
}

#[test]
fn test_readiness_edge_triggers_refresh() {
    let mut state = running_state();

    let actions = run(&mut state, Message::ReadinessChanged { ready: true });
    assert_eq!(actions, vec![UpdateAction::FetchTargets]);

    // Repeated true is not an edge
    state.loading = false;
    assert!(run(&mut state, Message::ReadinessChanged { ready: true }).is_empty());
}

#[test]
fn test_every_reconnect_refreshes() {
    let mut state = running_state();

    for _ in 0..3 {
        run(&mut state, Message::ReadinessChanged { ready: false });
        let actions = run(&mut state, Message::ReadinessChanged { ready: true });
        assert_eq!(actions, vec![UpdateAction::FetchTargets]);
        state.loading = false;
    }
}

#[test]
fn test_readiness_before_mount_does_not_refresh() {
    let mut state = AppState::new();
    assert!(run(&mut state, Message::ReadinessChanged { ready: true }).is_empty());
    assert!(state.notifications_ready);
}

#[test]
fn test_settings_reload_rearms_timer() {
    let mut state = AppState::new();
    run(&mut state, Message::Mount);

    let mut settings = state.settings.clone();
    settings.refresh.period = 5;
    let actions = run(&mut state, Message::SettingsReloaded(Box::new(settings)));

    assert_eq!(
        actions,
        vec![UpdateAction::ArmRefreshTimer {
            period: Duration::from_secs(5)
        }]
    );
    assert_eq!(state.refresh_period, Some(Duration::from_secs(5)));
}

#[test]
fn test_settings_reload_disabling_cancels_timer() {
    let mut state = AppState::new();
    run(&mut state, Message::Mount);

    let mut settings = state.settings.clone();
    settings.refresh.auto_refresh = false;
    let actions = run(&mut state, Message::SettingsReloaded(Box::new(settings.clone())));
    assert_eq!(actions, vec![UpdateAction::CancelRefreshTimer]);

    // Already cancelled
    assert!(run(&mut state, Message::SettingsReloaded(Box::new(settings))).is_empty());
}

#[test]
fn test_settings_reload_zero_period_cancels_timer() {
    let mut state = AppState::new();
    run(&mut state, Message::Mount);

    let mut settings = state.settings.clone();
    settings.refresh.period = 0;
    let actions = run(&mut state, Message::SettingsReloaded(Box::new(settings)));
    assert_eq!(actions, vec![UpdateAction::CancelRefreshTimer]);
}

// ─────────────────────────────────────────────────────────
// Event Reconciler
// ─────────────────────────────────────────────────────────

#[test]
fn test_found_appends_when_absent() {
    let mut state = state_with_targets(vec![a()]);
    run(&mut state, Message::Discovery(DiscoveryEvent::found(b())));
    assert_eq!(aliases(&state), vec!["A", "B"]);
}

#[test]
fn test_found_replaces_in_place_when_present() {
    let mut state = state_with_targets(vec![a(), b()]);
    run(
        &mut state,
        Message::Discovery(DiscoveryEvent::found(Target::new("A-renamed", "url1"))),
    );
    assert_eq!(aliases(&state), vec!["A-renamed", "B"]);
}

#[test]
fn test_events_apply_while_loading() {
    let mut state = state_with_targets(vec![a()]);
    state.loading = true;
    run(&mut state, Message::Discovery(DiscoveryEvent::found(b())));
    assert_eq!(state.targets.len(), 2);
    assert!(state.loading);
}

#[test]
fn test_lost_selected_target_scenario() {
    let mut state = state_with_targets(vec![a(), b()]);
    state.selected = a();

    let actions = run(&mut state, Message::Discovery(DiscoveryEvent::lost(a())));

    assert_eq!(aliases(&state), vec!["B"]);
    assert_eq!(
        actions,
        vec![UpdateAction::SetTarget {
            target: Target::none()
        }]
    );
    assert_eq!(state.notices.len(), 1);
    let notice = state.notices.latest().unwrap();
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(notice.title, "Target Disappeared");
    assert!(notice.message.contains("\"A\""));
}

#[test]
fn test_lost_other_target_keeps_selection() {
    let mut state = state_with_targets(vec![a(), b()]);
    state.selected = a();

    let actions = run(&mut state, Message::Discovery(DiscoveryEvent::lost(b())));

    assert!(actions.is_empty());
    assert_eq!(state.selected, a());
    assert!(state.notices.is_empty());
    assert_eq!(aliases(&state), vec!["A"]);
}

#[test]
fn test_lost_unknown_target_is_noop() {
    let mut state = state_with_targets(vec![a()]);
    let actions = run(
        &mut state,
        Message::Discovery(DiscoveryEvent::lost(Target::new("Z", "url9"))),
    );
    assert!(actions.is_empty());
    assert_eq!(aliases(&state), vec!["A"]);
}

#[test]
fn test_lost_with_nothing_selected_raises_no_notice() {
    let mut state = state_with_targets(vec![a()]);
    run(&mut state, Message::Discovery(DiscoveryEvent::lost(a())));
    assert!(state.notices.is_empty());
    assert!(state.targets.is_empty());
}

#[test]
fn test_lost_target_selected_before_store_echo() {
    let mut state = state_with_targets(vec![a(), b()]);
    run(&mut state, Message::Select(Selection::Target(b())));
    assert!(state.selected.is_none());

    let actions = run(&mut state, Message::Discovery(DiscoveryEvent::lost(b())));

    assert_eq!(
        actions,
        vec![UpdateAction::SetTarget {
            target: Target::none()
        }]
    );
    assert_eq!(state.notices.len(), 1);
    assert!(state.notices.latest().unwrap().message.contains("\"B\""));

    // Late echoes of both requests settle on the sentinel
    run(&mut state, Message::SelectionChanged(b()));
    run(&mut state, Message::SelectionChanged(Target::none()));
    assert!(state.selected.is_none());
    assert!(state.pending_selection.is_none());
}

#[test]
fn test_lost_previous_target_after_switching_away_raises_no_notice() {
    let mut state = state_with_targets(vec![a(), b()]);
    state.selected = a();
    run(&mut state, Message::Select(Selection::Target(b())));

    let actions = run(&mut state, Message::Discovery(DiscoveryEvent::lost(a())));

    assert!(actions.is_empty());
    assert!(state.notices.is_empty());
}

#[test]
fn test_changed_target_selected_before_store_echo_reselects() {
    let mut state = state_with_targets(vec![a()]);
    run(&mut state, Message::Select(Selection::Target(a())));
    let updated = a().with_label("env", "prod");

    let actions = run(
        &mut state,
        Message::Discovery(DiscoveryEvent::changed(updated.clone())),
    );

    assert_eq!(actions, vec![UpdateAction::SetTarget { target: updated.clone() }]);
    assert_eq!(state.pending_selection, Some(updated));
}

#[test]
fn test_changed_selected_target_forces_reselection() {
    let mut state = state_with_targets(vec![a(), b()]);
    state.selected = a();
    let updated = Target::new("A", "url1").with_label("env", "prod");

    let actions = run(
        &mut state,
        Message::Discovery(DiscoveryEvent::changed(updated.clone())),
    );

    assert_eq!(
        actions,
        vec![UpdateAction::SetTarget {
            target: updated.clone()
        }]
    );
    assert_eq!(state.targets.get("url1"), Some(&updated));
    assert_eq!(state.targets.len(), 2);
}

#[test]
fn test_changed_selected_target_reselects_even_when_equal() {
    let mut state = state_with_targets(vec![a()]);
    state.selected = a();

    let actions = run(&mut state, Message::Discovery(DiscoveryEvent::changed(a())));
    assert_eq!(actions, vec![UpdateAction::SetTarget { target: a() }]);
}

#[test]
fn test_changed_other_target_does_not_touch_selection() {
    let mut state = state_with_targets(vec![a(), b()]);
    state.selected = a();

    let actions = run(
        &mut state,
        Message::Discovery(DiscoveryEvent::changed(Target::new("B2", "url2"))),
    );

    assert!(actions.is_empty());
    assert_eq!(aliases(&state), vec!["A", "B2"]);
}

#[test]
fn test_changed_absent_target_is_added() {
    let mut state = state_with_targets(vec![a()]);
    run(&mut state, Message::Discovery(DiscoveryEvent::changed(b())));
    assert_eq!(aliases(&state), vec!["A", "B"]);
}

#[test]
fn test_unknown_event_kind_scenario() {
    let mut state = state_with_targets(vec![a(), b()]);
    state.selected = a();
    let before = state.targets.clone();

    let actions = run(
        &mut state,
        Message::Discovery(DiscoveryEvent {
            kind: EventKind::Unknown("RENAMED".to_string()),
            service_ref: a(),
        }),
    );

    assert!(actions.is_empty());
    assert_eq!(state.targets, before);
    assert_eq!(state.selected, a());
    assert_eq!(state.notices.len(), 1);
    let notice = state.notices.latest().unwrap();
    assert_eq!(notice.level, NoticeLevel::Danger);
    assert_eq!(notice.title, "Bad TargetJvmDiscovery message received");
    assert_eq!(notice.message, "Unknown event type RENAMED");
}

#[test]
fn test_decode_failure_raises_danger_notice() {
    let mut state = state_with_targets(vec![a()]);
    run(
        &mut state,
        Message::DiscoveryDecodeFailed {
            error: "notification has no `event` field".to_string(),
        },
    );
    assert_eq!(state.targets.len(), 1);
    assert_eq!(state.notices.count(NoticeLevel::Danger), 1);
}

#[test]
fn test_no_duplicates_across_event_sequences() {
    let urls = ["url1", "url2", "url3"];
    let mut state = running_state();

    // Deterministic pseudo-random walk over FOUND/LOST/CHANGED
    let mut seed: u32 = 7;
    for step in 0..300 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let url = urls[(seed >> 8) as usize % urls.len()];
        let target = Target::new(format!("t{step}"), url);
        let event = match (seed >> 16) % 3 {
            0 => DiscoveryEvent::found(target),
            1 => DiscoveryEvent::lost(target),
            _ => DiscoveryEvent::changed(target),
        };
        run(&mut state, Message::Discovery(event));

        let keys: HashSet<_> = state.targets.iter().map(|t| &t.connect_url).collect();
        assert_eq!(keys.len(), state.targets.len(), "duplicate at step {step}");
    }
}

// ─────────────────────────────────────────────────────────
// Selection Tracker
// ─────────────────────────────────────────────────────────

#[test]
fn test_select_new_target_requests_store_update() {
    let mut state = state_with_targets(vec![a(), b()]);
    let actions = run(&mut state, Message::Select(Selection::Target(b())));
    assert_eq!(actions, vec![UpdateAction::SetTarget { target: b() }]);
}

#[test]
fn test_select_current_value_is_noop() {
    let mut state = state_with_targets(vec![a()]);
    state.selected = a();
    state.dropdown.expanded = true;

    let actions = run(&mut state, Message::Select(Selection::Target(a())));

    assert!(actions.is_empty());
    assert!(!state.dropdown.expanded);
}

#[test]
fn test_select_same_key_different_value_is_not_noop() {
    let mut state = state_with_targets(vec![a()]);
    state.selected = a();
    let relabeled = a().with_label("team", "perf");

    let actions = run(&mut state, Message::Select(Selection::Target(relabeled.clone())));
    assert_eq!(actions, vec![UpdateAction::SetTarget { target: relabeled }]);
}

#[test]
fn test_placeholder_always_selects_sentinel() {
    let mut state = running_state();
    // Even when nothing is selected already
    let actions = run(&mut state, Message::Select(Selection::Placeholder));
    assert_eq!(
        actions,
        vec![UpdateAction::SetTarget {
            target: Target::none()
        }]
    );
}

#[test]
fn test_selection_changed_mirrors_store() {
    let mut state = running_state();
    run(&mut state, Message::SelectionChanged(b()));
    assert_eq!(state.selected, b());

    run(&mut state, Message::SelectionChanged(Target::none()));
    assert!(state.selected.is_none());
}

#[test]
fn test_store_echo_clears_pending_selection() {
    let mut state = state_with_targets(vec![a(), b()]);
    run(&mut state, Message::Select(Selection::Target(a())));
    run(&mut state, Message::Select(Selection::Target(b())));
    assert_eq!(state.pending_selection, Some(b()));

    // An older echo leaves the newer request pending
    run(&mut state, Message::SelectionChanged(a()));
    assert_eq!(state.pending_selection, Some(b()));

    run(&mut state, Message::SelectionChanged(b()));
    assert!(state.pending_selection.is_none());
    assert_eq!(state.selected, b());
}

#[test]
fn test_reselecting_pending_target_is_noop() {
    let mut state = state_with_targets(vec![a(), b()]);
    run(&mut state, Message::Select(Selection::Target(b())));

    let actions = run(&mut state, Message::Select(Selection::Target(b())));
    assert!(actions.is_empty());
}

#[test]
fn test_rejected_target_raises_notice_and_selects_sentinel() {
    let mut state = state_with_targets(vec![a()]);

    let actions = run(
        &mut state,
        Message::TargetRejected {
            target: a(),
            reason: "invalid connect URL".to_string(),
        },
    );

    assert_eq!(
        actions,
        vec![UpdateAction::SetTarget {
            target: Target::none()
        }]
    );
    let notice = state.notices.latest().unwrap();
    assert_eq!(notice.level, NoticeLevel::Danger);
    assert_eq!(notice.title, "Cannot set target");
    assert_eq!(notice.message, "invalid connect URL");
}

#[test]
fn test_rejection_drops_pending_request() {
    let mut state = state_with_targets(vec![a()]);
    run(&mut state, Message::Select(Selection::Target(a())));

    run(
        &mut state,
        Message::TargetRejected {
            target: a(),
            reason: "connect URL is blank".to_string(),
        },
    );

    // Replaced by the fallback to the sentinel
    assert_eq!(state.pending_selection, Some(Target::none()));
}

#[test]
fn test_rejected_sentinel_does_not_loop() {
    let mut state = running_state();
    let actions = run(
        &mut state,
        Message::TargetRejected {
            target: Target::none(),
            reason: "store is read-only".to_string(),
        },
    );
    assert!(actions.is_empty());
    assert!(state.notices.is_empty());
}

// ─────────────────────────────────────────────────────────
// Dropdown + keys
// ─────────────────────────────────────────────────────────

#[test]
fn test_toggle_highlights_current_selection() {
    let mut state = state_with_targets(vec![a(), b()]);
    state.selected = b();

    run(&mut state, Message::ToggleDropdown);

    assert!(state.dropdown.expanded);
    assert_eq!(state.dropdown.highlighted, 2);
}

#[test]
fn test_toggle_ignored_while_loading() {
    let mut state = state_with_targets(vec![a()]);
    state.loading = true;
    run(&mut state, Message::ToggleDropdown);
    assert!(!state.dropdown.expanded);
}

#[test]
fn test_highlight_wraps() {
    let mut state = state_with_targets(vec![a(), b()]);
    run(&mut state, Message::ToggleDropdown);

    run(&mut state, Message::HighlightPrevious);
    assert_eq!(state.dropdown.highlighted, 2);
    run(&mut state, Message::HighlightNext);
    assert_eq!(state.dropdown.highlighted, 0);
}

#[test]
fn test_commit_highlighted_target() {
    let mut state = state_with_targets(vec![a(), b()]);
    run(&mut state, Message::ToggleDropdown);
    run(&mut state, Message::HighlightNext);

    let actions = run(&mut state, Message::CommitHighlighted);

    assert_eq!(actions, vec![UpdateAction::SetTarget { target: a() }]);
    assert!(!state.dropdown.expanded);
}

#[test]
fn test_commit_placeholder_selects_none() {
    let mut state = state_with_targets(vec![a()]);
    state.selected = a();
    run(&mut state, Message::ToggleDropdown);
    run(&mut state, Message::HighlightFirst);

    let actions = run(&mut state, Message::CommitHighlighted);
    assert_eq!(
        actions,
        vec![UpdateAction::SetTarget {
            target: Target::none()
        }]
    );
}

#[test]
fn test_lost_while_open_keeps_highlight_in_range() {
    let mut state = state_with_targets(vec![a(), b()]);
    run(&mut state, Message::ToggleDropdown);
    run(&mut state, Message::HighlightLast);
    assert_eq!(state.dropdown.highlighted, 2);

    run(&mut state, Message::Discovery(DiscoveryEvent::lost(b())));
    assert_eq!(state.dropdown.highlighted, 1);
}

#[test]
fn test_keys_closed_dropdown() {
    let state = running_state();
    assert!(matches!(
        handle_key(&state, InputKey::Enter),
        Some(Message::ToggleDropdown)
    ));
    assert!(matches!(
        handle_key(&state, InputKey::Char('r')),
        Some(Message::RefreshTargets {
            trigger: RefreshTrigger::Manual
        })
    ));
    assert!(matches!(
        handle_key(&state, InputKey::Char('q')),
        Some(Message::Quit)
    ));
    assert!(matches!(
        handle_key(&state, InputKey::Char('d')),
        Some(Message::DismissNotice)
    ));
    assert!(handle_key(&state, InputKey::Char('x')).is_none());
}

#[test]
fn test_manual_refresh_key_ignored_while_loading() {
    let mut state = running_state();
    state.loading = true;
    assert!(handle_key(&state, InputKey::Char('r')).is_none());
}

#[test]
fn test_keys_open_dropdown() {
    let mut state = state_with_targets(vec![a()]);
    state.dropdown.expanded = true;

    assert!(matches!(
        handle_key(&state, InputKey::Enter),
        Some(Message::CommitHighlighted)
    ));
    assert!(matches!(
        handle_key(&state, InputKey::Char('k')),
        Some(Message::HighlightPrevious)
    ));
    assert!(matches!(
        handle_key(&state, InputKey::Esc),
        Some(Message::CloseDropdown)
    ));
    // q does not quit while the list is open
    assert!(handle_key(&state, InputKey::Char('q')).is_none());
    assert!(matches!(
        handle_key(&state, InputKey::CharCtrl('c')),
        Some(Message::Quit)
    ));
}

#[test]
fn test_enter_space_via_update_opens_then_commits() {
    let mut state = state_with_targets(vec![a()]);

    run(&mut state, Message::Key(InputKey::Char(' ')));
    assert!(state.dropdown.expanded);

    run(&mut state, Message::Key(InputKey::Down));
    let actions = run(&mut state, Message::Key(InputKey::Enter));
    assert_eq!(actions, vec![UpdateAction::SetTarget { target: a() }]);
}

#[test]
fn test_refresh_ignored_after_quit() {
    let mut state = running_state();
    run(&mut state, Message::Quit);
    assert!(run(
        &mut state,
        Message::RefreshTargets {
            trigger: RefreshTrigger::Timer
        }
    )
    .is_empty());
}
