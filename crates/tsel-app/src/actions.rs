//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Background tasks never touch state. Everything they learn is sent back
//! as a [`Message`] on the engine channel, and every long-lived task stops
//! when the shutdown signal fires.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::message::{Message, RefreshTrigger};
use crate::services::{NotificationSource, ServiceContext, TargetApi, TargetStore};
use crate::subscriptions::{SubscriptionKind, Subscriptions};
use crate::UpdateAction;
use tsel_client::CategoryReceiver;
use tsel_core::{Error, Target, DISCOVERY_CATEGORY};

/// Execute an action, spawning background tasks as needed
pub fn handle_action<A>(
    action: UpdateAction,
    services: &ServiceContext<A>,
    msg_tx: mpsc::Sender<Message>,
    subscriptions: &mut Subscriptions,
    shutdown_rx: watch::Receiver<bool>,
) where
    A: TargetApi + Clone + Send + Sync + 'static,
{
    match action {
        UpdateAction::FetchTargets => {
            spawn_fetch_targets(services.api.clone(), msg_tx, shutdown_rx);
        }

        UpdateAction::SetTarget { target } => {
            set_target(services.target_store.as_ref(), target, msg_tx);
        }

        UpdateAction::StartSubscriptions { refresh_period } => {
            let notifications = services.notifications.as_ref();
            subscriptions.insert(
                SubscriptionKind::Readiness,
                spawn_readiness_watcher(notifications, msg_tx.clone(), shutdown_rx.clone()),
            );
            subscriptions.insert(
                SubscriptionKind::Discovery,
                spawn_discovery_listener(notifications, msg_tx.clone(), shutdown_rx.clone()),
            );
            subscriptions.insert(
                SubscriptionKind::Selection,
                spawn_selection_watcher(
                    services.target_store.as_ref(),
                    msg_tx.clone(),
                    shutdown_rx.clone(),
                ),
            );
            if let Some(period) = refresh_period {
                subscriptions.insert(
                    SubscriptionKind::RefreshTimer,
                    spawn_refresh_timer(period, msg_tx, shutdown_rx),
                );
            }
        }

        UpdateAction::ArmRefreshTimer { period } => {
            subscriptions.insert(
                SubscriptionKind::RefreshTimer,
                spawn_refresh_timer(period, msg_tx, shutdown_rx),
            );
        }

        UpdateAction::CancelRefreshTimer => {
            subscriptions.cancel(SubscriptionKind::RefreshTimer);
        }
    }
}

/// Resolve once shutdown is signalled (or the signal sender is gone).
async fn wait_for_shutdown(shutdown_rx: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown_rx.borrow_and_update() {
            return;
        }
        if shutdown_rx.changed().await.is_err() {
            return;
        }
    }
}

fn spawn_fetch_targets<A>(
    api: A,
    msg_tx: mpsc::Sender<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    A: TargetApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let result = tokio::select! {
            result = api.list_targets() => result,
            _ = wait_for_shutdown(&mut shutdown_rx) => return,
        };

        let msg = match result {
            Ok(targets) => Message::TargetsFetched { targets },
            Err(e) => {
                if e.is_recoverable() {
                    warn!("Target fetch failed: {}", e);
                } else {
                    error!("Target fetch failed: {}", e);
                }
                Message::TargetsFetchFailed {
                    error: e.to_string(),
                }
            }
        };
        let _ = msg_tx.send(msg).await;
    });
}

fn set_target(store: &dyn TargetStore, target: Target, msg_tx: mpsc::Sender<Message>) {
    if let Err(e) = store.set_target(target.clone()) {
        let reason = match e {
            Error::TargetRejected { reason } => reason,
            other => other.to_string(),
        };
        tokio::spawn(async move {
            let _ = msg_tx.send(Message::TargetRejected { target, reason }).await;
        });
    }
}

/// Forward readiness values, starting with the current one.
fn spawn_readiness_watcher(
    notifications: &dyn NotificationSource,
    msg_tx: mpsc::Sender<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let mut ready_rx = notifications.is_ready();
    tokio::spawn(async move {
        let ready = *ready_rx.borrow_and_update();
        if msg_tx.send(Message::ReadinessChanged { ready }).await.is_err() {
            return;
        }

        loop {
            tokio::select! {
                changed = ready_rx.changed() => {
                    if changed.is_err() {
                        debug!("Readiness source closed");
                        break;
                    }
                    let ready = *ready_rx.borrow_and_update();
                    if msg_tx.send(Message::ReadinessChanged { ready }).await.is_err() {
                        break;
                    }
                }
                _ = wait_for_shutdown(&mut shutdown_rx) => break,
            }
        }
    })
}

fn spawn_discovery_listener(
    notifications: &dyn NotificationSource,
    msg_tx: mpsc::Sender<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let mut rx: CategoryReceiver = notifications.messages(DISCOVERY_CATEGORY);
    tokio::spawn(async move {
        loop {
            tokio::select! {
                next = rx.recv() => {
                    let Some(notification) = next else {
                        debug!("Discovery stream closed");
                        break;
                    };
                    let msg = match notification.discovery_event() {
                        Ok(event) => Message::Discovery(event),
                        Err(e) => Message::DiscoveryDecodeFailed { error: e.to_string() },
                    };
                    if msg_tx.send(msg).await.is_err() {
                        break;
                    }
                }
                _ = wait_for_shutdown(&mut shutdown_rx) => break,
            }
        }
    })
}

/// Forward every value the target store publishes, starting with the current one.
fn spawn_selection_watcher(
    store: &dyn TargetStore,
    msg_tx: mpsc::Sender<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let mut target_rx = store.current_target();
    tokio::spawn(async move {
        let current = target_rx.borrow_and_update().clone();
        if msg_tx.send(Message::SelectionChanged(current)).await.is_err() {
            return;
        }

        loop {
            tokio::select! {
                changed = target_rx.changed() => {
                    if changed.is_err() {
                        debug!("Target store closed");
                        break;
                    }
                    let target = target_rx.borrow_and_update().clone();
                    if msg_tx.send(Message::SelectionChanged(target)).await.is_err() {
                        break;
                    }
                }
                _ = wait_for_shutdown(&mut shutdown_rx) => break,
            }
        }
    })
}

/// Send a timer refresh every `period`, first one after a full period.
fn spawn_refresh_timer(
    period: Duration,
    msg_tx: mpsc::Sender<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    info!("Refresh timer armed ({:?})", period);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let msg = Message::RefreshTargets { trigger: RefreshTrigger::Timer };
                    if msg_tx.send(msg).await.is_err() {
                        break;
                    }
                }
                _ = wait_for_shutdown(&mut shutdown_rx) => break,
            }
        }
    })
}
