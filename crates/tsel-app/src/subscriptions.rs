//! Registry of long-lived background tasks
//!
//! Each push source (readiness, discovery, selection store, refresh timer)
//! runs as one task. Registering a task under a kind that is already active
//! aborts the previous one, which is how the timer is re-armed.

use std::collections::HashMap;

use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionKind {
    Readiness,
    Discovery,
    Selection,
    RefreshTimer,
}

impl SubscriptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Readiness => "readiness",
            Self::Discovery => "discovery",
            Self::Selection => "selection",
            Self::RefreshTimer => "refresh-timer",
        }
    }
}

#[derive(Debug, Default)]
pub struct Subscriptions {
    tasks: HashMap<SubscriptionKind, JoinHandle<()>>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle`, aborting any task already registered for `kind`.
    pub fn insert(&mut self, kind: SubscriptionKind, handle: JoinHandle<()>) {
        if let Some(previous) = self.tasks.insert(kind, handle) {
            debug!("Replacing {} subscription", kind.as_str());
            previous.abort();
        }
    }

    /// Abort the task for `kind`. Returns `true` if one was registered.
    pub fn cancel(&mut self, kind: SubscriptionKind) -> bool {
        match self.tasks.remove(&kind) {
            Some(handle) => {
                debug!("Cancelling {} subscription", kind.as_str());
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// True while a task is registered for `kind` and has not finished.
    pub fn is_active(&self, kind: SubscriptionKind) -> bool {
        self.tasks
            .get(&kind)
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Abort every task and wait for them to finish unwinding.
    pub async fn shutdown(&mut self) {
        let tasks: Vec<_> = self.tasks.drain().collect();
        for (kind, handle) in tasks {
            handle.abort();
            // An aborted task resolves with a cancellation error
            let _ = handle.await;
            debug!("{} subscription stopped", kind.as_str());
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        for handle in self.tasks.values() {
            handle.abort();
        }
    }
}
