//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `refresh`: Refresh driver (full fetch, readiness edge, timer, settings reload)
//! - `reconcile`: Discovery event reconciler (FOUND / LOST / CHANGED)
//! - `selection`: Selection tracker and dropdown handling
//! - `keys`: Key event handlers

pub(crate) mod keys;
pub(crate) mod reconcile;
pub(crate) mod refresh;
pub(crate) mod selection;
pub(crate) mod update;

#[cfg(test)]
mod tests;

use std::time::Duration;

use crate::message::Message;
use tsel_core::Target;

// Re-export main entry point
pub use update::update;

#[cfg(test)]
pub(crate) use keys::handle_key;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Fetch the full target list in the background
    FetchTargets,

    /// Ask the target store to select `target`.
    ///
    /// Issued without a no-op check when the reconciler forces a
    /// re-selection after CHANGED.
    SetTarget { target: Target },

    /// Spawn the readiness, discovery and selection subscriptions, and arm
    /// the refresh timer when `refresh_period` is set
    StartSubscriptions { refresh_period: Option<Duration> },

    /// (Re-)arm the auto-refresh timer, replacing any armed timer
    ArmRefreshTimer { period: Duration },

    /// Cancel the auto-refresh timer
    CancelRefreshTimer,
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    /// Perform `action`, then process `msg`
    pub fn action_then(action: UpdateAction, msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: Some(action),
        }
    }
}
