//! tsel-app - Application state and orchestration for Target Select
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state management:
//! the refresh driver, the discovery event reconciler and the selection tracker all
//! live in [`handler::update`]. It also owns the Engine, configuration loading, the
//! service traits collaborators are injected through, and config file watching.

pub mod actions;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod notices;
pub mod process;
pub mod services;
pub mod signals;
pub mod state;
pub mod subscriptions;
pub mod watcher;

#[cfg(test)]
mod test_support;

// Re-export primary types
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use handler::{UpdateAction, UpdateResult};
pub use message::{Message, RefreshTrigger, Selection};
pub use notices::{Notice, NoticeLevel, Notices};
pub use services::{
    NotificationSource, ServiceContext, SettingsStore, SharedTargetStore, TargetApi, TargetStore,
};
pub use state::{AppPhase, AppState};

// Re-export domain types for the TUI
pub use tsel_core::{Target, TargetList};
