//! # tsel-client - Server Communication
//!
//! Talks to the discovery server on behalf of Target Select: the one-shot
//! HTTP target listing and the long-lived notification WebSocket.
//!
//! Depends on [`tsel_core`] for domain types and error handling. The
//! application layer adapts these types to its service traits; nothing here
//! knows about application state.
//!
//! ## Public API
//!
//! ### Target API
//! - [`HttpTargetApi`] - `GET /api/v1/targets` over `reqwest`
//! - [`ClientConfig`] - Base URL, auth token and request timeout
//!
//! ### Notifications
//! - [`NotificationChannel`] - Reconnecting WebSocket with a readiness signal
//! - [`CategoryReceiver`] - Per-category message subscription
//! - [`NotificationMessage`] - Parsed notification frame

pub mod api;
pub mod config;
pub mod notifications;

pub use api::HttpTargetApi;
pub use config::{notifications_url, targets_url, ClientConfig};
pub use notifications::{
    parse_notification, CategoryReceiver, ConnectionState, NotificationChannel,
    NotificationMessage, NotificationMeta,
};
