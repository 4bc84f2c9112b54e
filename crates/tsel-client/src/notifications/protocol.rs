//! Notification frame format
//!
//! Every text frame on the notification socket is a JSON object:
//!
//! ```json
//! {
//!   "meta": {
//!     "category": "TargetJvmDiscovery",
//!     "type": {"type": "application", "subType": "json"},
//!     "serverTime": 1612345678
//!   },
//!   "message": {"event": {"kind": "FOUND", "serviceRef": {"connectUrl": "...", "alias": "..."}}}
//! }
//! ```

use serde::{Deserialize, Serialize};

use tsel_core::prelude::*;
use tsel_core::DiscoveryEvent;

/// MIME-ish content type advertised in `meta.type`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageType {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub sub_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMeta {
    pub category: String,
    #[serde(rename = "type", default)]
    pub message_type: MessageType,
    #[serde(default)]
    pub server_time: i64,
}

/// A parsed notification frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub meta: NotificationMeta,
    #[serde(default)]
    pub message: serde_json::Value,
}

impl NotificationMessage {
    /// Build a message for a category (used by tests and fakes).
    pub fn new(category: impl Into<String>, message: serde_json::Value) -> Self {
        Self {
            meta: NotificationMeta {
                category: category.into(),
                message_type: MessageType {
                    kind: "application".to_string(),
                    sub_type: "json".to_string(),
                },
                server_time: 0,
            },
            message,
        }
    }

    pub fn category(&self) -> &str {
        &self.meta.category
    }

    /// Decode `message.event` as a discovery event.
    pub fn discovery_event(&self) -> Result<DiscoveryEvent> {
        let event = self
            .message
            .get("event")
            .cloned()
            .ok_or_else(|| Error::protocol("notification has no `event` field"))?;
        DiscoveryEvent::from_value(event)
            .map_err(|e| Error::protocol(format!("invalid discovery event: {e}")))
    }
}

/// Parse one text frame. Returns `None` for frames that are not notifications.
pub fn parse_notification(text: &str) -> Option<NotificationMessage> {
    match serde_json::from_str::<NotificationMessage>(text) {
        Ok(msg) => Some(msg),
        Err(e) => {
            debug!(
                "Ignoring non-notification frame ({}): {}",
                e,
                text.chars().take(120).collect::<String>()
            );
            None
        }
    }
}
