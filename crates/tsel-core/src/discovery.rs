//! Target discovery events pushed by the server

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::target::Target;

/// Notification category carrying [`DiscoveryEvent`] payloads.
pub const DISCOVERY_CATEGORY: &str = "TargetJvmDiscovery";

/// Discovery event tag.
///
/// Unrecognized tags decode to [`EventKind::Unknown`] rather than failing, so
/// the reconciler can report them without losing the raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Found,
    Lost,
    Changed,
    Unknown(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Found => "FOUND",
            EventKind::Lost => "LOST",
            EventKind::Changed => "CHANGED",
            EventKind::Unknown(raw) => raw,
        }
    }
}

impl From<String> for EventKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "FOUND" => EventKind::Found,
            "LOST" => EventKind::Lost,
            "CHANGED" => EventKind::Changed,
            _ => EventKind::Unknown(raw),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_string()
    }
}

impl Serialize for EventKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(EventKind::from)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single discovery notification: a target appeared, disappeared, or changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryEvent {
    pub kind: EventKind,
    pub service_ref: Target,
}

impl DiscoveryEvent {
    pub fn found(target: Target) -> Self {
        Self {
            kind: EventKind::Found,
            service_ref: target,
        }
    }

    pub fn lost(target: Target) -> Self {
        Self {
            kind: EventKind::Lost,
            service_ref: target,
        }
    }

    pub fn changed(target: Target) -> Self {
        Self {
            kind: EventKind::Changed,
            service_ref: target,
        }
    }

    /// Decode the `event` object of a notification message.
    pub fn from_value(value: serde_json::Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
