//! Fakes shared by the engine tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tsel_client::NotificationMessage;
use tsel_core::prelude::*;
use tsel_core::{DiscoveryEvent, Target, DISCOVERY_CATEGORY};

use crate::services::TargetApi;

/// Scriptable target API.
///
/// Returns the configured list after `delay`; `fail_next` makes the next
/// call fail once.
#[derive(Clone, Default)]
pub struct FakeTargetApi {
    targets: Arc<Mutex<Vec<Target>>>,
    fail_next: Arc<Mutex<Option<String>>>,
    delay: Arc<Mutex<Duration>>,
    calls: Arc<AtomicUsize>,
}

impl FakeTargetApi {
    pub fn with_targets(targets: Vec<Target>) -> Self {
        let api = Self::default();
        api.set_targets(targets);
        api
    }

    pub fn set_targets(&self, targets: Vec<Target>) {
        *self.targets.lock().unwrap() = targets;
    }

    pub fn fail_next(&self, error: &str) {
        *self.fail_next.lock().unwrap() = Some(error.to_string());
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TargetApi for FakeTargetApi {
    async fn list_targets(&self) -> Result<Vec<Target>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let failure = self.fail_next.lock().unwrap().take();
        match failure {
            Some(error) => Err(Error::api(error)),
            None => Ok(self.targets.lock().unwrap().clone()),
        }
    }
}

/// A target whose connect URL passes store validation
pub fn jmx_target(alias: &str, host: &str) -> Target {
    Target::new(
        alias,
        format!("service:jmx:rmi:///jndi/rmi://{host}:9091/jmxrmi"),
    )
}

/// Wrap a discovery event the way the server frames it
pub fn discovery_notification(event: &DiscoveryEvent) -> NotificationMessage {
    let event = serde_json::to_value(event).unwrap();
    NotificationMessage::new(DISCOVERY_CATEGORY, json!({ "event": event }))
}
