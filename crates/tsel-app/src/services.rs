//! Service layer for Target Select
//!
//! Every collaborator the engine talks to is injected through one of these
//! traits, bundled in a [`ServiceContext`]. The concrete clients from
//! `tsel-client` implement them here; tests substitute fakes.
//!
//! ## Architecture
//!
//! ```text
//!            ┌─────────────┐
//!            │   Engine    │
//!            └──────┬──────┘
//!                   │ ServiceContext
//!     ┌─────────────┼──────────────┬──────────────┐
//!     │             │              │              │
//! ┌───▼─────┐ ┌─────▼──────┐ ┌─────▼─────┐ ┌──────▼───────┐
//! │TargetApi│ │Notification│ │TargetStore│ │SettingsStore │
//! │ (HTTP)  │ │  Source    │ │  (watch)  │ │  (Settings)  │
//! └─────────┘ └────────────┘ └───────────┘ └──────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use tsel_client::{
    notifications_url, CategoryReceiver, ClientConfig, HttpTargetApi, NotificationChannel,
};
use tsel_core::prelude::*;
use tsel_core::Target;

use crate::config::Settings;

// ─────────────────────────────────────────────────────────────────
// Target API
// ─────────────────────────────────────────────────────────────────

/// One-shot listing of every known target.
#[trait_variant::make(TargetApi: Send)]
pub trait LocalTargetApi {
    async fn list_targets(&self) -> Result<Vec<Target>>;
}

impl TargetApi for HttpTargetApi {
    async fn list_targets(&self) -> Result<Vec<Target>> {
        HttpTargetApi::list_targets(self).await
    }
}

// ─────────────────────────────────────────────────────────────────
// Notification source
// ─────────────────────────────────────────────────────────────────

/// Push notification channel with a readiness signal.
pub trait NotificationSource: Send + Sync {
    /// Readiness transitions; `true` while notifications can be delivered.
    fn is_ready(&self) -> watch::Receiver<bool>;

    /// Notifications of one category, in arrival order.
    fn messages(&self, category: &str) -> CategoryReceiver;
}

impl NotificationSource for NotificationChannel {
    fn is_ready(&self) -> watch::Receiver<bool> {
        NotificationChannel::is_ready(self)
    }

    fn messages(&self, category: &str) -> CategoryReceiver {
        NotificationChannel::messages(self, category)
    }
}

// ─────────────────────────────────────────────────────────────────
// Settings store
// ─────────────────────────────────────────────────────────────────

/// Auto-refresh configuration.
pub trait SettingsStore {
    fn auto_refresh_enabled(&self) -> bool;
    fn auto_refresh_period(&self) -> u64;
    /// Milliseconds per period unit.
    fn auto_refresh_units(&self) -> u64;

    /// Timer period, or `None` when auto-refresh is off.
    ///
    /// A period that works out to zero milliseconds counts as off.
    fn auto_refresh_interval(&self) -> Option<Duration> {
        if !self.auto_refresh_enabled() {
            return None;
        }
        let millis = self
            .auto_refresh_period()
            .saturating_mul(self.auto_refresh_units());
        (millis > 0).then(|| Duration::from_millis(millis))
    }
}

impl SettingsStore for Settings {
    fn auto_refresh_enabled(&self) -> bool {
        self.refresh.auto_refresh
    }

    fn auto_refresh_period(&self) -> u64 {
        self.refresh.period
    }

    fn auto_refresh_units(&self) -> u64 {
        self.refresh.units
    }
}

// ─────────────────────────────────────────────────────────────────
// Target store
// ─────────────────────────────────────────────────────────────────

/// Owner of the current selection.
pub trait TargetStore: Send + Sync {
    /// Every value the store publishes, starting with the current one.
    fn current_target(&self) -> watch::Receiver<Target>;

    /// Request a new selection. `Err` means the store refused it.
    fn set_target(&self, target: Target) -> Result<()>;
}

/// Default [`TargetStore`] backed by a `watch` channel.
///
/// Every accepted `set_target` is published, including one equal to the
/// current value, so a forced re-selection is observable downstream.
#[derive(Debug, Clone)]
pub struct SharedTargetStore {
    tx: Arc<watch::Sender<Target>>,
}

impl SharedTargetStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Target::none());
        Self { tx: Arc::new(tx) }
    }

    /// Current value without subscribing.
    pub fn get(&self) -> Target {
        self.tx.borrow().clone()
    }
}

impl Default for SharedTargetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetStore for SharedTargetStore {
    fn current_target(&self) -> watch::Receiver<Target> {
        self.tx.subscribe()
    }

    fn set_target(&self, target: Target) -> Result<()> {
        if !target.is_none() {
            validate_connect_url(&target.connect_url)?;
        }
        debug!("Target store: selecting {}", target);
        self.tx.send_replace(target);
        Ok(())
    }
}

/// Connect URLs are opaque keys (`host:port` is as valid as a JMX
/// service URL); only a blank one is refused.
fn validate_connect_url(connect_url: &str) -> Result<()> {
    if connect_url.trim().is_empty() {
        return Err(Error::target_rejected("target has no connect URL"));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────
// Service context
// ─────────────────────────────────────────────────────────────────

/// Collaborators injected into the engine.
///
/// Generic over the API because async trait methods are not object safe;
/// the synchronous services are shared trait objects.
pub struct ServiceContext<A> {
    pub api: A,
    pub notifications: Arc<dyn NotificationSource>,
    pub target_store: Arc<dyn TargetStore>,
}

impl<A: Clone> Clone for ServiceContext<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            notifications: Arc::clone(&self.notifications),
            target_store: Arc::clone(&self.target_store),
        }
    }
}

impl<A> ServiceContext<A> {
    pub fn new(
        api: A,
        notifications: Arc<dyn NotificationSource>,
        target_store: Arc<dyn TargetStore>,
    ) -> Self {
        Self {
            api,
            notifications,
            target_store,
        }
    }
}

impl ServiceContext<HttpTargetApi> {
    /// Production services for the server named in `settings`.
    ///
    /// Spawns the notification channel, so this must run inside a tokio
    /// runtime.
    pub fn connect(settings: &Settings) -> Result<Self> {
        let client = ClientConfig::new(&settings.server.url)?
            .with_auth_token(settings.server.auth_token())
            .with_request_timeout(settings.server.request_timeout());

        let api = HttpTargetApi::new(&client)?;
        let ws_url = notifications_url(&client.base_url)?;
        let channel = NotificationChannel::spawn(ws_url, client.auth_token.clone());

        info!("Using server {}", client.base_url);
        Ok(Self::new(
            api,
            Arc::new(channel),
            Arc::new(SharedTargetStore::new()),
        ))
    }
}
