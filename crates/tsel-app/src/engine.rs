//! Engine - shared orchestration state for TUI and headless runners
//!
//! The Engine owns the TEA state, the message channel every background task
//! feeds, the shutdown signal, the subscription registry and the injected
//! services. Runners create it, call [`Engine::mount`], drain messages, and
//! call [`Engine::shutdown`] on exit (the unmount).

use std::path::PathBuf;

use tokio::sync::{broadcast, mpsc, watch};
use tracing::{info, warn};

use crate::config::{self, Settings, SettingsOverrides};
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::process;
use crate::services::{ServiceContext, TargetApi};
use crate::signals;
use crate::state::AppState;
use crate::subscriptions::Subscriptions;
use crate::watcher::{ConfigWatcher, WatcherEvent};
use tsel_core::{EventKind, Target};

/// Capacity of the unified message channel
const MESSAGE_CHANNEL_CAPACITY: usize = 256;

/// Capacity of the engine event broadcast
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone)]
struct StateSnapshot {
    selected: Target,
    notices_issued: u64,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            selected: state.selected.clone(),
            notices_issued: state.notices.issued(),
        }
    }
}

/// Orchestration engine for Target Select.
pub struct Engine<A> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, watcher, runners).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    pub msg_rx: mpsc::Receiver<Message>,

    /// Sender for the shutdown signal. Send `true` to initiate shutdown.
    pub shutdown_tx: watch::Sender<bool>,

    /// Receiver for the shutdown signal. Clone for background tasks.
    pub shutdown_rx: watch::Receiver<bool>,

    services: ServiceContext<A>,

    subscriptions: Subscriptions,

    /// None until [`Engine::watch_config`] succeeds
    config_watcher: Option<ConfigWatcher>,

    /// Event broadcaster for external consumers.
    event_tx: broadcast::Sender<EngineEvent>,
}

impl<A> Engine<A>
where
    A: TargetApi + Clone + Send + Sync + 'static,
{
    /// Create an engine. Nothing runs until [`Engine::mount`].
    pub fn new(services: ServiceContext<A>, settings: Settings) -> Self {
        let state = AppState::with_settings(settings);
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(MESSAGE_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            state,
            msg_tx,
            msg_rx,
            shutdown_tx,
            shutdown_rx,
            services,
            subscriptions: Subscriptions::new(),
            config_watcher: None,
            event_tx,
        }
    }

    /// Reload settings whenever `path` changes, re-applying `overrides`.
    pub fn watch_config(&mut self, path: PathBuf, overrides: SettingsOverrides) {
        let mut watcher = ConfigWatcher::new(path.clone());
        let (watcher_tx, mut watcher_rx) = mpsc::channel::<WatcherEvent>(8);

        if let Err(e) = watcher.start(watcher_tx) {
            warn!("Failed to start config watcher: {}", e);
            return;
        }

        // Bridge watcher events to app messages
        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            while let Some(event) = watcher_rx.recv().await {
                let msg = match event {
                    WatcherEvent::ConfigChanged => {
                        let mut settings = config::load_settings(&path);
                        overrides.apply(&mut settings);
                        Message::SettingsReloaded(Box::new(settings))
                    }
                    WatcherEvent::Error { message } => Message::ConfigWatcherError { message },
                };
                if msg_tx.send(msg).await.is_err() {
                    break;
                }
            }
        });

        self.config_watcher = Some(watcher);
    }

    /// Quit on SIGINT / SIGTERM
    pub fn spawn_signal_handler(&self) {
        signals::spawn_signal_handler(self.msg_tx.clone());
    }

    /// Start subscriptions, arm the refresh timer and load the list.
    pub fn mount(&mut self) {
        info!("Mounting target select");
        self.process_message(Message::Mount);
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Process a single message through the TEA update cycle and emit
    /// EngineEvents for what changed.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);
        let applied = MessageEvents::from_message(&msg);

        process::process_message(
            &mut self.state,
            msg,
            &self.services,
            &self.msg_tx,
            &mut self.subscriptions,
            &self.shutdown_rx,
        );

        self.emit_events(&pre, applied);
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Get a clone of the shutdown receiver for background tasks.
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    pub fn services(&self) -> &ServiceContext<A> {
        &self.services
    }

    /// Unmount: stop the watcher, signal and abort every subscription.
    ///
    /// No subscription delivers a message after this returns.
    pub async fn shutdown(&mut self) {
        self.emit(EngineEvent::Shutdown);

        if let Some(ref mut watcher) = self.config_watcher {
            watcher.stop();
        }

        self.state.request_quit();
        let _ = self.shutdown_tx.send(true);
        self.subscriptions.shutdown().await;

        // Anything queued before the tasks stopped is stale now
        while self.msg_rx.try_recv().is_ok() {}
        info!("Engine shut down");
    }

    fn emit_events(&self, pre: &StateSnapshot, applied: Option<MessageEvents>) {
        match applied {
            Some(MessageEvents::Refreshed) if !self.state.loading => {
                self.emit(EngineEvent::TargetsRefreshed {
                    targets: self.state.targets.as_slice().to_vec(),
                });
            }
            Some(MessageEvents::Discovery(kind, target)) => {
                let event = match kind {
                    EventKind::Found => Some(EngineEvent::TargetFound { target }),
                    EventKind::Lost => Some(EngineEvent::TargetLost { target }),
                    EventKind::Changed => Some(EngineEvent::TargetChanged { target }),
                    // Reported through a notice
                    EventKind::Unknown(_) => None,
                };
                if let Some(event) = event {
                    self.emit(event);
                }
            }
            _ => {}
        }

        if pre.selected != self.state.selected {
            self.emit(EngineEvent::SelectionChanged {
                target: self.state.selected.clone(),
            });
        }

        for notice in self.state.notices.since(pre.notices_issued) {
            self.emit(EngineEvent::Notice {
                level: notice.level,
                title: notice.title.clone(),
                message: notice.message.clone(),
            });
        }
    }

    /// send() returns Err only if there are no receivers, which is fine.
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}

/// Message kinds whose effect is reported as its own event
enum MessageEvents {
    Refreshed,
    Discovery(EventKind, Target),
}

impl MessageEvents {
    fn from_message(msg: &Message) -> Option<Self> {
        match msg {
            Message::TargetsFetched { .. } => Some(Self::Refreshed),
            Message::Discovery(event) => Some(Self::Discovery(
                event.kind.clone(),
                event.service_ref.clone(),
            )),
            _ => None,
        }
    }
}
