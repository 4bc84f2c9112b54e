//! Reconnecting WebSocket client for server push notifications.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    NotificationChannel                        │
//! │                                                               │
//! │  is_ready()  ◀── watch<bool> ───┐                             │
//! │                                 │   Background Task           │
//! │  messages(c) ◀── broadcast ─────┤   connect → read loop       │
//! │   (filtered by category)        │   lost → backoff → retry    │
//! │                                 │                             │
//! │  close()     ─── watch<bool> ──▶┘                             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Readiness is `true` exactly while a socket is open. Every reconnect
//! produces a fresh `false → true` transition, which consumers can treat as
//! an edge to resynchronise on.

mod protocol;

pub use protocol::{parse_notification, MessageType, NotificationMessage, NotificationMeta};

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use tsel_core::prelude::*;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Initial reconnection backoff duration.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Maximum reconnection backoff duration (cap).
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Capacity of the broadcast channel (notifications can be bursty).
const MESSAGE_CHANNEL_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Current connection state of a [`NotificationChannel`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    /// Closed by the owner; no further attempts.
    Disconnected,
    /// Initial connection attempt in progress.
    Connecting,
    /// Socket open, notifications flowing.
    Connected,
    /// Connection lost or refused; waiting to retry.
    Reconnecting {
        /// The current reconnection attempt number (1-indexed).
        attempt: u32,
    },
}

/// Subscription to the notifications of one category.
///
/// Wraps a broadcast receiver and skips other categories. A lagging
/// subscriber loses the overflowed messages (logged at `warn`) and keeps going.
pub struct CategoryReceiver {
    category: String,
    rx: broadcast::Receiver<NotificationMessage>,
}

impl CategoryReceiver {
    pub fn new(category: impl Into<String>, rx: broadcast::Receiver<NotificationMessage>) -> Self {
        Self {
            category: category.into(),
            rx,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Wait for the next message of this category.
    ///
    /// Returns `None` once the channel has been dropped.
    pub async fn recv(&mut self) -> Option<NotificationMessage> {
        loop {
            match self.rx.recv().await {
                Ok(msg) if msg.category() == self.category => return Some(msg),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        "Notification subscriber for '{}' lagged, {} message(s) dropped",
                        self.category, skipped
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

// ---------------------------------------------------------------------------
// NotificationChannel
// ---------------------------------------------------------------------------

/// Push notification channel.
///
/// Created with [`NotificationChannel::spawn`], which returns immediately;
/// connection happens in a background task that keeps retrying with
/// exponential backoff until [`close`](Self::close) is called or the channel
/// is dropped.
pub struct NotificationChannel {
    ready_rx: watch::Receiver<bool>,
    state_rx: watch::Receiver<ConnectionState>,
    message_tx: broadcast::Sender<NotificationMessage>,
    close_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
    /// Held only by test channels so readiness can be driven by hand.
    #[cfg(any(test, feature = "test-helpers"))]
    test_ready_tx: Option<watch::Sender<bool>>,
}

impl NotificationChannel {
    /// Start connecting to `ws_url` in the background.
    pub fn spawn(ws_url: Url, auth_token: Option<String>) -> Self {
        let (ready_tx, ready_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let (message_tx, _) = broadcast::channel(MESSAGE_CHANNEL_CAPACITY);
        let (close_tx, close_rx) = watch::channel(false);

        info!("Notification channel connecting to {}", ws_url);
        let task = tokio::spawn(run_channel_task(
            ws_url,
            auth_token,
            ready_tx,
            state_tx,
            message_tx.clone(),
            close_rx,
        ));

        Self {
            ready_rx,
            state_rx,
            message_tx,
            close_tx,
            task: Some(task),
            #[cfg(any(test, feature = "test-helpers"))]
            test_ready_tx: None,
        }
    }

    /// Readiness transitions (`true` while connected).
    pub fn is_ready(&self) -> watch::Receiver<bool> {
        self.ready_rx.clone()
    }

    /// Subscribe to the notifications of one category.
    pub fn messages(&self, category: &str) -> CategoryReceiver {
        CategoryReceiver::new(category, self.message_tx.subscribe())
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state_rx.borrow().clone()
    }

    /// Stop the background task and close the socket.
    pub fn close(&self) {
        self.close_tx.send_replace(true);
    }

    /// Create a channel with no socket behind it.
    ///
    /// Readiness is driven with [`set_ready`](Self::set_ready) and messages
    /// are injected with [`publish`](Self::publish).
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn new_for_test() -> Self {
        let (ready_tx, ready_rx) = watch::channel(false);
        let (_state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (message_tx, _) = broadcast::channel(MESSAGE_CHANNEL_CAPACITY);
        let (close_tx, _close_rx) = watch::channel(false);
        Self {
            ready_rx,
            state_rx,
            message_tx,
            close_tx,
            task: None,
            test_ready_tx: Some(ready_tx),
        }
    }

    #[cfg(any(test, feature = "test-helpers"))]
    pub fn set_ready(&self, ready: bool) {
        if let Some(tx) = &self.test_ready_tx {
            tx.send_replace(ready);
        }
    }

    /// Inject a message as if it arrived on the socket. Returns the number of
    /// subscribers that received it.
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn publish(&self, msg: NotificationMessage) -> usize {
        self.message_tx.send(msg).unwrap_or(0)
    }
}

impl Drop for NotificationChannel {
    fn drop(&mut self) {
        self.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for NotificationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationChannel")
            .field("connection_state", &self.connection_state())
            .field("ready", &*self.ready_rx.borrow())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Background task
// ---------------------------------------------------------------------------

async fn run_channel_task(
    ws_url: Url,
    auth_token: Option<String>,
    ready_tx: watch::Sender<bool>,
    state_tx: watch::Sender<ConnectionState>,
    message_tx: broadcast::Sender<NotificationMessage>,
    mut close_rx: watch::Receiver<bool>,
) {
    let mut attempt: u32 = 0;

    loop {
        if *close_rx.borrow() {
            break;
        }

        state_tx.send_replace(if attempt == 0 {
            ConnectionState::Connecting
        } else {
            ConnectionState::Reconnecting { attempt }
        });

        let connected = tokio::select! {
            result = connect_ws(&ws_url, auth_token.as_deref()) => result,
            _ = close_rx.changed() => break,
        };

        match connected {
            Ok(ws_stream) => {
                info!("Notification channel connected to {}", ws_url);
                attempt = 0;
                state_tx.send_replace(ConnectionState::Connected);
                ready_tx.send_replace(true);

                let reconnect = run_io_loop(ws_stream, &message_tx, &mut close_rx).await;

                ready_tx.send_replace(false);
                if !reconnect {
                    break;
                }
            }
            Err(err) => {
                warn!("Notification channel: connection attempt failed: {}", err);
            }
        }

        attempt = attempt.saturating_add(1);
        state_tx.send_replace(ConnectionState::Reconnecting { attempt });
        let backoff = compute_backoff(attempt);
        debug!(
            "Notification channel: retrying in {:?} (attempt {})",
            backoff, attempt
        );

        tokio::select! {
            _ = tokio::time::sleep(backoff) => {}
            _ = close_rx.changed() => break,
        }
    }

    ready_tx.send_replace(false);
    state_tx.send_replace(ConnectionState::Disconnected);
    debug!("Notification channel task exiting");
}

/// Read frames until the socket drops (returns `true`, reconnect) or the
/// owner closes the channel (returns `false`).
async fn run_io_loop(
    ws_stream: WsStream,
    message_tx: &broadcast::Sender<NotificationMessage>,
    close_rx: &mut watch::Receiver<bool>,
) -> bool {
    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    loop {
        tokio::select! {
            frame = ws_stream.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        if let Some(msg) = parse_notification(text.as_str()) {
                            trace!("Notification received: category={}", msg.category());
                            // No subscribers is fine
                            let _ = message_tx.send(msg);
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) => {
                        debug!("Notification channel: received Close frame");
                        return true;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!("Notification channel: read error: {}", err);
                        return true;
                    }
                    None => {
                        debug!("Notification channel: stream ended");
                        return true;
                    }
                }
            }

            _ = close_rx.changed() => {
                let _ = ws_sink.send(WsMessage::Close(None)).await;
                let _ = ws_sink.close().await;
                return false;
            }
        }
    }
}

async fn connect_ws(ws_url: &Url, auth_token: Option<&str>) -> Result<WsStream> {
    let mut request = ws_url
        .as_str()
        .into_client_request()
        .map_err(|e| Error::notification_channel(format!("Invalid WebSocket request: {e}")))?;

    if let Some(token) = auth_token {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| Error::notification_channel(format!("Invalid auth token: {e}")))?;
        request.headers_mut().insert("Authorization", value);
    }

    let (ws_stream, _response) = connect_async(request)
        .await
        .map_err(|e| Error::notification_channel(format!("Failed to connect: {e}")))?;
    Ok(ws_stream)
}

/// `INITIAL_BACKOFF * 2^(attempt-1)`, capped at `MAX_BACKOFF`.
fn compute_backoff(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1);
    let multiplier: u64 = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
    let secs = INITIAL_BACKOFF.as_secs().saturating_mul(multiplier);
    Duration::from_secs(secs.min(MAX_BACKOFF.as_secs()))
}
